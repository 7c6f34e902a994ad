use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, ViewMode};

// ---------------------------------------------------------------------------
// Left side panel – region, year and selection statistics
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Region");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let continents: Vec<String> = dataset.continents.iter().cloned().collect();

    let current = state.region.continent.clone();
    let mut chosen = current.clone();
    egui::ComboBox::from_id_salt("region")
        .selected_text(current.as_deref().unwrap_or("All continents"))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut chosen, None, "All continents");
            for continent in &continents {
                ui.selectable_value(&mut chosen, Some(continent.clone()), continent);
            }
        });
    if chosen != current {
        state.set_region(chosen);
    }

    year_controls(ui, state);
    ui.separator();
    stats_panel(ui, state);
    ui.separator();

    let countries = state.region_countries();
    let n_excluded = countries
        .iter()
        .filter(|c| state.region.excluded.contains(*c))
        .count();
    egui::CollapsingHeader::new(
        RichText::new(format!("Excluded countries  ({n_excluded}/{})", countries.len())).strong(),
    )
    .id_salt("excluded")
    .default_open(false)
    .show(ui, |ui: &mut Ui| {
        ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(300.0)
            .show(ui, |ui: &mut Ui| {
                for country in &countries {
                    let mut excluded = state.region.excluded.contains(country);
                    if ui.checkbox(&mut excluded, country).changed() {
                        state.toggle_excluded(country);
                    }
                }
            });
    });
}

fn year_controls(ui: &mut Ui, state: &mut AppState) {
    ui.add_space(8.0);
    ui.strong("Year");

    let (Some((first, last)), Some(mut year)) = (state.year_bounds(), state.year) else {
        ui.label("No years with data.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        let label = if state.playing { "⏸" } else { "▶" };
        if ui.button(label).on_hover_text("Animate years").clicked() {
            state.playing = !state.playing;
            state.view = ViewMode::BarChart;
        }
        if ui
            .add(egui::Slider::new(&mut year, first..=last))
            .changed()
        {
            state.set_year(year);
        }
    });
}

fn stats_panel(ui: &mut Ui, state: &mut AppState) {
    let heading = if state.brush.range().is_some() {
        "Selection"
    } else {
        "Whole year"
    };
    ui.strong(heading);

    let stats = state.stats;
    egui::Grid::new("stats_grid")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.label("Rows");
            ui.label(stats.rows.to_string());
            ui.end_row();
            ui.label("Mean");
            ui.label(format!("{:.2}°C", stats.mean));
            ui.end_row();
            ui.label("Max");
            ui.label(format!("{:.2}°C", stats.max));
            ui.end_row();
            ui.label("Warming");
            ui.label(stats.warming_count.to_string());
            ui.end_row();
        });

    if state.brush.range().is_some() && ui.small_button("Clear selection").clicked() {
        state.clear_brush();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, ViewMode::LineChart, "Continents");
        ui.selectable_value(&mut state.view, ViewMode::BarChart, "Year");

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records, {} continents, {} skipped",
                ds.len(),
                ds.continents.len(),
                ds.skipped
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open temperature data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
