use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::diverging_color;
use crate::data::aggregate::value_extent;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tooltips
// ---------------------------------------------------------------------------

/// Hover text for one data point, e.g. `"Europe\n1990: 0.52°C"`.
pub fn format_tooltip(name: &str, year: i32, value: f64) -> String {
    format!("{name}\n{year}: {value:.2}°C")
}

fn no_data(ui: &mut Ui, msg: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(msg);
    });
}

// ---------------------------------------------------------------------------
// Continent line chart
// ---------------------------------------------------------------------------

/// Mean temperature change per continent over time.
pub fn continent_chart(ui: &mut Ui, state: &AppState) {
    if state.series.is_empty() {
        no_data(ui, "Open a file to view temperature change  (File → Open…)");
        return;
    }

    Plot::new("continent_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Temperature change (°C)")
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format_tooltip(name, value.x.round() as i32, value.y)
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &state.series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&series.continent))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: Vec<[f64; 2]> = series
                    .points
                    .iter()
                    .map(|p| [p.year as f64, p.mean])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(&series.continent)
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(&series.continent)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Year bar chart with brush
// ---------------------------------------------------------------------------

/// Diverging horizontal bars for the selected year; dragging vertically
/// brushes rows, double-click clears the brush.
///
/// Row `i` is drawn on its band with the plot's y axis pointing down
/// (plot y = -band position), so pointer y maps straight back to band space.
pub fn year_chart(ui: &mut Ui, state: &mut AppState) {
    let Some(year) = state.year else {
        no_data(ui, "No records for the selected region");
        return;
    };

    let layout = state.layout();
    let total = state.slice.len();
    let scale = value_extent(&state.slice)
        .map(|(lo, hi)| lo.abs().max(hi.abs()))
        .unwrap_or(0.0);

    let plot = Plot::new("year_plot")
        .x_axis_label(format!("Temperature change in {year} (°C)"))
        .show_y(false)
        .show_axes([true, false])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .include_y(0.0)
        .include_y(-(total as f64) * layout.band_height)
        .include_x(-scale.max(0.5))
        .include_x(scale.max(0.5))
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = state
                .slice
                .iter()
                .enumerate()
                .filter_map(|(i, rec)| {
                    let band = layout.band(i, total)?;
                    Some(
                        Bar::new(-band.center(), rec.value)
                            .width(band.height())
                            .fill(diverging_color(rec.value, scale))
                            .name(&rec.country),
                    )
                })
                .collect();

            plot_ui.bar_chart(
                BarChart::new(bars)
                    .horizontal()
                    .element_formatter(Box::new(move |bar, _chart| {
                        format_tooltip(&bar.name, year, bar.value)
                    })),
            );

            for (i, rec) in state.slice.iter().enumerate() {
                let Some(band) = layout.band(i, total) else {
                    continue;
                };
                // Label on the opposite side of zero from the bar.
                let anchor = if rec.value > 0.0 {
                    Align2::RIGHT_CENTER
                } else {
                    Align2::LEFT_CENTER
                };
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.0, -band.center()),
                        RichText::new(&rec.country).small(),
                    )
                    .anchor(anchor),
                );
            }

            if let Some(range) = state.brush.range() {
                let color = if state.brush.is_dragging() {
                    Color32::from_rgba_unmultiplied(255, 200, 0, 140)
                } else {
                    Color32::from_rgb(255, 170, 0)
                };
                plot_ui.hline(HLine::new(-range.start).color(color).width(1.5));
                plot_ui.hline(HLine::new(-range.end).color(color).width(1.5));
            }

            plot_ui.pointer_coordinate()
        });

    let response = &plot.response;
    if let Some(pointer) = plot.inner {
        let pos = -pointer.y;
        if response.drag_started() {
            state.begin_brush(pos);
        } else if response.dragged() {
            state.drag_brush(pos);
        }
    }
    if response.drag_stopped() {
        state.end_brush();
    }
    if response.double_clicked() {
        state.clear_brush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_uses_degree_sign() {
        assert_eq!(format_tooltip("Europe", 1990, 0.5234), "Europe\n1990: 0.52°C");
        assert_eq!(format_tooltip("Chile", 2001, -1.0), "Chile\n2001: -1.00°C");
    }
}
