use std::time::Duration;

use eframe::egui;

use crate::state::{AppState, ViewMode};
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ThermoscopeApp {
    pub state: AppState,
    /// `ctx` time of the last animation step.
    last_step: f64,
}

impl ThermoscopeApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            last_step: 0.0,
        }
    }

    /// Advance the year while playing, one step per configured interval.
    fn tick_playback(&mut self, ctx: &egui::Context) {
        if !self.state.playing {
            return;
        }
        let now = ctx.input(|i| i.time);
        let interval = self.state.config.play_interval_secs.max(0.05);
        if now - self.last_step >= interval {
            self.last_step = now;
            self.state.step_year();
        }
        ctx.request_repaint_after(Duration::from_secs_f64(interval));
    }
}

impl eframe::App for ThermoscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick_playback(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: region, year, statistics ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            ViewMode::LineChart => plot::continent_chart(ui, &self.state),
            ViewMode::BarChart => plot::year_chart(ui, &mut self.state),
        });
    }
}
