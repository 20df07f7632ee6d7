use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{heatmap, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MedicalDashboardApp {
    pub state: AppState,
}

impl MedicalDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for MedicalDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("\u{1F3E5} Medical Diagnostic Dashboard");
            if self.state.views.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label("Open a dataset to begin  (File → Open…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    if let Some(views) = &self.state.views {
                        panels::summary_metrics(ui, &views.summary);
                    }
                    ui.separator();
                    plot::scatter_section(ui, &mut self.state);
                    ui.separator();
                    plot::trend_section(ui, &mut self.state);
                    ui.separator();
                    plot::bar_section(ui, &self.state);
                    ui.separator();
                    heatmap::heatmap_section(ui, &self.state);
                    ui.separator();
                    table::table_section(ui, &mut self.state);
                });
        });
    }
}
