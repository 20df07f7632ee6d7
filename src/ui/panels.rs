use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::GenderSelector;
use crate::data::model::RecordStore;
use crate::data::views::Summary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Slider bounds for the loaded dataset, or the notice shown instead.
fn age_slider_span(store: Option<&RecordStore>) -> Result<(u32, u32), &'static str> {
    let store = store.ok_or("No dataset loaded.")?;
    store.age_span().ok_or("Dataset has no records.")
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Age and Gender");
    ui.label("Use the options below to customize the dashboard view.");
    ui.separator();

    let (min_age, max_age) = match age_slider_span(state.store.as_ref()) {
        Ok(span) => span,
        Err(notice) => {
            ui.label(notice);
            return;
        }
    };

    // ---- Age range ----
    ui.strong("Select Age Range");
    let range = state.params.filter.age_range;
    let (mut lo, mut hi) = (range.lo(), range.hi());
    let lo_changed = ui
        .add(egui::Slider::new(&mut lo, min_age..=max_age).text("from"))
        .changed();
    let hi_changed = ui
        .add(egui::Slider::new(&mut hi, min_age..=max_age).text("to"))
        .changed();
    if lo_changed || hi_changed {
        // Dragging one bound past the other pushes the other along.
        if lo_changed && lo > hi {
            hi = lo;
        } else if hi_changed && hi < lo {
            lo = hi;
        }
        state.set_age_range(lo, hi);
    }
    ui.add_space(8.0);

    // ---- Gender ----
    ui.strong("Select Gender");
    let mut gender = state.params.filter.gender;
    egui::ComboBox::from_id_salt("gender_filter")
        .selected_text(gender.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for option in GenderSelector::ALL {
                ui.selectable_value(&mut gender, option, option.to_string());
            }
        });
    if gender != state.params.filter.gender {
        state.params.filter.gender = gender;
        state.recompute();
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

        if let (Some(store), Some(views)) = (&state.store, &state.views) {
            ui.label(format!(
                "{} records loaded, {} match the filters",
                store.len(),
                views.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// "Average Troponin" tile text; a dash when there is nothing to average.
pub fn format_mean_troponin(summary: &Summary) -> String {
    match summary.mean_troponin {
        Some(v) => format!("{v:.2}"),
        None => "–".to_string(),
    }
}

/// "Abnormal Diagnoses" tile text.
pub fn format_abnormal_pct(summary: &Summary) -> String {
    format!("{:.1}%", summary.abnormal_pct)
}

fn metric_tile(ui: &mut Ui, title: &str, value: String) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).weak());
        ui.label(RichText::new(value).size(28.0).strong());
    });
}

/// Render the two headline metrics side by side.
pub fn summary_metrics(ui: &mut Ui, summary: &Summary) {
    ui.heading("Summary Metrics");
    ui.columns(2, |cols: &mut [Ui]| {
        metric_tile(&mut cols[0], "Average Troponin", format_mean_troponin(summary));
        metric_tile(&mut cols[1], "Abnormal Diagnoses", format_abnormal_pct(summary));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open medical dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
