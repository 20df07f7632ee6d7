use std::ops::RangeInclusive;

use eframe::egui::{self, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{result_color, BAR_COLOR, TREND_COLOR};
use crate::data::model::{Diagnosis, Marker, TrendMetric};
use crate::data::views::{BinMean, GroupMean, ScatterPoint};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 320.0;

/// Axis formatter that prints `labels[i]` at integer position `i` and
/// nothing in between.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let v = mark.value;
        if v < 0.0 || v.fract() != 0.0 {
            return String::new();
        }
        labels.get(v as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Scatter: age vs cardiac marker, coloured by result
// ---------------------------------------------------------------------------

/// Render the marker selector and the age/marker scatter plot.
pub fn scatter_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Connected Visualisations: Age vs Cardiac Markers");

    let mut marker = state.params.marker;
    egui::ComboBox::from_id_salt("marker")
        .selected_text(marker.field().name())
        .show_ui(ui, |ui: &mut Ui| {
            for option in Marker::ALL {
                ui.selectable_value(&mut marker, option, option.field().name());
            }
        });
    if marker != state.params.marker {
        state.params.marker = marker;
        state.recompute();
    }

    let Some(views) = &state.views else {
        return;
    };
    scatter_plot(ui, &views.scatter, state.params.marker);
}

fn scatter_plot(ui: &mut Ui, points: &[ScatterPoint], marker: Marker) {
    let series = |result: Diagnosis| -> PlotPoints {
        points
            .iter()
            .filter(|p| p.result == result)
            .map(|p| [p.age as f64, p.value])
            .collect()
    };

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Age")
        .y_axis_label(marker.field().name())
        .show(ui, |plot_ui| {
            for result in [Diagnosis::Normal, Diagnosis::Abnormal] {
                plot_ui.points(
                    Points::new(series(result))
                        .name(format!("Result = {}", result.code()))
                        .color(result_color(result))
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Trend: metric mean per equal-width age bin
// ---------------------------------------------------------------------------

/// Render the metric selector and the binned trend line.
pub fn trend_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dynamic Configuration: Heart Rate Trend");

    let mut metric = state.params.trend_metric;
    egui::ComboBox::from_id_salt("trend_metric")
        .selected_text(metric.field().name())
        .show_ui(ui, |ui: &mut Ui| {
            for option in TrendMetric::ALL {
                ui.selectable_value(&mut metric, option, option.field().name());
            }
        });
    if metric != state.params.trend_metric {
        state.params.trend_metric = metric;
        state.recompute();
    }

    let Some(views) = &state.views else {
        return;
    };
    trend_plot(ui, &views.trend, state.params.trend_metric);
}

fn trend_plot(ui: &mut Ui, bins: &[BinMean], metric: TrendMetric) {
    let name = format!("{} Trend by Age", metric.field().name());
    let coords: Vec<[f64; 2]> = bins
        .iter()
        .enumerate()
        .map(|(i, b)| [i as f64, b.mean])
        .collect();
    let labels = bins.iter().map(|b| b.label.clone()).collect();

    Plot::new("trend_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("Age Bin")
        .y_axis_label(metric.field().name())
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .name(&name)
                    .color(TREND_COLOR)
                    .width(2.0),
            );
            plot_ui.points(Points::new(coords).color(TREND_COLOR).radius(4.0));
        });
}

// ---------------------------------------------------------------------------
// Bars: mean heart rate per fixed age group
// ---------------------------------------------------------------------------

/// Render the heart-rate-by-age-group bar chart.
pub fn bar_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Average Heart Rate by Age Group");
    if let Some(views) = &state.views {
        bar_plot(ui, &views.bars);
    }
}

fn bar_plot(ui: &mut Ui, groups: &[GroupMean]) {
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| Bar::new(i as f64, g.mean).name(&g.label).width(0.7))
        .collect();
    let labels = groups.iter().map(|g| g.label.clone()).collect();

    Plot::new("age_group_bars")
        .height(PLOT_HEIGHT)
        .x_axis_label("AgeGroup")
        .y_axis_label("Heart rate")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Mean Heart Rate by Age Group")
                    .color(BAR_COLOR),
            );
        });
}
