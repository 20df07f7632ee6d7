use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder, TableRow};

use crate::data::model::{Field, Record};
use crate::data::views::{SortOrder, TableSort};
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const TABLE_HEIGHT: f32 = 360.0;

/// Header text for a sortable column, with an arrow on the active one.
pub fn header_label(field: Field, sort: TableSort) -> String {
    if field != sort.key {
        return field.name().to_string();
    }
    let arrow = match sort.order {
        SortOrder::Ascending => "▲",
        SortOrder::Descending => "▼",
    };
    format!("{} {arrow}", field.name())
}

/// Clickable header cell; returns whether it was clicked this frame.
fn sort_header(header: &mut TableRow<'_, '_>, field: Field, sort: TableSort) -> bool {
    let mut clicked = false;
    header.col(|ui: &mut Ui| {
        clicked = ui
            .button(RichText::new(header_label(field, sort)).strong())
            .clicked();
    });
    clicked
}

fn numeric_cell(ui: &mut Ui, value: f64) {
    ui.label(format!("{value}"));
}

/// Render the filtered records, sorted by the active column.
pub fn table_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Interactive Data Table");

    let (Some(store), Some(views)) = (&state.store, &state.views) else {
        return;
    };
    let records = store.records();
    let rows = &views.table;
    let extra_columns = store.extra_columns();
    let sort = state.params.table_sort;
    let mut clicked: Option<Field> = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(TABLE_HEIGHT)
        .columns(Column::auto().at_least(70.0), 6 + extra_columns.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            if sort_header(&mut header, Field::Age, sort) {
                clicked = Some(Field::Age);
            }
            header.col(|ui: &mut Ui| {
                ui.strong("Gender");
            });
            for field in [Field::HeartRate, Field::CkMb, Field::Troponin] {
                if sort_header(&mut header, field, sort) {
                    clicked = Some(field);
                }
            }
            header.col(|ui: &mut Ui| {
                ui.strong("Result");
            });
            for name in extra_columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let record: &Record = &records[rows[row.index()]];
                row.col(|ui: &mut Ui| {
                    ui.label(record.age.to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(record.gender.code().to_string());
                });
                row.col(|ui: &mut Ui| numeric_cell(ui, record.heart_rate));
                row.col(|ui: &mut Ui| numeric_cell(ui, record.ck_mb));
                row.col(|ui: &mut Ui| numeric_cell(ui, record.troponin));
                row.col(|ui: &mut Ui| {
                    ui.label(record.result.code().to_string());
                });
                for name in extra_columns {
                    row.col(|ui: &mut Ui| {
                        let text = record.extra.get(name).map(|v| v.to_string()).unwrap_or_default();
                        ui.label(text);
                    });
                }
            });
        });

    if let Some(field) = clicked {
        state.sort_table_by(field);
    }
}
