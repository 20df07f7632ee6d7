use eframe::egui::{self, Align2, FontId, Sense, Ui, Vec2};

use crate::color::{contrasting_text, correlation_color};
use crate::data::correlation::CorrelationMatrix;
use crate::state::AppState;

const CELL_SIZE: f32 = 84.0;
const LABEL_WIDTH: f32 = 90.0;

/// Cell text: two decimals, or "n/a" for an undefined coefficient.
pub fn cell_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Render the correlation heatmap section.
pub fn heatmap_section(ui: &mut Ui, state: &AppState) {
    ui.heading("Correlation Heatmap");
    if let Some(views) = &state.views {
        if views.correlation.is_undefined() {
            ui.label("Not enough data to correlate (need two or more records with varying values).");
        }
        correlation_heatmap(ui, &views.correlation);
    }
}

/// Paint the matrix as a grid of coloured cells with row/column labels.
fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.size();
    let size = Vec2::new(LABEL_WIDTH + CELL_SIZE * n as f32, CELL_SIZE * n as f32 + 24.0);
    let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let font = FontId::proportional(14.0);
    let label_color = ui.visuals().text_color();
    let origin = rect.min + Vec2::new(LABEL_WIDTH, 0.0);

    for (row, field) in matrix.fields().iter().enumerate() {
        let y = origin.y + CELL_SIZE * (row as f32 + 0.5);
        painter.text(
            egui::pos2(rect.min.x + LABEL_WIDTH - 8.0, y),
            Align2::RIGHT_CENTER,
            field.name(),
            font.clone(),
            label_color,
        );

        for col in 0..n {
            let min = origin + Vec2::new(CELL_SIZE * col as f32, CELL_SIZE * row as f32);
            let cell = egui::Rect::from_min_size(min, Vec2::splat(CELL_SIZE)).shrink(1.0);
            let value = matrix.get(row, col);
            let fill = correlation_color(value);
            painter.rect_filled(cell, 2.0, fill);
            painter.text(
                cell.center(),
                Align2::CENTER_CENTER,
                cell_text(value),
                font.clone(),
                contrasting_text(fill),
            );
        }
    }

    for (col, field) in matrix.fields().iter().enumerate() {
        painter.text(
            egui::pos2(origin.x + CELL_SIZE * (col as f32 + 0.5), origin.y + CELL_SIZE * n as f32 + 12.0),
            Align2::CENTER_CENTER,
            field.name(),
            font.clone(),
            label_color,
        );
    }

    // Hover readout of the pair under the pointer.
    if let Some(pos) = response.hover_pos() {
        let rel = pos - origin;
        if rel.x >= 0.0 && rel.y >= 0.0 {
            let (col, row) = ((rel.x / CELL_SIZE) as usize, (rel.y / CELL_SIZE) as usize);
            if row < n && col < n {
                let fields = matrix.fields();
                response.on_hover_text(format!(
                    "{} × {}: {}",
                    fields[row],
                    fields[col],
                    cell_text(matrix.get(row, col))
                ));
            }
        }
    }
}
