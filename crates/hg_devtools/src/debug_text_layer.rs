//! Paints the backend's debug text grid into egui's background layer.

use hg_core::debug_text::{palette_rgb, Cell, DebugText, CELL_HEIGHT, CELL_WIDTH};

pub fn palette_color(index: u8) -> egui::Color32 {
    let [r, g, b] = palette_rgb(index);
    egui::Color32::from_rgb(r, g, b)
}

/// Screen rect of cell (`x`, `y`) in points.
pub fn cell_rect(x: u16, y: u16, pixels_per_point: f32) -> egui::Rect {
    let w = CELL_WIDTH as f32 / pixels_per_point;
    let h = CELL_HEIGHT as f32 / pixels_per_point;
    egui::Rect::from_min_size(
        egui::pos2(f32::from(x) * w, f32::from(y) * h),
        egui::vec2(w, h),
    )
}

pub fn paint_debug_text(painter: &egui::Painter, text: &DebugText, pixels_per_point: f32) {
    let font = egui::FontId::monospace(CELL_HEIGHT as f32 * 0.75 / pixels_per_point);
    for (y, row) in text.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if cell.is_blank() {
                continue;
            }
            let rect = cell_rect(x as u16, y as u16, pixels_per_point);
            paint_cell(painter, rect, *cell, &font);
        }
    }
}

fn paint_cell(painter: &egui::Painter, rect: egui::Rect, cell: Cell, font: &egui::FontId) {
    if cell.bg() != 0 {
        painter.rect_filled(rect, 0.0, palette_color(cell.bg()));
    }
    if cell.ch > b' ' && cell.ch < 0x7f {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            char::from(cell.ch),
            font.clone(),
            palette_color(cell.fg()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_8x16_pixels() {
        let rect = cell_rect(2, 3, 1.0);
        assert_eq!(rect.min, egui::pos2(16.0, 48.0));
        assert_eq!(rect.size(), egui::vec2(8.0, 16.0));
    }

    #[test]
    fn cells_shrink_in_points_on_hidpi() {
        let rect = cell_rect(1, 1, 2.0);
        assert_eq!(rect.min, egui::pos2(4.0, 8.0));
        assert_eq!(rect.size(), egui::vec2(4.0, 8.0));
    }

    #[test]
    fn palette_maps_to_opaque_colors() {
        assert_eq!(palette_color(0), egui::Color32::from_rgb(0, 0, 0));
        assert_eq!(palette_color(15), egui::Color32::WHITE);
        assert_eq!(palette_color(12).a(), 255);
    }
}
