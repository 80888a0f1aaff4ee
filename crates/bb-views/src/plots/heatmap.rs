//! Hour by weekday heatmap

use egui::{pos2, vec2, Align2, Color32, Rect, Sense, Stroke, TextStyle, Ui};

use super::colors::viridis_color;
use crate::chart::{ChartSpec, HeatmapCell};

const MARGIN: f32 = 60.0;

pub fn show(ui: &mut Ui, spec: &ChartSpec, x_labels: &[String], y_labels: &[String], cells: &[HeatmapCell]) {
    let grid = Grid::new(x_labels.len(), y_labels.len(), cells);
    let font = TextStyle::Small.resolve(ui.style());
    let text_color = ui.style().visuals.text_color();

    egui::ScrollArea::both().show(ui, |ui| {
        let cell = ((ui.available_width() - MARGIN - 60.0) / x_labels.len().max(1) as f32).clamp(14.0, 40.0);
        let width = x_labels.len() as f32 * cell + MARGIN + 60.0;
        let height = y_labels.len() as f32 * cell + MARGIN + 20.0;
        let (response, painter) = ui.allocate_painter(vec2(width, height), Sense::hover());

        let rect = response.rect;
        let origin = rect.min + vec2(MARGIN, 20.0);

        for (y, y_label) in y_labels.iter().enumerate() {
            for x in 0..x_labels.len() {
                let cell_rect = Rect::from_min_size(origin + vec2(x as f32 * cell, y as f32 * cell), vec2(cell, cell));
                let color = match grid.get(x, y) {
                    0 => Color32::from_gray(40),
                    count => viridis_color(grid.scale(count)),
                };
                painter.rect_filled(cell_rect, 0.0, color);
                painter.rect_stroke(cell_rect, 0.0, Stroke::new(0.5, Color32::from_gray(80)));
            }

            painter.text(
                pos2(origin.x - 5.0, origin.y + y as f32 * cell + cell / 2.0),
                Align2::RIGHT_CENTER,
                y_label,
                font.clone(),
                text_color,
            );
        }

        for (x, x_label) in x_labels.iter().enumerate() {
            painter.text(
                origin + vec2(x as f32 * cell + cell / 2.0, y_labels.len() as f32 * cell + 4.0),
                Align2::CENTER_TOP,
                x_label,
                font.clone(),
                text_color,
            );
        }

        painter.text(
            pos2(origin.x + x_labels.len() as f32 * cell / 2.0, rect.max.y),
            Align2::CENTER_BOTTOM,
            &spec.x_label,
            font.clone(),
            text_color,
        );

        // Colorbar
        let bar = Rect::from_min_size(
            pos2(origin.x + x_labels.len() as f32 * cell + 16.0, origin.y),
            vec2(14.0, y_labels.len() as f32 * cell),
        );
        let steps = 50;
        let step_height = bar.height() / steps as f32;
        for i in 0..steps {
            let t = i as f32 / (steps - 1) as f32;
            let step_rect = Rect::from_min_size(
                bar.min + vec2(0.0, (steps - 1 - i) as f32 * step_height),
                vec2(bar.width(), step_height),
            );
            painter.rect_filled(step_rect, 0.0, viridis_color(t));
        }
        painter.text(bar.right_top() + vec2(4.0, 0.0), Align2::LEFT_TOP, grid.max.to_string(), font.clone(), text_color);
        painter.text(bar.right_bottom() + vec2(4.0, 0.0), Align2::LEFT_BOTTOM, "0", font, text_color);

        if let Some(hover) = response.hover_pos() {
            let local = hover - origin;
            if local.x >= 0.0 && local.y >= 0.0 {
                let (x, y) = ((local.x / cell) as usize, (local.y / cell) as usize);
                if let (Some(x_label), Some(y_label)) = (x_labels.get(x), y_labels.get(y)) {
                    response.on_hover_text(format!("{} {}:00\n{} trips", x_label, y_label, grid.get(x, y)));
                }
            }
        }
    });
}

/// Dense counts for the sparse cell list, weekday columns by hour rows
struct Grid {
    width: usize,
    counts: Vec<u64>,
    max: u64,
}

impl Grid {
    fn new(width: usize, height: usize, cells: &[HeatmapCell]) -> Self {
        let mut counts = vec![0; width * height];
        for cell in cells {
            let (x, y) = (cell.weekday as usize, cell.hour as usize);
            if x < width && y < height {
                counts[y * width + x] += cell.count;
            }
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        Self { width, counts, max }
    }

    fn get(&self, x: usize, y: usize) -> u64 {
        self.counts.get(y * self.width + x).copied().unwrap_or(0)
    }

    /// Position of `count` on the color scale
    fn scale(&self, count: u64) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            count as f32 / self.max as f32
        }
    }
}
