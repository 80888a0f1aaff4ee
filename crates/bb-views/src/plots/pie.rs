//! Pie chart drawn directly with the painter

use std::f32::consts::TAU;

use egui::{pos2, vec2, Align2, Color32, Sense, Shape, Stroke, TextStyle, Ui};

use super::colors::categorical_color;
use crate::chart::PieSlice;

const SEGMENTS_PER_TURN: f32 = 128.0;

pub fn show(ui: &mut Ui, slices: &[PieSlice]) {
    let size = ui.available_width().min(ui.available_height()).clamp(160.0, 420.0);
    let (response, painter) = ui.allocate_painter(vec2(size + 220.0, size), Sense::hover());
    let rect = response.rect;
    let center = pos2(rect.min.x + size / 2.0, rect.center().y);
    let radius = size / 2.0 - 8.0;
    let font = TextStyle::Body.resolve(ui.style());
    let text_color = ui.style().visuals.text_color();

    for (i, (slice, (start, end))) in slices.iter().zip(wedges(slices)).enumerate() {
        let color = categorical_color(i);

        // Fan of thin triangles; each stays convex whatever the wedge angle
        let steps = (((end - start) / TAU) * SEGMENTS_PER_TURN).ceil().max(1.0) as usize;
        for step in 0..steps {
            let a0 = start + (end - start) * step as f32 / steps as f32;
            let a1 = start + (end - start) * (step + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![
                    center,
                    center + radius * vec2(a0.cos(), a0.sin()),
                    center + radius * vec2(a1.cos(), a1.sin()),
                ],
                color,
                Stroke::NONE,
            ));
        }

        if end - start > 0.2 {
            let mid = (start + end) / 2.0;
            painter.text(
                center + radius * 0.6 * vec2(mid.cos(), mid.sin()),
                Align2::CENTER_CENTER,
                format!("{:.1}%", slice.percent),
                font.clone(),
                Color32::BLACK,
            );
        }

        // Legend
        let row = pos2(rect.min.x + size + 16.0, rect.min.y + 16.0 + i as f32 * 22.0);
        painter.rect_filled(egui::Rect::from_min_size(row, vec2(14.0, 14.0)), 2.0, color);
        painter.text(
            row + vec2(20.0, 7.0),
            Align2::LEFT_CENTER,
            format!("{} ({})", slice.label, slice.count),
            font.clone(),
            text_color,
        );
    }

    if let Some(hover) = response.hover_pos() {
        let offset = hover - center;
        if offset.length() <= radius {
            let angle = (offset.y.atan2(offset.x) + TAU) % TAU;
            let hit = wedges(slices)
                .into_iter()
                .position(|(start, end)| angle >= start && angle < end);
            if let Some(slice) = hit.and_then(|i| slices.get(i)) {
                response.on_hover_text(format!("{}: {} trips ({:.1}%)", slice.label, slice.count, slice.percent));
            }
        }
    }
}

/// Start and end angle of each slice, clockwise from the positive x axis
fn wedges(slices: &[PieSlice]) -> Vec<(f32, f32)> {
    let total: u64 = slices.iter().map(|s| s.count).sum();
    if total == 0 {
        return vec![(0.0, 0.0); slices.len()];
    }

    let mut cumulative = 0u64;
    slices
        .iter()
        .map(|slice| {
            let start = cumulative as f32 / total as f32 * TAU;
            cumulative += slice.count;
            (start, cumulative as f32 / total as f32 * TAU)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(label: &str, count: u64) -> PieSlice {
        PieSlice {
            label: label.to_string(),
            count,
            percent: 0.0,
        }
    }

    #[test]
    fn test_wedges_cover_full_turn() {
        let w = wedges(&[slice("Subscriber", 720), slice("Customer", 280)]);
        assert_eq!(w[0].0, 0.0);
        assert_eq!(w[0].1, w[1].0);
        assert!((w[1].1 - TAU).abs() < 1e-5);
        assert!((w[0].1 / TAU - 0.72).abs() < 1e-5);
    }

    #[test]
    fn test_zero_total_has_empty_wedges() {
        assert_eq!(wedges(&[slice("a", 0)]), vec![(0.0, 0.0)]);
    }
}
