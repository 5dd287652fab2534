use std::time::Instant;

use crate::model::{DividerKind, LabelKind, TimeWindowControl, ViewMode};
use crate::ui::theme;
use egui::{Align2, CursorIcon, Pos2, Rounding, Sense, Stroke, Ui, Vec2};

/// Render the time window track and readout, feeding pointer and wheel input
/// into `control`. Returns the track's response.
pub fn show_time_window_slider(control: &mut TimeWindowControl, ui: &mut Ui) -> egui::Response {
    let now = Instant::now();
    let width = ui.available_width().max(1.0);
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(width, theme::TRACK_HEIGHT), Sense::drag());

    // Wheel zooms; the delta is consumed so surrounding scroll areas stay put.
    if response.hovered() {
        let scroll_y = ui.input(|i| i.raw_scroll_delta.y);
        if scroll_y != 0.0 {
            // egui reports wheel-away-from-user as positive, which zooms in.
            control.wheel(-scroll_y, now);
            ui.input_mut(|i| {
                i.raw_scroll_delta = Vec2::ZERO;
                i.smooth_scroll_delta = Vec2::ZERO;
            });
        }
    }

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            control.begin_drag(pos.x);
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            control.drag_to(pos.x, rect.width(), now);
        }
        ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
    } else if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }
    if response.drag_stopped() {
        control.end_drag();
    }

    control.poll(now);
    if let Some(remaining) = control.time_until_emit(now) {
        ui.ctx().request_repaint_after(remaining);
    }

    let range = control.visible_range();
    let grid = control.grid();
    let painter = ui.painter_at(rect.expand(2.0));

    let fill = if control.is_dragging() {
        theme::TRACK_DRAGGING
    } else {
        theme::TRACK
    };
    painter.rect_filled(rect, Rounding::same(theme::TRACK_ROUNDING), fill);

    let x_at = |position: f32| rect.left() + position / 100.0 * rect.width();

    for divider in &grid.dividers {
        let x = x_at(divider.position);
        let stroke = match divider.kind {
            DividerKind::FiscalYear => Stroke::new(2.0, theme::DIVIDER_YEAR),
            DividerKind::Month => Stroke::new(1.0, theme::DIVIDER_MONTH),
            DividerKind::Day => Stroke::new(1.0, theme::DIVIDER_DAY),
        };
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            stroke,
        );
    }

    // Day numbers and year labels share a row except in day mode, where
    // years drop to a second row under their July 1 divider.
    let rows = if range.mode == ViewMode::Day { 2.0 } else { 1.0 };
    let (label_rect, _) = ui.allocate_exact_size(
        Vec2::new(width, theme::LABEL_ROW_HEIGHT * rows),
        Sense::hover(),
    );
    let label_painter = ui.painter_at(label_rect);
    for label in &grid.labels {
        let x = x_at(label.position);
        let row = match (range.mode, label.kind) {
            (ViewMode::Day, LabelKind::Year) => 1.0,
            _ => 0.0,
        };
        let anchor = if label.position <= 1.0 || range.mode == ViewMode::Year {
            Align2::LEFT_TOP
        } else if label.position >= 99.0 {
            Align2::RIGHT_TOP
        } else {
            Align2::CENTER_TOP
        };
        let (font, color) = match label.kind {
            LabelKind::Year => (theme::font_header(), theme::TEXT_PRIMARY),
            LabelKind::Day => (theme::font_sub(), theme::TEXT_SECONDARY),
        };
        label_painter.text(
            Pos2::new(x, label_rect.top() + 2.0 + row * theme::LABEL_ROW_HEIGHT),
            anchor,
            &label.text,
            font,
            color,
        );
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(range.describe())
                .font(theme::font_header())
                .strong(),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!(
                    "{} (scroll to zoom time window, drag to shift)",
                    range.mode.label()
                ))
                .font(theme::font_small())
                .color(theme::TEXT_DIM),
            );
        });
    });

    response
}

