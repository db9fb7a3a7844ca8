use eframe::egui::{Context, PointerButton, Pos2, Rect, Stroke, Ui};
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, PlotUi};

use crate::color;
use crate::interaction::{DragEffect, PointerEvent};
use crate::selection::Selection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Waveform plot (central panel)
// ---------------------------------------------------------------------------

/// What one frame of the plot hands back to the caller.
struct PlotFrame {
    area: Rect,
    /// Screen x of the selection's start and end, when there is one.
    band_x: Option<(f32, f32)>,
    events: Vec<PointerEvent>,
}

/// Render the active column and its selection, then feed pointer input back
/// into the session.
pub fn waveform_plot(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a table and pick a column  (File → Open…)");
        });
        return;
    };

    let column = &session.column;
    let selection = session.selection;
    let ctx = ui.ctx().clone();

    ui.heading(format!("Waveform – column: {}", column.name()));

    let frame = Plot::new("waveform_plot")
        .x_axis_label("Index")
        .y_axis_label("Value")
        // primary drags move the selection instead of panning
        .allow_drag(false)
        .allow_boxed_zoom(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = column
                .values()
                .iter()
                .enumerate()
                .map(|(i, &v)| [i as f64, v])
                .collect();
            plot_ui.line(
                Line::new(points)
                    .name(column.name())
                    .color(color::waveform_line())
                    .width(1.0),
            );

            PlotFrame {
                area: plot_ui.response().rect,
                band_x: selection.map(|sel| screen_edges(plot_ui, &sel)),
                events: pointer_events(plot_ui, &ctx),
            }
        })
        .inner;

    if let Some(band) = frame
        .band_x
        .and_then(|(x0, x1)| selection_band(frame.area, x0, x1))
    {
        paint_selection(ui, frame.area, band);
    }

    for event in frame.events {
        if state.handle_pointer(event) == DragEffect::Redraw {
            ctx.request_repaint();
        }
    }
}

fn screen_edges(plot_ui: &PlotUi, sel: &Selection) -> (f32, f32) {
    let x0 = plot_ui.screen_from_plot(PlotPoint::new(sel.start() as f64, 0.0)).x;
    let x1 = plot_ui.screen_from_plot(PlotPoint::new(sel.end() as f64, 0.0)).x;
    (x0, x1)
}

/// The band between two screen x positions, spanning the plot area from top
/// to bottom and clipped to it. `None` when it lies entirely off-screen.
fn selection_band(area: Rect, x0: f32, x1: f32) -> Option<Rect> {
    if !x0.is_finite() || !x1.is_finite() {
        return None;
    }
    let left = x0.min(x1).max(area.left());
    let right = x0.max(x1).min(area.right());
    if left > right {
        return None;
    }
    Some(Rect::from_x_y_ranges(left..=right, area.y_range()))
}

/// One translucent band with outlined edges, painted over the plot area.
fn paint_selection(ui: &Ui, area: Rect, band: Rect) {
    let painter = ui.painter_at(area);
    let outline = Stroke::new(1.0, color::selection_outline());
    painter.rect_filled(band, 0.0, color::selection_fill());
    painter.vline(band.left(), band.y_range(), outline);
    painter.vline(band.right(), band.y_range(), outline);
}

/// Gather this frame's primary-button drag from the plot response.
fn pointer_events(plot_ui: &PlotUi, ctx: &Context) -> Vec<PointerEvent> {
    let response = plot_ui.response();
    let (press_origin, pointer) =
        ctx.input(|i| (i.pointer.press_origin(), i.pointer.interact_pos()));

    translate(
        response.rect,
        press_origin,
        pointer,
        response.drag_started_by(PointerButton::Primary),
        response.dragged_by(PointerButton::Primary),
        response.drag_stopped_by(PointerButton::Primary),
        |pos| plot_ui.plot_from_screen(pos).x,
    )
}

/// Turn raw drag flags into index-space events.
///
/// A press is hit-tested where the button went down, not where egui first
/// recognised the drag. Press and move outside `area` are dropped; release is
/// always forwarded.
fn translate(
    area: Rect,
    press_origin: Option<Pos2>,
    pointer: Option<Pos2>,
    started: bool,
    dragging: bool,
    stopped: bool,
    to_x: impl Fn(Pos2) -> f64,
) -> Vec<PointerEvent> {
    let inside = |p: &Pos2| area.contains(*p);

    let mut events = Vec::new();
    if started {
        if let Some(pos) = press_origin.filter(inside) {
            events.push(PointerEvent::Press(to_x(pos)));
        }
    }
    if dragging {
        if let Some(pos) = pointer.filter(inside) {
            events.push(PointerEvent::Move(to_x(pos)));
        }
    }
    if stopped {
        events.push(PointerEvent::Release);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Rect {
        Rect::from_min_max(Pos2::new(100.0, 50.0), Pos2::new(500.0, 350.0))
    }

    /// One screen pixel per index, origin at the area's left edge.
    fn to_x(pos: Pos2) -> f64 {
        (pos.x - 100.0) as f64
    }

    #[test]
    fn press_outside_area_is_dropped() {
        let origin = Some(Pos2::new(50.0, 200.0));
        let events = translate(area(), origin, origin, true, false, false, to_x);
        assert!(events.is_empty());
    }

    #[test]
    fn move_outside_area_is_dropped() {
        let pointer = Some(Pos2::new(200.0, 400.0));
        let events = translate(area(), None, pointer, false, true, false, to_x);
        assert!(events.is_empty());
    }

    #[test]
    fn release_outside_area_is_forwarded() {
        let pointer = Some(Pos2::new(900.0, 900.0));
        let events = translate(area(), None, pointer, false, true, true, to_x);
        assert_eq!(events, vec![PointerEvent::Release]);

        let events = translate(area(), None, None, false, false, true, to_x);
        assert_eq!(events, vec![PointerEvent::Release]);
    }

    #[test]
    fn press_uses_origin_not_current_position() {
        let origin = Some(Pos2::new(110.0, 200.0));
        let pointer = Some(Pos2::new(118.0, 200.0));
        let events = translate(area(), origin, pointer, true, true, false, to_x);
        assert_eq!(events, vec![PointerEvent::Press(10.0), PointerEvent::Move(18.0)]);
    }

    #[test]
    fn press_origin_outside_is_dropped_even_if_pointer_moved_in() {
        let origin = Some(Pos2::new(95.0, 200.0));
        let pointer = Some(Pos2::new(105.0, 200.0));
        let events = translate(area(), origin, pointer, true, false, false, to_x);
        assert!(events.is_empty());
    }

    #[test]
    fn band_spans_full_plot_height() {
        let band = selection_band(area(), 150.0, 300.0).unwrap();
        assert_eq!(band.top(), area().top());
        assert_eq!(band.bottom(), area().bottom());
        assert_eq!((band.left(), band.right()), (150.0, 300.0));
    }

    #[test]
    fn band_is_ordered_and_clipped_to_area() {
        let band = selection_band(area(), 800.0, 40.0).unwrap();
        assert_eq!((band.left(), band.right()), (100.0, 500.0));
        assert_eq!(band.height(), area().height());
    }

    #[test]
    fn band_off_screen_is_skipped() {
        assert_eq!(selection_band(area(), 600.0, 900.0), None);
        assert_eq!(selection_band(area(), -50.0, 20.0), None);
        assert_eq!(selection_band(area(), f32::NAN, 200.0), None);
    }
}
