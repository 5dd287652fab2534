use std::cell::Cell;
use std::rc::Rc;

use super::timeline::{ViewMode, ZoomState};

/// Offset change per full track width of drag.
pub const DRAG_SENSITIVITY_DAY: f64 = 0.1;
pub const DRAG_SENSITIVITY_OTHER: f64 = 2.0;

/// Zoom change per wheel event.
pub const WHEEL_STEP_DAY: f64 = 0.001;
pub const WHEEL_STEP_OTHER: f64 = 0.005;

/// Counts pointer captures that are currently held.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    active: Rc<Cell<usize>>,
}

impl CaptureRegistry {
    pub fn acquire(&self) -> DragCapture {
        self.active.set(self.active.get() + 1);
        log::trace!("drag capture acquired ({} held)", self.active.get());
        DragCapture {
            active: Rc::clone(&self.active),
        }
    }

    pub fn active(&self) -> usize {
        self.active.get()
    }
}

/// A held move/release capture. Dropping it releases the capture, so a
/// capture is released exactly once whichever way the drag ends.
#[derive(Debug)]
pub struct DragCapture {
    active: Rc<Cell<usize>>,
}

impl Drop for DragCapture {
    fn drop(&mut self) {
        self.active.set(self.active.get().saturating_sub(1));
        log::trace!("drag capture released ({} held)", self.active.get());
    }
}

#[derive(Debug)]
struct DragSession {
    start_x: f32,
    start_offset: f64,
    _capture: DragCapture,
}

/// Turns pointer drags and wheel steps into [`ZoomState`] updates.
#[derive(Debug, Default)]
pub struct GestureController {
    captures: CaptureRegistry,
    session: Option<DragSession>,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a drag at pointer `x`. Any drag still in progress is released first.
    pub fn begin_drag(&mut self, x: f32, state: &ZoomState) {
        self.session = None;
        self.session = Some(DragSession {
            start_x: x,
            start_offset: state.offset(),
            _capture: self.captures.acquire(),
        });
    }

    /// Move the active drag to pointer `x`. Dragging right moves the window
    /// toward earlier dates. Returns whether the offset changed.
    pub fn drag_to(&self, x: f32, track_width: f32, state: &mut ZoomState) -> bool {
        let Some(session) = &self.session else {
            return false;
        };
        let sensitivity = match state.mode() {
            ViewMode::Day => DRAG_SENSITIVITY_DAY,
            ViewMode::Month | ViewMode::Year => DRAG_SENSITIVITY_OTHER,
        };
        let width = f64::from(track_width.max(1.0));
        let delta = -f64::from(x - session.start_x) / width * sensitivity;
        state.set_offset(session.start_offset + delta)
    }

    /// Finish the drag and release its capture. Returns whether a drag was active.
    pub fn end_drag(&mut self) -> bool {
        self.session.take().is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Apply one wheel event. `delta_y > 0` (scrolling toward the user) zooms
    /// out, `delta_y < 0` zooms in. Returns whether the state changed.
    pub fn wheel(&self, delta_y: f32, state: &mut ZoomState) -> bool {
        if delta_y == 0.0 || delta_y.is_nan() {
            return false;
        }
        let step = match state.mode() {
            ViewMode::Day => WHEEL_STEP_DAY,
            ViewMode::Month | ViewMode::Year => WHEEL_STEP_OTHER,
        };
        let step = if delta_y > 0.0 { step } else { -step };
        state.set_zoom(state.zoom() + step)
    }

    pub fn active_captures(&self) -> usize {
        self.captures.active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_right_moves_toward_earlier_dates() {
        let mut gestures = GestureController::new();
        let mut state = ZoomState::new(0.5, 0.5);
        gestures.begin_drag(100.0, &state);
        assert!(gestures.drag_to(110.0, 400.0, &mut state));
        // 10 / 400 * 2.0
        assert!((state.offset() - 0.45).abs() < 1e-9);

        // Relative to the start, not the previous move.
        gestures.drag_to(90.0, 400.0, &mut state);
        assert!((state.offset() - 0.55).abs() < 1e-9);
    }

    #[test]
    fn day_mode_drags_slowly() {
        let mut gestures = GestureController::new();
        let mut state = ZoomState::new(0.05, 0.5);
        gestures.begin_drag(0.0, &state);
        gestures.drag_to(-200.0, 200.0, &mut state);
        assert!((state.offset() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn drag_is_clamped() {
        let mut gestures = GestureController::new();
        let mut state = ZoomState::new(0.5, 0.9);
        gestures.begin_drag(0.0, &state);
        gestures.drag_to(-10_000.0, 100.0, &mut state);
        assert_eq!(state.offset(), 1.0);
        gestures.drag_to(10_000.0, 100.0, &mut state);
        assert_eq!(state.offset(), 0.0);
        // Zero-width track does not divide by zero.
        gestures.drag_to(1.0, 0.0, &mut state);
        assert!(state.offset().is_finite());
    }

    #[test]
    fn moves_without_a_drag_are_ignored() {
        let gestures = GestureController::new();
        let mut state = ZoomState::new(0.5, 0.5);
        assert!(!gestures.drag_to(50.0, 100.0, &mut state));
        assert_eq!(state.offset(), 0.5);
    }

    #[test]
    fn capture_released_exactly_once() {
        let mut gestures = GestureController::new();
        let state = ZoomState::default();
        gestures.begin_drag(0.0, &state);
        assert_eq!(gestures.active_captures(), 1);
        gestures.begin_drag(5.0, &state);
        assert_eq!(gestures.active_captures(), 1);
        assert!(gestures.end_drag());
        assert_eq!(gestures.active_captures(), 0);
        assert!(!gestures.end_drag());
        assert_eq!(gestures.active_captures(), 0);
    }

    #[test]
    fn dropping_mid_drag_releases_capture() {
        let registry;
        {
            let mut gestures = GestureController::new();
            registry = gestures.captures.clone();
            gestures.begin_drag(0.0, &ZoomState::default());
            assert_eq!(registry.active(), 1);
        }
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn wheel_steps_depend_on_mode() {
        let gestures = GestureController::new();
        let mut state = ZoomState::new(0.5, 0.5);
        assert!(gestures.wheel(3.0, &mut state));
        assert!((state.zoom() - 0.505).abs() < 1e-9);
        gestures.wheel(-1.0, &mut state);
        gestures.wheel(-1.0, &mut state);
        assert!((state.zoom() - 0.495).abs() < 1e-9);

        let mut day = ZoomState::new(0.05, 0.5);
        gestures.wheel(-1.0, &mut day);
        assert!((day.zoom() - 0.049).abs() < 1e-9);
        assert!(!gestures.wheel(0.0, &mut day));
    }

    #[test]
    fn wheel_clamps_and_pins_offset_when_fully_out() {
        let gestures = GestureController::new();
        let mut state = ZoomState::new(0.998, 0.2);
        assert!(gestures.wheel(1.0, &mut state));
        assert_eq!(state.zoom(), 1.0);
        assert_eq!(state.offset(), 1.0);
        assert!(!gestures.wheel(1.0, &mut state));

        let mut tight = ZoomState::new(0.0105, 0.2);
        gestures.wheel(-1.0, &mut tight);
        assert_eq!(tight.zoom(), 0.01);
    }
}
