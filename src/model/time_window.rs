//! The time window control: zoom/pan state, gesture handling and debounced
//! range notifications, independent of any particular UI toolkit.

use std::time::{Duration, Instant};

use super::gesture::GestureController;
use super::grid::{build_grid, Grid};
use super::notify::NotificationScheduler;
use super::timeline::{RangeCache, SelectedRange, TimeBounds, ViewMode, VisibleRange, ZoomState};

/// Receives the selected range. Called on the UI thread.
pub type RangeCallback = Box<dyn FnMut(SelectedRange)>;

pub struct TimeWindowControl {
    bounds: TimeBounds,
    state: ZoomState,
    cache: RangeCache,
    gestures: GestureController,
    scheduler: NotificationScheduler,
    /// `None` once torn down.
    on_change: Option<RangeCallback>,
    last_mode: ViewMode,
}

impl TimeWindowControl {
    /// Create the control, sampling the clock once for the session's "now".
    pub fn new(quiet_period: Duration, on_change: RangeCallback) -> Self {
        Self::with_bounds(TimeBounds::from_clock(), quiet_period, on_change)
    }

    /// Create the control over fixed bounds. The callback receives the
    /// initial range immediately.
    pub fn with_bounds(bounds: TimeBounds, quiet_period: Duration, on_change: RangeCallback) -> Self {
        let state = ZoomState::default();
        let mut control = Self {
            bounds,
            state,
            cache: RangeCache::default(),
            gestures: GestureController::new(),
            scheduler: NotificationScheduler::new(quiet_period),
            on_change: Some(on_change),
            last_mode: state.mode(),
        };
        log::debug!(
            "time window spans {} to {} ({} days)",
            bounds.epoch,
            bounds.now,
            bounds.total_days()
        );
        control.emit();
        control
    }

    pub fn bounds(&self) -> &TimeBounds {
        &self.bounds
    }

    pub fn state(&self) -> &ZoomState {
        &self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode()
    }

    pub fn visible_range(&mut self) -> VisibleRange {
        self.cache.get(&self.state, &self.bounds)
    }

    pub fn grid(&mut self) -> Grid {
        let range = self.visible_range();
        build_grid(&range, &self.bounds)
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }

    pub fn active_captures(&self) -> usize {
        self.gestures.active_captures()
    }

    pub fn begin_drag(&mut self, x: f32) {
        if self.is_torn_down() {
            return;
        }
        self.gestures.begin_drag(x, &self.state);
    }

    pub fn drag_to(&mut self, x: f32, track_width: f32, now: Instant) -> bool {
        let changed = self.gestures.drag_to(x, track_width, &mut self.state);
        if changed {
            self.changed(now);
        }
        changed
    }

    pub fn end_drag(&mut self) {
        self.gestures.end_drag();
    }

    pub fn wheel(&mut self, delta_y: f32, now: Instant) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let changed = self.gestures.wheel(delta_y, &mut self.state);
        if changed {
            self.changed(now);
        }
        changed
    }

    /// Emit the range if the quiet period has elapsed. Returns whether the
    /// callback ran.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.scheduler.poll(now) {
            self.emit();
            true
        } else {
            false
        }
    }

    /// How long until a pending emission is due.
    pub fn time_until_emit(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_remaining(now)
    }

    /// Cancel any pending emission, release any drag capture and drop the
    /// callback. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.scheduler.cancel() {
            log::debug!("cancelled pending range notification");
        }
        self.gestures.end_drag();
        self.on_change = None;
    }

    pub fn is_torn_down(&self) -> bool {
        self.on_change.is_none()
    }

    fn changed(&mut self, now: Instant) {
        let mode = self.state.mode();
        if mode != self.last_mode {
            log::debug!("view mode {:?} -> {:?}", self.last_mode, mode);
            self.last_mode = mode;
        }
        self.scheduler.schedule(now);
    }

    fn emit(&mut self) {
        let selection = self.visible_range().selection();
        if let Some(on_change) = self.on_change.as_mut() {
            log::debug!("range selected: {:?}", selection.args());
            on_change(selection);
        }
    }
}

impl Drop for TimeWindowControl {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timeline::EPOCH;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recording_control(now: NaiveDate) -> (TimeWindowControl, Rc<RefCell<Vec<SelectedRange>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let control = TimeWindowControl::with_bounds(
            TimeBounds::new(EPOCH, now),
            ms(200),
            Box::new(move |range| sink.borrow_mut().push(range)),
        );
        (control, seen)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 9, 15).unwrap()
    }

    #[test]
    fn emits_full_span_on_creation() {
        let (control, seen) = recording_control(today());
        assert_eq!(seen.borrow().as_slice(), &[SelectedRange::full(control.bounds())]);
        assert_eq!(control.mode(), ViewMode::Year);
    }

    #[test]
    fn burst_of_changes_emits_once_with_final_state() {
        let (mut control, seen) = recording_control(today());
        let t0 = Instant::now();
        for i in 0..5 {
            assert!(control.wheel(-1.0, t0 + ms(i * 10)));
        }
        assert!(!control.poll(t0 + ms(100)));
        assert!(!control.poll(t0 + ms(239)));
        assert!(control.poll(t0 + ms(240)));
        assert!(!control.poll(t0 + ms(1_000)));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!((control.state().zoom() - 0.975).abs() < 1e-9);
        assert_eq!(seen[1], control.visible_range().selection());
    }

    #[test]
    fn day_mode_emits_day_precision() {
        let (mut control, seen) = recording_control(today());
        let t0 = Instant::now();
        // 1.0 -> below 0.1 in 0.005 steps, then 0.001 steps once in day mode.
        let mut t = t0;
        while control.mode() != ViewMode::Day {
            control.wheel(-1.0, t);
            t += ms(1);
        }
        control.wheel(-1.0, t);
        assert!(control.poll(t + ms(200)));

        let last = *seen.borrow().last().unwrap();
        assert!(last.is_day_precision());
        assert_eq!(last.args().len(), 6);
    }

    #[test]
    fn month_mode_emits_month_precision() {
        let (mut control, seen) = recording_control(today());
        let t0 = Instant::now();
        for i in 0..20 {
            control.wheel(-1.0, t0 + ms(i));
        }
        assert_eq!(control.mode(), ViewMode::Month);
        control.begin_drag(200.0);
        control.drag_to(240.0, 400.0, t0 + ms(30));
        control.end_drag();
        assert!(control.poll(t0 + ms(230)));
        assert_eq!(seen.borrow().last().unwrap().args().len(), 4);
    }

    #[test]
    fn unchanged_input_does_not_schedule() {
        let (mut control, seen) = recording_control(today());
        let t0 = Instant::now();
        // Already fully zoomed out.
        assert!(!control.wheel(1.0, t0));
        assert_eq!(control.time_until_emit(t0), None);
        assert!(!control.poll(t0 + ms(500)));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn teardown_mid_drag_cancels_and_releases() {
        let (mut control, seen) = recording_control(today());
        let t0 = Instant::now();
        control.wheel(-1.0, t0);
        control.begin_drag(0.0);
        control.drag_to(-50.0, 100.0, t0 + ms(10));
        assert_eq!(control.active_captures(), 1);

        control.teardown();
        assert_eq!(control.active_captures(), 0);
        assert!(!control.poll(t0 + ms(1_000)));
        assert!(!control.wheel(-1.0, t0 + ms(1_000)));
        assert_eq!(seen.borrow().len(), 1);

        // Idempotent.
        control.teardown();
        assert_eq!(control.active_captures(), 0);
    }

    #[test]
    fn range_is_cached_between_frames() {
        let (mut control, _seen) = recording_control(today());
        control.visible_range();
        control.grid();
        control.visible_range();
        assert_eq!(control.cache.misses(), 1);
    }
}
