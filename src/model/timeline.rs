use chrono::{Datelike, Months, NaiveDate};

/// First selectable date of the catalogue.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2020, 6, 1) {
    Some(date) => date,
    None => panic!("invalid epoch"),
};

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 1.0;

/// Zoom levels below this show single days.
pub const DAY_MODE_BELOW: f64 = 0.1;
/// Zoom levels at or above this show the whole span by year.
pub const YEAR_MODE_FROM: f64 = 0.95;

pub const MIN_DAYS_SHOWN: i64 = 3;
pub const MAX_DAYS_SHOWN: i64 = 30;

/// Granularity the time window is currently displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    Day,
    Month,
    Year,
}

impl ViewMode {
    /// Resolve the view mode for a zoom level.
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < DAY_MODE_BELOW {
            ViewMode::Day
        } else if zoom >= YEAR_MODE_FROM {
            ViewMode::Year
        } else {
            ViewMode::Month
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Day => "Day view",
            ViewMode::Month => "Month view",
            ViewMode::Year => "Year view",
        }
    }
}

/// The fixed selectable span: the epoch and the session's "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub epoch: NaiveDate,
    pub now: NaiveDate,
}

impl TimeBounds {
    /// Build bounds from explicit dates. A `now` earlier than the epoch is
    /// floored to the epoch so the span is never empty.
    pub fn new(epoch: NaiveDate, now: NaiveDate) -> Self {
        Self {
            epoch,
            now: now.max(epoch),
        }
    }

    /// Sample the local clock once. Callers hold on to the result for the
    /// whole session.
    pub fn from_clock() -> Self {
        Self::new(EPOCH, chrono::Local::now().date_naive())
    }

    pub fn total_days(&self) -> i64 {
        (self.now - self.epoch).num_days()
    }

    /// Whole months between epoch and now, counting the partial first month.
    pub fn total_months(&self) -> i64 {
        (self.now.year() - self.epoch.year()) as i64 * 12
            + (self.now.month() as i64 - self.epoch.month() as i64)
            + 1
    }

    pub fn total_years(&self) -> i64 {
        (self.now.year() - self.epoch.year()) as i64 + 1
    }
}

/// The two continuous interaction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomState {
    zoom: f64,
    offset: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            zoom: MAX_ZOOM,
            offset: 1.0,
        }
    }
}

impl ZoomState {
    pub fn new(zoom: f64, offset: f64) -> Self {
        let mut state = Self::default();
        state.set_offset(offset);
        state.set_zoom(zoom);
        state
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn mode(&self) -> ViewMode {
        ViewMode::from_zoom(self.zoom)
    }

    /// Set the zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`. Fully zoomed
    /// out pins the offset to the end of the span. Returns whether anything
    /// changed.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        let before = *self;
        self.zoom = clamp_finite(zoom, MIN_ZOOM, MAX_ZOOM, self.zoom);
        if self.zoom >= MAX_ZOOM {
            self.offset = 1.0;
        }
        *self != before
    }

    /// Set the pan offset, clamped to `[0, 1]`. Returns whether it changed.
    pub fn set_offset(&mut self, offset: f64) -> bool {
        let before = self.offset;
        self.offset = clamp_finite(offset, 0.0, 1.0, self.offset);
        self.offset != before
    }
}

fn clamp_finite(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Month-mode window position, kept for grid rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    /// Months after the epoch month of the first visible month.
    pub first_index: i64,
    pub count: i64,
}

/// A concrete calendar interval plus the precision it was computed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
    pub mode: ViewMode,
    pub month_window: Option<MonthWindow>,
}

impl VisibleRange {
    /// Number of calendar days covered, inclusive.
    pub fn day_count(&self) -> i64 {
        (self.last - self.first).num_days() + 1
    }

    /// The range in the shape handed to consumers.
    pub fn selection(&self) -> SelectedRange {
        match self.mode {
            ViewMode::Day => SelectedRange::Day {
                start_year: self.first.year(),
                start_month: self.first.month(),
                end_year: self.last.year(),
                end_month: self.last.month(),
                start_day: self.first.day(),
                end_day: self.last.day(),
            },
            ViewMode::Month | ViewMode::Year => SelectedRange::Month {
                start_year: self.first.year(),
                start_month: self.first.month(),
                end_year: self.last.year(),
                end_month: self.last.month(),
            },
        }
    }

    /// Human readable "from to" readout.
    pub fn describe(&self) -> String {
        let fmt = match self.mode {
            ViewMode::Day => "%-d %b %Y",
            ViewMode::Month | ViewMode::Year => "%b %Y",
        };
        format!("{} to {}", self.first.format(fmt), self.last.format(fmt))
    }
}

/// Width of the day-mode window for a zoom level. Widens from
/// `MIN_DAYS_SHOWN` to `MAX_DAYS_SHOWN` as zoom approaches the month
/// threshold.
pub fn days_to_show(zoom: f64) -> i64 {
    let t = ((zoom - MIN_ZOOM) / (DAY_MODE_BELOW - MIN_ZOOM)).clamp(0.0, 1.0);
    (MIN_DAYS_SHOWN as f64 + t * (MAX_DAYS_SHOWN - MIN_DAYS_SHOWN) as f64).round() as i64
}

/// Map a zoom/offset pair onto calendar boundaries.
///
/// Always returns `epoch <= first <= last <= now`.
pub fn visible_range(mode: ViewMode, zoom: f64, offset: f64, bounds: &TimeBounds) -> VisibleRange {
    let TimeBounds { epoch, now } = *bounds;

    match mode {
        ViewMode::Year => VisibleRange {
            first: epoch,
            last: now,
            mode,
            month_window: None,
        },
        ViewMode::Month => {
            let total = bounds.total_months();
            let count = ((total as f64 * zoom).ceil() as i64).max(1);
            let max_offset = (total - count).max(0);
            let first_index = (offset * max_offset as f64).round() as i64;

            let epoch_month = month_start(epoch);
            let first = add_months(epoch_month, first_index).clamp(epoch, now);
            let last = end_of_month(add_months(month_start(first), count - 1)).min(now);

            VisibleRange {
                first,
                last: last.max(first),
                mode,
                month_window: Some(MonthWindow { first_index, count }),
            }
        }
        ViewMode::Day => {
            let shown = days_to_show(zoom);
            let max_offset = (bounds.total_days() - shown + 1).max(0);
            let day_offset = (offset * max_offset as f64).round() as i64;

            let first = (epoch + chrono::Duration::days(day_offset)).min(now);
            let last = (first + chrono::Duration::days(shown - 1)).min(now);

            VisibleRange {
                first,
                last,
                mode,
                month_window: None,
            }
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn add_months(date: NaiveDate, months: i64) -> NaiveDate {
    u32::try_from(months)
        .ok()
        .and_then(|m| date.checked_add_months(Months::new(m)))
        .unwrap_or(date)
}

/// Last calendar day of the month containing `date`.
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Memo of the last computed range, keyed by `(mode, zoom, offset)`.
#[derive(Debug, Default)]
pub struct RangeCache {
    entry: Option<((ViewMode, u64, u64), VisibleRange)>,
    misses: usize,
}

impl RangeCache {
    pub fn get(&mut self, state: &ZoomState, bounds: &TimeBounds) -> VisibleRange {
        let key = (state.mode(), state.zoom().to_bits(), state.offset().to_bits());
        if let Some((cached_key, range)) = self.entry {
            if cached_key == key {
                return range;
            }
        }
        let range = visible_range(state.mode(), state.zoom(), state.offset(), bounds);
        self.entry = Some((key, range));
        self.misses += 1;
        range
    }

    /// How many times the range had to be recomputed.
    pub fn misses(&self) -> usize {
        self.misses
    }
}

/// The range as delivered to consumers. Precision follows the view mode:
/// day mode carries day numbers, month and year modes do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectedRange {
    Month {
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
    },
    Day {
        start_year: i32,
        start_month: u32,
        end_year: i32,
        end_month: u32,
        start_day: u32,
        end_day: u32,
    },
}

impl SelectedRange {
    /// The whole span between `bounds.epoch` and `bounds.now` at month precision.
    pub fn full(bounds: &TimeBounds) -> Self {
        SelectedRange::Month {
            start_year: bounds.epoch.year(),
            start_month: bounds.epoch.month(),
            end_year: bounds.now.year(),
            end_month: bounds.now.month(),
        }
    }

    pub fn is_day_precision(&self) -> bool {
        matches!(self, SelectedRange::Day { .. })
    }

    /// Flattened argument list: `(start_year, start_month, end_year,
    /// end_month)` followed by `(start_day, end_day)` at day precision.
    pub fn args(&self) -> Vec<i32> {
        match *self {
            SelectedRange::Month {
                start_year,
                start_month,
                end_year,
                end_month,
            } => vec![start_year, start_month as i32, end_year, end_month as i32],
            SelectedRange::Day {
                start_year,
                start_month,
                end_year,
                end_month,
                start_day,
                end_day,
            } => vec![
                start_year,
                start_month as i32,
                end_year,
                end_month as i32,
                start_day as i32,
                end_day as i32,
            ],
        }
    }

    /// Whether `date` falls inside the range at the range's precision.
    /// Both ends are inclusive.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            SelectedRange::Month {
                start_year,
                start_month,
                end_year,
                end_month,
            } => {
                let key = date.year() as i64 * 100 + date.month() as i64;
                let start = start_year as i64 * 100 + start_month as i64;
                let end = end_year as i64 * 100 + end_month as i64;
                (start..=end).contains(&key)
            }
            SelectedRange::Day {
                start_year,
                start_month,
                end_year,
                end_month,
                start_day,
                end_day,
            } => {
                let key = date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64;
                let start = start_year as i64 * 10_000 + start_month as i64 * 100 + start_day as i64;
                let end = end_year as i64 * 10_000 + end_month as i64 * 100 + end_day as i64;
                (start..=end).contains(&key)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bounds(now: NaiveDate) -> TimeBounds {
        TimeBounds::new(EPOCH, now)
    }

    #[test]
    fn mode_thresholds_are_pinned() {
        assert_eq!(ViewMode::from_zoom(0.01), ViewMode::Day);
        assert_eq!(ViewMode::from_zoom(0.0999), ViewMode::Day);
        assert_eq!(ViewMode::from_zoom(0.1), ViewMode::Month);
        assert_eq!(ViewMode::from_zoom(0.5), ViewMode::Month);
        assert_eq!(ViewMode::from_zoom(0.9499), ViewMode::Month);
        assert_eq!(ViewMode::from_zoom(0.95), ViewMode::Year);
        assert_eq!(ViewMode::from_zoom(1.0), ViewMode::Year);
    }

    #[test]
    fn totals_count_partial_first_month() {
        let b = bounds(date(2021, 6, 1));
        assert_eq!(b.total_months(), 13);
        assert_eq!(b.total_days(), 365);
        assert_eq!(b.total_years(), 2);
    }

    #[test]
    fn now_before_epoch_is_floored() {
        let b = bounds(date(2019, 1, 1));
        assert_eq!(b.now, EPOCH);
        assert_eq!(b.total_days(), 0);
        assert_eq!(b.total_months(), 1);
    }

    #[test]
    fn zoom_state_clamps_and_pins_offset() {
        let mut state = ZoomState::new(0.5, 0.2);
        assert!(state.set_zoom(-3.0));
        assert_eq!(state.zoom(), MIN_ZOOM);
        assert!(state.set_offset(4.0));
        assert_eq!(state.offset(), 1.0);
        state.set_offset(0.3);
        state.set_zoom(7.0);
        assert_eq!(state.zoom(), MAX_ZOOM);
        assert_eq!(state.offset(), 1.0);
        assert!(!state.set_zoom(1.0));
        assert!(!state.set_offset(f64::NAN));
    }

    #[test]
    fn bounds_hold_everywhere() {
        let nows = [
            EPOCH,
            date(2020, 6, 2),
            date(2020, 7, 31),
            date(2021, 2, 28),
            date(2024, 2, 29),
            date(2026, 10, 18),
        ];
        for now in nows {
            let b = bounds(now);
            for z in 1..=100 {
                let zoom = z as f64 / 100.0;
                for o in 0..=20 {
                    let offset = o as f64 / 20.0;
                    let mode = ViewMode::from_zoom(zoom);
                    let r = visible_range(mode, zoom, offset, &b);
                    assert!(
                        b.epoch <= r.first && r.first <= r.last && r.last <= b.now,
                        "now={now} zoom={zoom} offset={offset} got {r:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn year_mode_ignores_offset() {
        let b = bounds(date(2025, 3, 14));
        for offset in [0.0, 0.25, 0.5, 1.0] {
            let r = visible_range(ViewMode::Year, 1.0, offset, &b);
            assert_eq!((r.first, r.last), (EPOCH, b.now));
        }
    }

    #[test]
    fn day_window_widens_with_zoom() {
        assert_eq!(days_to_show(0.01), 3);
        assert_eq!(days_to_show(0.0999), 30);
        let mut previous = 0;
        for step in 0..90 {
            let zoom = 0.01 + step as f64 * 0.001;
            let shown = days_to_show(zoom);
            assert!(shown >= previous, "zoom {zoom} shrank to {shown}");
            previous = shown;
        }
    }

    #[test]
    fn day_mode_window_from_epoch() {
        let b = bounds(date(2021, 6, 1));
        let r = visible_range(ViewMode::Day, 0.01, 0.0, &b);
        assert_eq!(r.first, EPOCH);
        assert_eq!(r.last, date(2020, 6, 3));
        assert_eq!(r.day_count(), 3);
    }

    #[test]
    fn day_mode_at_end_is_clipped_to_now() {
        let b = bounds(date(2021, 6, 1));
        let r = visible_range(ViewMode::Day, 0.01, 1.0, &b);
        assert_eq!(r.last, b.now);
        assert!(r.first <= r.last);
    }

    #[test]
    fn month_window_example() {
        let b = bounds(date(2021, 6, 1));
        let r = visible_range(ViewMode::Month, 0.5, 0.0, &b);
        assert_eq!(
            r.month_window,
            Some(MonthWindow {
                first_index: 0,
                count: 7
            })
        );
        assert_eq!(r.first, date(2020, 6, 1));
        assert_eq!(r.last, date(2020, 12, 31));
    }

    #[test]
    fn month_window_at_end_is_clipped_to_now() {
        let b = bounds(date(2021, 6, 15));
        let r = visible_range(ViewMode::Month, 0.5, 1.0, &b);
        // 13 months total, 7 visible, starting six months in.
        assert_eq!(r.first, date(2020, 12, 1));
        assert_eq!(r.last, b.now);
    }

    #[test]
    fn end_of_month_handles_february() {
        assert_eq!(end_of_month(date(2024, 2, 10)), date(2024, 2, 29));
        assert_eq!(end_of_month(date(2023, 2, 1)), date(2023, 2, 28));
        assert_eq!(end_of_month(date(2023, 12, 31)), date(2023, 12, 31));
    }

    #[test]
    fn selection_precision_follows_mode() {
        let b = bounds(date(2023, 1, 1));
        let day = visible_range(ViewMode::Day, 0.05, 0.5, &b).selection();
        assert!(day.is_day_precision());
        assert_eq!(day.args().len(), 6);

        let month = visible_range(ViewMode::Month, 0.4, 0.5, &b).selection();
        assert_eq!(month.args().len(), 4);

        let year = visible_range(ViewMode::Year, 1.0, 1.0, &b).selection();
        assert_eq!(year.args(), vec![2020, 6, 2023, 1]);
        assert_eq!(year, SelectedRange::full(&b));
    }

    #[test]
    fn contains_respects_precision() {
        let month = SelectedRange::Month {
            start_year: 2021,
            start_month: 3,
            end_year: 2021,
            end_month: 5,
        };
        assert!(month.contains(date(2021, 3, 1)));
        assert!(month.contains(date(2021, 5, 31)));
        assert!(!month.contains(date(2021, 6, 1)));

        let day = SelectedRange::Day {
            start_year: 2021,
            start_month: 3,
            end_year: 2021,
            end_month: 3,
            start_day: 10,
            end_day: 12,
        };
        assert!(day.contains(date(2021, 3, 12)));
        assert!(!day.contains(date(2021, 3, 13)));
        assert!(!day.contains(date(2021, 3, 9)));
    }

    #[test]
    fn cache_skips_recomputation_for_same_key() {
        let b = bounds(date(2022, 1, 1));
        let mut cache = RangeCache::default();
        let state = ZoomState::new(0.3, 0.4);
        let first = cache.get(&state, &b);
        let second = cache.get(&state, &b);
        assert_eq!(first, second);
        assert_eq!(cache.misses(), 1);
        cache.get(&ZoomState::new(0.3, 0.5), &b);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn describe_uses_mode_format() {
        let b = bounds(date(2021, 6, 1));
        let day = visible_range(ViewMode::Day, 0.01, 0.0, &b);
        assert_eq!(day.describe(), "1 Jun 2020 to 3 Jun 2020");
        let month = visible_range(ViewMode::Month, 0.5, 0.0, &b);
        assert_eq!(month.describe(), "Jun 2020 to Dec 2020");
    }
}
