use chrono::{Datelike, Months, NaiveDate};

use super::timeline::{MonthWindow, TimeBounds, ViewMode, VisibleRange};

/// Calendar month the fiscal year starts in (July).
pub const FISCAL_YEAR_START_MONTH: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerKind {
    Day,
    Month,
    /// Start of a fiscal year (1 July), drawn heavier.
    FiscalYear,
}

/// A vertical line on the track, positioned as a percentage of its width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub position: f32,
    pub kind: DividerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Day,
    Year,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLabel {
    pub position: f32,
    pub text: String,
    pub kind: LabelKind,
}

/// Dividers and labels for one visible range, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    pub dividers: Vec<Divider>,
    pub labels: Vec<GridLabel>,
}

impl Grid {
    fn divider(&mut self, position: f32, kind: DividerKind) {
        self.dividers.push(Divider { position, kind });
    }

    fn label(&mut self, position: f32, text: impl Into<String>, kind: LabelKind) {
        self.labels.push(GridLabel {
            position,
            text: text.into(),
            kind,
        });
    }
}

/// Build the divider/label layout for `range`.
pub fn build_grid(range: &VisibleRange, bounds: &TimeBounds) -> Grid {
    match range.mode {
        ViewMode::Year => year_grid(bounds),
        ViewMode::Month => {
            let window = range.month_window.unwrap_or_else(|| MonthWindow {
                first_index: months_between(bounds.epoch, range.first),
                count: months_between(range.first, range.last) + 1,
            });
            month_grid(window, bounds)
        }
        ViewMode::Day => day_grid(range.first, range.day_count()),
    }
}

/// Segments are spaced by year count, not elapsed days.
fn year_grid(bounds: &TimeBounds) -> Grid {
    let mut grid = Grid::default();
    let start_year = bounds.epoch.year();
    let years = bounds.total_years().max(1);

    for i in 0..=years {
        let pos = percent(i, years);
        grid.divider(pos, DividerKind::FiscalYear);
        if i < years {
            grid.label(pos, (start_year as i64 + i).to_string(), LabelKind::Year);
        }
    }
    grid
}

fn month_grid(window: MonthWindow, bounds: &TimeBounds) -> Grid {
    let mut grid = Grid::default();
    let epoch_month = bounds.epoch.with_day(1).unwrap_or(bounds.epoch);

    for i in 0..window.count.max(0) {
        let Some(month) = u32::try_from(window.first_index + i)
            .ok()
            .and_then(|n| epoch_month.checked_add_months(Months::new(n)))
        else {
            break;
        };
        // A lone month sits in the middle of the track.
        let pos = if window.count > 1 {
            percent(i, window.count - 1)
        } else {
            50.0
        };

        if month.month() == FISCAL_YEAR_START_MONTH {
            grid.divider(pos, DividerKind::FiscalYear);
            grid.label(pos, month.year().to_string(), LabelKind::Year);
        } else {
            grid.divider(pos, DividerKind::Month);
        }
    }
    grid
}

fn day_grid(first: NaiveDate, days: i64) -> Grid {
    let mut grid = Grid::default();
    let days = days.max(1);
    let labelled = |i: i64| days <= 3 || i == 0 || i == (days - 1) / 2 || i == days - 1;

    for (i, date) in (0..days).zip(first.iter_days()) {
        let pos = percent(i, (days - 1).max(1));
        let fiscal = date.month() == FISCAL_YEAR_START_MONTH && date.day() == 1;

        grid.divider(
            pos,
            if fiscal {
                DividerKind::FiscalYear
            } else {
                DividerKind::Day
            },
        );
        if labelled(i) {
            grid.label(pos, date.day().to_string(), LabelKind::Day);
        }
        if fiscal {
            grid.label(pos, date.year().to_string(), LabelKind::Year);
        }
    }
    grid
}

fn percent(index: i64, span: i64) -> f32 {
    (index as f64 / span.max(1) as f64 * 100.0) as f32
}

fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() - from.year()) as i64 * 12 + to.month() as i64 - from.month() as i64
}
