pub mod gesture;
pub mod grid;
pub mod notify;
pub mod quake;
pub mod time_window;
pub mod timeline;

pub use grid::{DividerKind, Grid, LabelKind};
pub use quake::{Quake, QuakeFilter};
pub use time_window::{RangeCallback, TimeWindowControl};
pub use timeline::{SelectedRange, TimeBounds, ViewMode, VisibleRange};
