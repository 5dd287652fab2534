pub mod dialogs;
pub mod quake_table;
pub mod theme;
pub mod time_window_slider;
pub mod toolbar;
