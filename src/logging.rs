use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

/// Initialise terminal logging for this crate at `level`.
pub fn init(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("quake_timewindow")
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("Warning: logging already initialised: {e}");
    }
}
