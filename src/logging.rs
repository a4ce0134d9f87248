//! Logger setup. Everything else logs through the `log` macros.

use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Installs a terminal logger at `level`. A second call is ignored.
pub fn initialize(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .add_filter_allow_str("board_uploader")
        .build();

    if TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Initializes a debug-level logger for tests; no-ops if one exists.
pub fn initialize_for_tests() {
    let _ = TermLogger::init(
        LevelFilter::Debug,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
