//! Logger setup for the `crashboard` binary.
//!
//! Logs go to `./crashboard.log` by default so they never interleave with the
//! terminal surface.

use crashboard_logging::{LevelFilter, LogDestination};

use crate::config::{AppConfig, LogSetting};

pub(crate) fn initialize(config: &AppConfig, verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    crashboard_logging::initialize(destination(config.log), level, &config.log_file);
}

fn destination(setting: LogSetting) -> LogDestination {
    match setting {
        LogSetting::File => LogDestination::File,
        LogSetting::Terminal => LogDestination::Terminal,
        LogSetting::Both => LogDestination::Both,
        LogSetting::Off => LogDestination::Off,
    }
}
