// ============================================================================
// vidmark-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Optional File Logging
//
// The application logs through the standard `log` facade with `fern` as the
// backend: a compact console dispatch, plus a timestamped file dispatch when
// a log directory is configured. The level comes from RUST_LOG:
// - RUST_LOG=info (default): Normal operation logs
// - RUST_LOG=debug: Detailed debugging information
// - RUST_LOG=trace: Very verbose debugging information
//
// AI-ASSISTANT-INFO: fern-based logging configuration for the CLI

use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// Used to generate unique names for log files.
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Initializes logging. Returns the log file path when file logging is on.
pub fn setup_logging(log_dir: Option<&Path>) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|v| v.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info);

    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        // reqwest/hyper internals are noisy at debug
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Warn)
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new().chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("vidmark_log_{}.txt", get_timestamp()));
        let file = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}] [{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(level)
            .chain(fern::log_file(&path)?);
        dispatch = dispatch.chain(file);
        log_path = Some(path);
    }

    dispatch.apply()?;
    Ok(log_path)
}
