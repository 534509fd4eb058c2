use std::path::PathBuf;

use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};

use crate::config;

/// Start file logging with rotation. Call once from the embedding application;
/// everything in this crate logs through the `log` facade.
pub fn init_logging() -> anyhow::Result<()> {
    let log_dir = pretrain_log_dir()?;

    // File logs at debug, stderr only gets warnings and up.
    Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(log_dir).basename(config::logging::LOG_FILE_NAME))
        .rotate(
            Criterion::Size(config::logging::LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(config::logging::LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to start logger")?;

    log::info!("vision-pretrain {} logging initialized", config::CRATE_VERSION);

    Ok(())
}

fn pretrain_log_dir() -> anyhow::Result<PathBuf> {
    let home = home_dir().context("cannot determine home directory for logs")?;
    let dir = home.join(config::logging::LOG_DIR_REL);
    std::fs::create_dir_all(&dir).with_context(|| format!("failed creating log dir {}", dir.display()))?;
    Ok(dir)
}

fn home_dir() -> Option<PathBuf> {
    if let Ok(v) = std::env::var("HOME") {
        if !v.is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    // Windows fallback
    if let Ok(v) = std::env::var("USERPROFILE") {
        if !v.is_empty() {
            return Some(PathBuf::from(v));
        }
    }
    None
}
