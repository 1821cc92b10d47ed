use anyhow::{Context, Result};
use log::LevelFilter;
use std::fs::{self, File};
use std::path::Path;

/// Send log output to a file. The terminal belongs to the game overlay, so
/// nothing is written to stdout or stderr.
pub fn init<P: AsRef<Path>>(path: P, level: LevelFilter) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    simplelog::WriteLogger::init(level, config, file).context("initializing logger")?;
    Ok(())
}
