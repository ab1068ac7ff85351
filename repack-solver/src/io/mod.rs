use std::fs;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use log::{LevelFilter, info};
use repack::io::ext_repr::ExtInstance;
use serde::Serialize;

use crate::EPOCH;

pub mod cli;
pub mod output;

pub fn read_instance(path: &Path) -> Result<ExtInstance> {
    let file = File::open(path)
        .with_context(|| format!("could not open instance file: {}", path.display()))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("could not parse instance file: {}", path.display()))
}

pub fn write_json(json: &impl Serialize, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not open solution file: {}", path.display()))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, json)
        .with_context(|| format!("could not write solution file: {}", path.display()))?;

    info!(
        "Solution JSON written to file://{}",
        fs::canonicalize(path)?.to_str().unwrap_or("-")
    );
    Ok(())
}

/// Logs to stdout, and to `log_file` if given, stamping every line with the time since [`EPOCH`].
/// Lines from the `repack` library and this driver are tagged with their module.
pub fn init_logger(level_filter: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let elapsed = EPOCH.elapsed();
            let module = record
                .module_path()
                .and_then(|m| m.rsplit("::").next())
                .unwrap_or("-");
            out.finish(format_args!(
                "{:>5} {:>6}.{:03}s {module:<16} {message}",
                record.level(),
                elapsed.as_secs(),
                elapsed.subsec_millis(),
            ))
        })
        .level(level_filter)
        .chain(std::io::stdout());
    if let Some(path) = log_file {
        let file = fern::log_file(path)
            .with_context(|| format!("could not open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }
    dispatch.apply()?;
    info!("Started at {}", jiff::Timestamp::now());
    Ok(())
}
