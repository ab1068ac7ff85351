use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use repack::entities::SortKey;

use crate::config::RepackConfig;

/// Packs the rectangles of an instance file into a scene and writes the solution as JSON
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Instance to solve, a JSON file with the rectangles as `[width, height]` pairs
    #[arg(short, long, value_name = "FILE")]
    pub input_file: PathBuf,
    /// Folder receiving `sol_<instance>.json`, created if missing
    #[arg(short, long, value_name = "FOLDER")]
    pub solution_folder: PathBuf,
    /// JSON file with a (partial) driver configuration
    #[arg(short, long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,
    /// Overrides the seed of the configuration
    #[arg(long, value_name = "SEED")]
    pub prng_seed: Option<u64>,
    /// Overrides the reservoir order of the configuration
    #[arg(long, value_enum)]
    pub sort_key: Option<SortKeyArg>,
    /// Skips the decision tree and backstep searches, leaving the greedy pass and local search
    #[arg(long)]
    pub greedy_only: bool,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "info"
    )]
    pub log_level: LevelFilter,
    /// Also appends the log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Applies the command line overrides on top of `config`
    pub fn override_config(&self, config: &mut RepackConfig) {
        if let Some(seed) = self.prng_seed {
            config.prng_seed = Some(seed);
        }
        if let Some(sort_key) = self.sort_key {
            config.sort_key = sort_key.into();
        }
        if self.greedy_only {
            config.search = None;
            config.backstep = None;
        }
    }
}

/// Command line names of the [`SortKey`] variants
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKeyArg {
    Area,
    AreaWidth,
    Perimeter,
    LongSide,
    Input,
}

impl From<SortKeyArg> for SortKey {
    fn from(arg: SortKeyArg) -> Self {
        match arg {
            SortKeyArg::Area => SortKey::Area,
            SortKeyArg::AreaWidth => SortKey::AreaWidth,
            SortKeyArg::Perimeter => SortKey::Perimeter,
            SortKeyArg::LongSide => SortKey::LongSide,
            SortKeyArg::Input => SortKey::Input,
        }
    }
}
