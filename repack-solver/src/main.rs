use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{info, warn};
use rand::SeedableRng;
use rand::prelude::SmallRng;
use repack::default_bound;
use repack_solver::config::RepackConfig;
use repack_solver::io::cli::Cli;
use repack_solver::io::output::RepackOutput;
use repack_solver::optimizer::RepackOptimizer;
use repack_solver::{EPOCH, io};

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level, args.log_file.as_deref())?;

    let mut config = match &args.config_file {
        None => {
            warn!("[MAIN] No config file provided, use --config-file to provide a custom config");
            RepackConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    args.override_config(&mut config);
    info!("[MAIN] Successfully parsed RepackConfig: {config:?}");

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|s| s.to_str())
        .context("input file has no valid name")?
        .to_owned();

    if !args.solution_folder.exists() {
        fs::create_dir_all(&args.solution_folder).with_context(|| {
            format!(
                "could not create solution folder: {:?}",
                args.solution_folder
            )
        })?;
    }

    let ext_instance = io::read_instance(args.input_file.as_path())?;
    let dims = ext_instance
        .rectangles
        .iter()
        .map(|&[w, h]| (w, h))
        .collect::<Vec<_>>();
    let bound = match config.scene_bound {
        Some([x, y]) => (x, y),
        None => {
            let side = default_bound(&dims, config.bound_slack)?;
            (side, side)
        }
    };
    let rng = match config.prng_seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let scene = repack::io::import(&ext_instance, bound, config.sort_key)?;
    let mut optimizer = RepackOptimizer::new(scene, config, rng);
    optimizer.solve()?;

    let output = RepackOutput {
        instance: ext_instance,
        solution: repack::io::export(&optimizer.scene, *EPOCH),
        config,
    };
    let solution_path = args.solution_folder.join(format!("sol_{input_stem}.json"));
    io::write_json(&output, Path::new(&solution_path))?;

    Ok(())
}
