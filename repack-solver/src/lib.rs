use std::sync::LazyLock;
use std::time::Instant;

pub mod config;
pub mod generator;
pub mod io;
pub mod optimizer;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
