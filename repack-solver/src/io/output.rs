use crate::config::RepackConfig;
use repack::io::ext_repr::{ExtInstance, ExtSolution};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RepackOutput {
    #[serde(flatten)]
    pub instance: ExtInstance,
    pub solution: ExtSolution,
    pub config: RepackConfig,
}
