use serde::{Deserialize, Serialize};

/// Configuration of the backtracking decision tree
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of motions expanded per tree node, best ranked first
    pub branching: usize,
    /// Once the tree holds this many nodes, only the best motion is expanded
    pub max_nodes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            branching: 4,
            max_nodes: 50_000,
        }
    }
}

/// Configuration of the backstep tree
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BackstepConfig {
    /// Maximum number of placements undone along one path
    pub depth: usize,
    /// Maximum number of placements tried for removal per tree node
    pub branching: usize,
}

impl Default for BackstepConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            branching: 6,
        }
    }
}
