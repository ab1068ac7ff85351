/// The placement assessor: enumerating and ranking feasible motions
pub mod assess;

mod backstep_tree;
mod decision_tree;

#[doc(inline)]
pub use backstep_tree::{BackstepOutcome, BackstepTree, backstep};
#[doc(inline)]
pub use decision_tree::{DecisionTree, SearchOutcome, search};
