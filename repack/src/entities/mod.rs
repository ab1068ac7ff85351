mod motion;
mod rectangle;
mod scene;
mod sort_key;

#[doc(inline)]
pub use motion::{Anchor, Assessment, ChildSlot, Motion};
#[doc(inline)]
pub use rectangle::{RectId, Rectangle};
#[doc(inline)]
pub use scene::{Placement, PlanReport, Scene, SceneSnapshot};
#[doc(inline)]
pub use sort_key::SortKey;
