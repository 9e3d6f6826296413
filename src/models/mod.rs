pub mod duration;
pub mod target;
pub mod workout;

pub use duration::Duration;
pub use target::{Target, TargetRange};
pub use workout::{Intensity, LeafStep, PlanError, RepeatGroup, Sport, Step, WorkoutPlan};
