//! Structured workout planner
//!
//! Describe a workout as a tree of steps (warm-up, efforts, recoveries,
//! repeat blocks), then compile it into the flat, indexed sequence of
//! device step records a FIT encoder serializes.
//!
//! ```
//! use workout_fit::{compile, Duration, IntervalOptions, RecoveryOptions,
//!                   Sport, Target, WorkoutBuilder};
//!
//! let plan = WorkoutBuilder::new()
//!   .name("5x400m")
//!   .sport(Sport::Running)
//!   .warm_up(10, Target::heart_rate_zone(1))
//!   .intervals("5x400m", 5,
//!     IntervalOptions { duration: Duration::meters(400), target: Target::speed_zone(4) },
//!     RecoveryOptions { duration: Duration::seconds(120), target: Target::Open })
//!   .cool_down(10, Target::heart_rate_zone(1))
//!   .build();
//!
//! let compiled = compile(&plan).unwrap();
//! assert_eq!(compiled.total_record_count, 6);
//! ```

pub mod builder;
pub mod compiler;
pub mod encode;
pub mod import;
pub mod models;

pub use builder::{IntervalOptions, RecoveryOptions, WorkoutBuilder};
pub use compiler::{
  compile, CompileError, CompiledStepRecord, CompiledWorkout, DurationEncoding, RecordRole,
  TargetEncoding, ZoneBound,
};
pub use encode::{
  export_plan, ExportError, FileMetadata, WorkoutEncoder, WORKOUT_CAPABILITIES,
};
pub use import::{plan_from_json, ImportError};
pub use models::{
  Duration, Intensity, LeafStep, PlanError, RepeatGroup, Sport, Step, Target, TargetRange,
  WorkoutPlan,
};
