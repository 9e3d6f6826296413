//! Fluent workout plan builder
//!
//! An accumulating builder moved by value: each call consumes and returns
//! the builder, so left-to-right call order is step order in the plan.

use crate::models::{
  Duration, Intensity, LeafStep, RepeatGroup, Sport, Step, Target, WorkoutPlan,
};

/// ---------------------------------------------------------------------------
/// Interval / Recovery Options
/// ---------------------------------------------------------------------------

/// Configuration for the effort half of an interval pair.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalOptions {
  pub duration: Duration,
  pub target: Target,
}

/// Configuration for the recovery half of an interval pair.
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryOptions {
  pub duration: Duration,
  pub target: Target,
}

/// ---------------------------------------------------------------------------
/// Builder
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct WorkoutBuilder {
  plan: WorkoutPlan,
}

impl WorkoutBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.plan.name = name.into();
    self
  }

  pub fn sport(mut self, sport: Sport) -> Self {
    self.plan.sport = sport;
    self
  }

  /// Append a pre-built leaf step.
  pub fn step(mut self, step: LeafStep) -> Self {
    self.plan.steps.push(Step::Leaf(step));
    self
  }

  /// "Warm Up" step: `minutes` of time at warmup intensity.
  pub fn warm_up(self, minutes: u32, target: Target) -> Self {
    self.step(LeafStep {
      name: "Warm Up".into(),
      duration: Duration::minutes(minutes),
      target,
      intensity: Intensity::Warmup,
    })
  }

  /// "Cool Down" step: `minutes` of time at cooldown intensity.
  pub fn cool_down(self, minutes: u32, target: Target) -> Self {
    self.step(LeafStep {
      name: "Cool Down".into(),
      duration: Duration::minutes(minutes),
      target,
      intensity: Intensity::Cooldown,
    })
  }

  /// Active step lasting `minutes`.
  pub fn time_step(self, name: impl Into<String>, minutes: u32, target: Target) -> Self {
    self.step(LeafStep {
      name: name.into(),
      duration: Duration::minutes(minutes),
      target,
      intensity: Intensity::Active,
    })
  }

  /// Active step covering `meters`.
  pub fn distance_step(self, name: impl Into<String>, meters: u32, target: Target) -> Self {
    self.step(LeafStep {
      name: name.into(),
      duration: Duration::meters(meters),
      target,
      intensity: Intensity::Active,
    })
  }

  /// Classic interval block: a repeat group with an "Interval" effort child
  /// and a "Recovery" rest child. The group's own duration is set to the
  /// repeat condition so the header record displays the count.
  pub fn intervals(
    mut self,
    name: impl Into<String>,
    repeat_count: u32,
    interval: IntervalOptions,
    recovery: RecoveryOptions,
  ) -> Self {
    self.plan.steps.push(Step::Repeat(RepeatGroup {
      name: name.into(),
      repeat_count,
      steps: vec![
        LeafStep {
          name: "Interval".into(),
          duration: interval.duration,
          target: interval.target,
          intensity: Intensity::Active,
        },
        LeafStep {
          name: "Recovery".into(),
          duration: recovery.duration,
          target: recovery.target,
          intensity: Intensity::Rest,
        },
      ],
      duration: Duration::RepeatUntilStepsComplete {
        steps: repeat_count,
      },
      target: Target::Open,
      intensity: Intensity::Active,
    }));
    self
  }

  /// Repeat block over arbitrary pre-built children, copied by value.
  pub fn repeat(
    mut self,
    name: impl Into<String>,
    repeat_count: u32,
    steps: Vec<LeafStep>,
  ) -> Self {
    self.plan.steps.push(Step::Repeat(RepeatGroup {
      name: name.into(),
      repeat_count,
      steps,
      duration: Duration::RepeatUntilStepsComplete {
        steps: repeat_count,
      },
      target: Target::Open,
      intensity: Intensity::Active,
    }));
    self
  }

  pub fn build(self) -> WorkoutPlan {
    self.plan
  }
}
