use serde::{Deserialize, Serialize};

use super::{Duration, Target};

/// ---------------------------------------------------------------------------
/// Sport and Intensity
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
  #[default]
  Running,
  Cycling,
  Swimming,
  Walking,
  Hiking,
  Rowing,
  Generic,
}

impl std::fmt::Display for Sport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Sport::Running => write!(f, "running"),
      Sport::Cycling => write!(f, "cycling"),
      Sport::Swimming => write!(f, "swimming"),
      Sport::Walking => write!(f, "walking"),
      Sport::Hiking => write!(f, "hiking"),
      Sport::Rowing => write!(f, "rowing"),
      Sport::Generic => write!(f, "generic"),
    }
  }
}

impl std::str::FromStr for Sport {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "running" => Ok(Sport::Running),
      "cycling" => Ok(Sport::Cycling),
      "swimming" => Ok(Sport::Swimming),
      "walking" => Ok(Sport::Walking),
      "hiking" => Ok(Sport::Hiking),
      "rowing" => Ok(Sport::Rowing),
      "generic" => Ok(Sport::Generic),
      _ => Err(format!("Unknown sport: {}", s)),
    }
  }
}

/// Effort level of a single step; devices display and color steps by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
  Warmup,
  #[default]
  Active,
  Rest,
  Cooldown,
}

impl std::fmt::Display for Intensity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Intensity::Warmup => write!(f, "warmup"),
      Intensity::Active => write!(f, "active"),
      Intensity::Rest => write!(f, "rest"),
      Intensity::Cooldown => write!(f, "cooldown"),
    }
  }
}

impl std::str::FromStr for Intensity {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "warmup" => Ok(Intensity::Warmup),
      "active" => Ok(Intensity::Active),
      "rest" => Ok(Intensity::Rest),
      "cooldown" => Ok(Intensity::Cooldown),
      _ => Err(format!("Unknown intensity: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Step Tree
/// ---------------------------------------------------------------------------

/// A single effort/rest segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LeafStep {
  pub name: String,
  #[serde(default)]
  pub duration: Duration,
  #[serde(default)]
  pub target: Target,
  #[serde(default)]
  pub intensity: Intensity,
}

/// A named block whose child steps are performed `repeat_count` times.
///
/// Children are always leaves; repeat groups do not nest. The group's own
/// duration/target travel on the header record the compiler emits for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatGroup {
  pub name: String,
  pub repeat_count: u32,
  pub steps: Vec<LeafStep>,
  #[serde(default)]
  pub duration: Duration,
  #[serde(default)]
  pub target: Target,
  #[serde(default)]
  pub intensity: Intensity,
}

/// One unit of a workout: a single segment or a repeated block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
  Leaf(LeafStep),
  Repeat(RepeatGroup),
}

/// ---------------------------------------------------------------------------
/// Workout Plan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorkoutPlan {
  pub name: String,
  #[serde(default)]
  pub sport: Sport,
  pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
  #[error("workout plan has no steps")]
  EmptyPlan,

  #[error("repeat group '{0}' must repeat at least once")]
  ZeroRepeatCount(String),

  #[error("repeat group '{0}' has no child steps")]
  EmptyRepeatGroup(String),
}

impl WorkoutPlan {
  /// Check the structural invariants the compiler depends on: at least one
  /// step, every repeat group non-empty with a count of at least one.
  pub fn validate(&self) -> Result<(), PlanError> {
    if self.steps.is_empty() {
      return Err(PlanError::EmptyPlan);
    }
    for step in &self.steps {
      if let Step::Repeat(group) = step {
        if group.repeat_count == 0 {
          return Err(PlanError::ZeroRepeatCount(group.name.clone()));
        }
        if group.steps.is_empty() {
          return Err(PlanError::EmptyRepeatGroup(group.name.clone()));
        }
      }
    }
    Ok(())
  }
}
