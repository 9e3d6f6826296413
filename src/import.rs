//! JSON plan importer
//!
//! Accepts the external camelCase workout document (typically produced by
//! an AI agent or exported from another tool) and converts it into a
//! validated [`WorkoutPlan`]. Structure problems surface as typed errors;
//! a bad document never silently becomes an empty plan.

use serde::Deserialize;

use crate::models::{
  Duration, Intensity, LeafStep, PlanError, RepeatGroup, Sport, Step, Target, TargetRange,
  WorkoutPlan,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
  #[error("malformed workout document: {0}")]
  MalformedInput(String),

  #[error(transparent)]
  InvalidPlan(#[from] PlanError),
}

/// ---------------------------------------------------------------------------
/// Document Shape
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDoc {
  #[serde(default)]
  name: String,
  sport: String,
  #[serde(default)]
  steps: Vec<StepDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepDoc {
  #[serde(default)]
  name: String,
  #[serde(rename = "type", default = "default_kind")]
  kind: String,
  #[serde(default)]
  duration: Option<DurationDoc>,
  #[serde(default)]
  target: Option<TargetDoc>,
  #[serde(default)]
  intensity: Option<String>,
  #[serde(default = "default_repeat_count")]
  repeat_count: u32,
  #[serde(default)]
  repeat_steps: Vec<StepDoc>,
  #[serde(default)]
  interval_options: Option<ChildOptionsDoc>,
  #[serde(default)]
  recovery_options: Option<ChildOptionsDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DurationDoc {
  #[serde(rename = "type")]
  kind: String,
  #[serde(default)]
  value: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetDoc {
  #[serde(rename = "type", default = "default_target_kind")]
  kind: String,
  #[serde(default)]
  zone: Option<u32>,
  #[serde(default)]
  low_value: Option<u32>,
  #[serde(default)]
  high_value: Option<u32>,
}

/// Two-child convenience form for `type: repeat`, equivalent to a
/// two-element `repeatSteps`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChildOptionsDoc {
  #[serde(default)]
  duration: Option<DurationDoc>,
  #[serde(default)]
  target: Option<TargetDoc>,
}

fn default_kind() -> String {
  "step".into()
}

fn default_target_kind() -> String {
  "open".into()
}

fn default_repeat_count() -> u32 {
  1
}

/// ---------------------------------------------------------------------------
/// Conversion
/// ---------------------------------------------------------------------------

/// Parse a JSON workout document into a validated plan.
pub fn plan_from_json(json: &str) -> Result<WorkoutPlan, ImportError> {
  let doc: PlanDoc =
    serde_json::from_str(json).map_err(|e| ImportError::MalformedInput(e.to_string()))?;

  let sport: Sport = doc.sport.parse().map_err(ImportError::MalformedInput)?;

  let mut steps = Vec::with_capacity(doc.steps.len());
  for step in doc.steps {
    steps.push(convert_step(step)?);
  }

  let plan = WorkoutPlan {
    name: doc.name,
    sport,
    steps,
  };
  plan.validate()?;
  Ok(plan)
}

fn convert_step(doc: StepDoc) -> Result<Step, ImportError> {
  match doc.kind.to_lowercase().as_str() {
    "warmup" => Ok(Step::Leaf(convert_leaf(doc, Intensity::Warmup)?)),
    "step" => Ok(Step::Leaf(convert_leaf(doc, Intensity::Active)?)),
    "cooldown" => Ok(Step::Leaf(convert_leaf(doc, Intensity::Cooldown)?)),
    "repeat" => convert_repeat(doc),
    other => Err(ImportError::MalformedInput(format!(
      "unknown step type: {}",
      other
    ))),
  }
}

fn convert_leaf(doc: StepDoc, fallback_intensity: Intensity) -> Result<LeafStep, ImportError> {
  Ok(LeafStep {
    name: doc.name,
    duration: convert_duration(doc.duration)?,
    target: convert_target(doc.target)?,
    intensity: convert_intensity(doc.intensity, fallback_intensity)?,
  })
}

fn convert_repeat(mut doc: StepDoc) -> Result<Step, ImportError> {
  let has_options = doc.interval_options.is_some();
  let group_duration = match doc.duration.take() {
    // The convenience form mirrors the builder helper: the header displays
    // the repeat condition unless the document set something explicit.
    None if has_options => Duration::RepeatUntilStepsComplete {
      steps: doc.repeat_count,
    },
    other => convert_duration(other)?,
  };

  let children = if !doc.repeat_steps.is_empty() {
    let mut children = Vec::with_capacity(doc.repeat_steps.len());
    for child in doc.repeat_steps {
      if child.kind.eq_ignore_ascii_case("repeat") {
        return Err(ImportError::MalformedInput(format!(
          "repeat group '{}' contains a nested repeat",
          doc.name
        )));
      }
      let fallback = match child.kind.to_lowercase().as_str() {
        "warmup" => Intensity::Warmup,
        "cooldown" => Intensity::Cooldown,
        _ => Intensity::Active,
      };
      children.push(convert_leaf(child, fallback)?);
    }
    children
  } else if let (Some(interval), Some(recovery)) = (doc.interval_options, doc.recovery_options) {
    vec![
      LeafStep {
        name: "Interval".into(),
        duration: convert_duration(interval.duration)?,
        target: convert_target(interval.target)?,
        intensity: Intensity::Active,
      },
      LeafStep {
        name: "Recovery".into(),
        duration: convert_duration(recovery.duration)?,
        target: convert_target(recovery.target)?,
        intensity: Intensity::Rest,
      },
    ]
  } else {
    Vec::new()
  };

  Ok(Step::Repeat(RepeatGroup {
    name: doc.name,
    repeat_count: doc.repeat_count,
    steps: children,
    duration: group_duration,
    target: convert_target(doc.target)?,
    intensity: convert_intensity(doc.intensity, Intensity::Active)?,
  }))
}

fn convert_intensity(
  value: Option<String>,
  fallback: Intensity,
) -> Result<Intensity, ImportError> {
  match value {
    Some(s) => s.parse().map_err(ImportError::MalformedInput),
    None => Ok(fallback),
  }
}

fn convert_duration(doc: Option<DurationDoc>) -> Result<Duration, ImportError> {
  let Some(doc) = doc else {
    return Ok(Duration::Open);
  };
  match doc.kind.to_lowercase().as_str() {
    "open" => Ok(Duration::Open),
    "time" => Ok(Duration::Time { seconds: doc.value }),
    "distance" => Ok(Duration::Distance { meters: doc.value }),
    "calories" => Ok(Duration::Calories { kcal: doc.value }),
    // The wire name predates the spelled-out variant; accept both
    "repeatuntilstepscmplt" | "repeatuntilstepscomplete" => {
      Ok(Duration::RepeatUntilStepsComplete { steps: doc.value })
    }
    "repeatuntiltime" => Ok(Duration::RepeatUntilTime { seconds: doc.value }),
    "repeatuntildistance" => Ok(Duration::RepeatUntilDistance { meters: doc.value }),
    other => Err(ImportError::MalformedInput(format!(
      "unknown duration type: {}",
      other
    ))),
  }
}

fn convert_target(doc: Option<TargetDoc>) -> Result<Target, ImportError> {
  let Some(doc) = doc else {
    return Ok(Target::Open);
  };
  // Zone wins when both a zone and a custom range are supplied
  let range = match (doc.zone, doc.low_value, doc.high_value) {
    (Some(zone), _, _) => TargetRange::Zone(zone),
    (None, Some(low), Some(high)) => TargetRange::Custom { low, high },
    _ => TargetRange::Unbounded,
  };
  match doc.kind.to_lowercase().as_str() {
    "open" => Ok(Target::Open),
    "heartrate" | "heart_rate" => Ok(Target::HeartRate(range)),
    "speed" => Ok(Target::Speed(range)),
    "power" => Ok(Target::Power(range)),
    "cadence" => Ok(Target::Cadence(range)),
    other => Err(ImportError::MalformedInput(format!(
      "unknown target type: {}",
      other
    ))),
  }
}
