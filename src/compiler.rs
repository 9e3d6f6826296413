//! Workout plan compiler
//!
//! Flattens a validated step tree into the ordered, 0-indexed sequence of
//! device-level step records the FIT encoder serializes. A repeat group
//! becomes one header record, its children once each (never duplicated
//! per repetition), and one completion record carrying the repeat count.

use serde::{Deserialize, Serialize};

use crate::models::{
  Duration, Intensity, LeafStep, RepeatGroup, Step, Target, TargetRange, WorkoutPlan,
};

/// ---------------------------------------------------------------------------
/// Compiled Record Types
/// ---------------------------------------------------------------------------

/// Where a record came from in the step tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordRole {
  Leaf,
  RepeatHeader,
  RepeatCompletion,
}

/// Duration in the units the device protocol expects (ms, cm).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoding {
  Open,
  Time { milliseconds: u32 },
  Distance { centimeters: u32 },
  Calories { kcal: u32 },
  RepeatUntilStepsComplete { steps: u32 },
  RepeatUntilTime { milliseconds: u32 },
  RepeatUntilDistance { centimeters: u32 },
}

/// Bound on an encoded target. A zone and a custom range never coexist;
/// when the input carries both, the zone wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneBound {
  Unbounded,
  Zone(u32),
  Range { low: u32, high: u32 },
}

/// Encoder-ready target. Cadence never carries a zone; devices define no
/// cadence zones, so a zone supplied upstream is dropped rather than sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetEncoding {
  Open,
  HeartRate(ZoneBound),
  Speed(ZoneBound),
  Power(ZoneBound),
  Cadence(ZoneBound),
}

/// One flattened, indexed, encoder-ready device step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledStepRecord {
  /// 0-based, globally monotonic across the whole compiled sequence
  pub index: u16,
  pub name: String,
  pub intensity: Intensity,
  pub duration: DurationEncoding,
  pub target: TargetEncoding,
  pub role: RecordRole,
}

/// The full compiled sequence plus the record count the file header needs.
///
/// `total_record_count` counts emitted records (1 per leaf, 2 + children per
/// repeat group), not top-level plan steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledWorkout {
  pub records: Vec<CompiledStepRecord>,
  pub total_record_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
  #[error("workout plan has no steps")]
  EmptyPlan,

  #[error("invalid repeat group '{name}': {reason}")]
  InvalidRepeatGroup { name: String, reason: String },

  #[error("workout plan flattens to {count} records, more than the device limit of {}", u16::MAX)]
  TooManyRecords { count: u64 },
}

/// ---------------------------------------------------------------------------
/// Encoding Rules
/// ---------------------------------------------------------------------------

/// Convert a duration to protocol units: seconds become milliseconds,
/// meters become centimeters, counts pass through. Saturating so an
/// absurd input clamps instead of wrapping.
pub fn encode_duration(duration: Duration) -> DurationEncoding {
  match duration {
    Duration::Open => DurationEncoding::Open,
    Duration::Time { seconds } => DurationEncoding::Time {
      milliseconds: seconds.saturating_mul(1000),
    },
    Duration::Distance { meters } => DurationEncoding::Distance {
      centimeters: meters.saturating_mul(100),
    },
    Duration::Calories { kcal } => DurationEncoding::Calories { kcal },
    Duration::RepeatUntilStepsComplete { steps } => {
      DurationEncoding::RepeatUntilStepsComplete { steps }
    }
    Duration::RepeatUntilTime { seconds } => DurationEncoding::RepeatUntilTime {
      milliseconds: seconds.saturating_mul(1000),
    },
    Duration::RepeatUntilDistance { meters } => DurationEncoding::RepeatUntilDistance {
      centimeters: meters.saturating_mul(100),
    },
  }
}

/// Convert a target to its encoder variant. Zones are passed verbatim,
/// custom bounds verbatim, and an unbounded typed target stays typed so the
/// device treats it as unconstrained-within-type.
pub fn encode_target(target: Target) -> TargetEncoding {
  match target {
    Target::Open => TargetEncoding::Open,
    Target::HeartRate(range) => TargetEncoding::HeartRate(encode_range(range)),
    Target::Speed(range) => TargetEncoding::Speed(encode_range(range)),
    Target::Power(range) => TargetEncoding::Power(encode_range(range)),
    // Cadence zones have no device representation; only custom ranges survive
    Target::Cadence(range) => TargetEncoding::Cadence(match range {
      TargetRange::Custom { low, high } => ZoneBound::Range { low, high },
      _ => ZoneBound::Unbounded,
    }),
  }
}

fn encode_range(range: TargetRange) -> ZoneBound {
  match range {
    TargetRange::Unbounded => ZoneBound::Unbounded,
    TargetRange::Zone(zone) => ZoneBound::Zone(zone),
    TargetRange::Custom { low, high } => ZoneBound::Range { low, high },
  }
}

/// ---------------------------------------------------------------------------
/// Flattening Pass
/// ---------------------------------------------------------------------------

/// Compile a plan into its flat record sequence.
///
/// Single left-to-right pass; deterministic. Either every record is emitted
/// or an error is returned with none.
pub fn compile(plan: &WorkoutPlan) -> Result<CompiledWorkout, CompileError> {
  if plan.steps.is_empty() {
    return Err(CompileError::EmptyPlan);
  }

  // Re-check repeat invariants and size the output before emitting
  // anything, so a failure can never leave a partial sequence and the
  // u16 record index can never overflow.
  let mut planned: u64 = 0;
  for step in &plan.steps {
    match step {
      Step::Leaf(_) => planned += 1,
      Step::Repeat(group) => {
        if group.repeat_count == 0 {
          return Err(CompileError::InvalidRepeatGroup {
            name: group.name.clone(),
            reason: "repeat count is zero".into(),
          });
        }
        if group.steps.is_empty() {
          return Err(CompileError::InvalidRepeatGroup {
            name: group.name.clone(),
            reason: "no child steps".into(),
          });
        }
        planned += 2 + group.steps.len() as u64;
      }
    }
  }
  if planned > u64::from(u16::MAX) {
    return Err(CompileError::TooManyRecords { count: planned });
  }

  let mut records = Vec::new();
  let mut index: u16 = 0;

  for step in &plan.steps {
    match step {
      Step::Leaf(leaf) => {
        records.push(leaf_record(leaf, index));
        index += 1;
      }
      Step::Repeat(group) => {
        records.push(header_record(group, index));
        index += 1;

        // Children are emitted exactly once; the repetition lives in the
        // completion record, not in duplicated child records.
        for child in &group.steps {
          records.push(leaf_record(child, index));
          index += 1;
        }

        records.push(completion_record(group.repeat_count, index));
        index += 1;
      }
    }
  }

  Ok(CompiledWorkout {
    records,
    total_record_count: u32::from(index),
  })
}

fn leaf_record(leaf: &LeafStep, index: u16) -> CompiledStepRecord {
  let name = if leaf.name.is_empty() {
    format!("Step {}", index + 1)
  } else {
    leaf.name.clone()
  };
  CompiledStepRecord {
    index,
    name,
    intensity: leaf.intensity,
    duration: encode_duration(leaf.duration),
    target: encode_target(leaf.target),
    role: RecordRole::Leaf,
  }
}

fn header_record(group: &RepeatGroup, index: u16) -> CompiledStepRecord {
  let name = if group.name.is_empty() {
    "Repeat".to_string()
  } else {
    group.name.clone()
  };
  CompiledStepRecord {
    index,
    name,
    intensity: group.intensity,
    duration: encode_duration(group.duration),
    target: encode_target(group.target),
    role: RecordRole::RepeatHeader,
  }
}

fn completion_record(repeat_count: u32, index: u16) -> CompiledStepRecord {
  CompiledStepRecord {
    index,
    name: "Repeat Complete".to_string(),
    intensity: Intensity::Active,
    duration: DurationEncoding::RepeatUntilStepsComplete {
      steps: repeat_count,
    },
    target: TargetEncoding::Open,
    role: RecordRole::RepeatCompletion,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Sport;

  fn leaf(name: &str, duration: Duration, target: Target, intensity: Intensity) -> LeafStep {
    LeafStep {
      name: name.into(),
      duration,
      target,
      intensity,
    }
  }

  /// The end-to-end 5x400m plan from a typical track session.
  fn five_by_400m() -> WorkoutPlan {
    WorkoutPlan {
      name: "5x400m".into(),
      sport: Sport::Running,
      steps: vec![
        Step::Leaf(leaf(
          "Warm Up",
          Duration::minutes(10),
          Target::heart_rate_zone(1),
          Intensity::Warmup,
        )),
        Step::Repeat(RepeatGroup {
          name: "5x400m".into(),
          repeat_count: 5,
          steps: vec![
            leaf(
              "Interval",
              Duration::meters(400),
              Target::speed_zone(4),
              Intensity::Active,
            ),
            leaf(
              "Recovery",
              Duration::seconds(120),
              Target::Open,
              Intensity::Rest,
            ),
          ],
          duration: Duration::RepeatUntilStepsComplete { steps: 5 },
          target: Target::Open,
          intensity: Intensity::Active,
        }),
        Step::Leaf(leaf(
          "Cool Down",
          Duration::minutes(10),
          Target::heart_rate_zone(1),
          Intensity::Cooldown,
        )),
      ],
    }
  }

  #[test]
  fn test_empty_plan_is_rejected() {
    let plan = WorkoutPlan {
      name: "Empty".into(),
      sport: Sport::Running,
      steps: vec![],
    };
    assert_eq!(compile(&plan), Err(CompileError::EmptyPlan));
  }

  #[test]
  fn test_invalid_repeat_groups_are_rejected() {
    let mut plan = five_by_400m();
    if let Step::Repeat(group) = &mut plan.steps[1] {
      group.repeat_count = 0;
    }
    assert!(matches!(
      compile(&plan),
      Err(CompileError::InvalidRepeatGroup { .. })
    ));

    let mut plan = five_by_400m();
    if let Step::Repeat(group) = &mut plan.steps[1] {
      group.steps.clear();
    }
    assert!(matches!(
      compile(&plan),
      Err(CompileError::InvalidRepeatGroup { .. })
    ));
  }

  #[test]
  fn test_repeat_group_compiles_to_header_children_completion() {
    let plan = WorkoutPlan {
      name: "Intervals Only".into(),
      sport: Sport::Running,
      steps: vec![Step::Repeat(RepeatGroup {
        name: "5x400m".into(),
        repeat_count: 5,
        steps: vec![
          leaf(
            "Interval",
            Duration::meters(400),
            Target::speed_zone(4),
            Intensity::Active,
          ),
          leaf(
            "Recovery",
            Duration::seconds(120),
            Target::Open,
            Intensity::Rest,
          ),
        ],
        duration: Duration::RepeatUntilStepsComplete { steps: 5 },
        target: Target::Open,
        intensity: Intensity::Active,
      })],
    };

    let compiled = compile(&plan).unwrap();
    assert_eq!(compiled.total_record_count, 4);
    assert_eq!(compiled.records.len(), 4);

    let header = &compiled.records[0];
    assert_eq!(header.role, RecordRole::RepeatHeader);
    assert_eq!(header.name, "5x400m");
    assert_eq!(
      header.duration,
      DurationEncoding::RepeatUntilStepsComplete { steps: 5 }
    );

    assert_eq!(compiled.records[1].role, RecordRole::Leaf);
    assert_eq!(compiled.records[1].name, "Interval");
    assert_eq!(compiled.records[2].role, RecordRole::Leaf);
    assert_eq!(compiled.records[2].name, "Recovery");

    let completion = &compiled.records[3];
    assert_eq!(completion.role, RecordRole::RepeatCompletion);
    assert_eq!(completion.name, "Repeat Complete");
    assert_eq!(completion.intensity, Intensity::Active);
    assert_eq!(completion.target, TargetEncoding::Open);
    assert_eq!(
      completion.duration,
      DurationEncoding::RepeatUntilStepsComplete { steps: 5 }
    );
  }

  #[test]
  fn test_record_count_counts_emitted_records_not_plan_steps() {
    let plan = five_by_400m();
    let compiled = compile(&plan).unwrap();

    // 3 plan steps, but 1 + (2 + 2) + 1 = 6 device records
    assert_eq!(plan.steps.len(), 3);
    assert_eq!(compiled.total_record_count, 6);
    assert_eq!(compiled.records.len(), 6);
  }

  #[test]
  fn test_indices_are_contiguous_from_zero() {
    let compiled = compile(&five_by_400m()).unwrap();
    for (expected, record) in compiled.records.iter().enumerate() {
      assert_eq!(usize::from(record.index), expected);
    }
  }

  #[test]
  fn test_compilation_is_deterministic() {
    let plan = five_by_400m();
    assert_eq!(compile(&plan).unwrap(), compile(&plan).unwrap());
  }

  #[test]
  fn test_end_to_end_5x400m_scenario() {
    let compiled = compile(&five_by_400m()).unwrap();

    assert_eq!(compiled.total_record_count, 6);
    assert_eq!(
      compiled.records[0].duration,
      DurationEncoding::Time {
        milliseconds: 600_000
      }
    );
    assert_eq!(compiled.records[0].intensity, Intensity::Warmup);
    assert_eq!(compiled.records[1].role, RecordRole::RepeatHeader);
    assert_eq!(
      compiled.records[2].duration,
      DurationEncoding::Distance {
        centimeters: 40_000
      }
    );
    assert_eq!(
      compiled.records[2].target,
      TargetEncoding::Speed(ZoneBound::Zone(4))
    );
    assert_eq!(compiled.records[4].role, RecordRole::RepeatCompletion);
    assert_eq!(
      compiled.records[5].duration,
      DurationEncoding::Time {
        milliseconds: 600_000
      }
    );
    assert_eq!(compiled.records[5].intensity, Intensity::Cooldown);
  }

  #[test]
  fn test_duration_unit_conversions() {
    assert_eq!(
      encode_duration(Duration::Time { seconds: 600 }),
      DurationEncoding::Time {
        milliseconds: 600_000
      }
    );
    assert_eq!(
      encode_duration(Duration::Distance { meters: 400 }),
      DurationEncoding::Distance {
        centimeters: 40_000
      }
    );
    assert_eq!(
      encode_duration(Duration::Calories { kcal: 250 }),
      DurationEncoding::Calories { kcal: 250 }
    );
    assert_eq!(
      encode_duration(Duration::RepeatUntilTime { seconds: 30 }),
      DurationEncoding::RepeatUntilTime {
        milliseconds: 30_000
      }
    );
    assert_eq!(
      encode_duration(Duration::RepeatUntilDistance { meters: 1000 }),
      DurationEncoding::RepeatUntilDistance {
        centimeters: 100_000
      }
    );
    assert_eq!(encode_duration(Duration::Open), DurationEncoding::Open);
  }

  #[test]
  fn test_oversized_durations_saturate() {
    assert_eq!(
      encode_duration(Duration::Time {
        seconds: u32::MAX / 2
      }),
      DurationEncoding::Time {
        milliseconds: u32::MAX
      }
    );
  }

  #[test]
  fn test_target_encoding_rules() {
    assert_eq!(encode_target(Target::Open), TargetEncoding::Open);
    assert_eq!(
      encode_target(Target::heart_rate_zone(3)),
      TargetEncoding::HeartRate(ZoneBound::Zone(3))
    );
    assert_eq!(
      encode_target(Target::power_range(200, 250)),
      TargetEncoding::Power(ZoneBound::Range {
        low: 200,
        high: 250
      })
    );
    // Typed target with no bound stays typed (unconstrained-within-type)
    assert_eq!(
      encode_target(Target::Speed(TargetRange::Unbounded)),
      TargetEncoding::Speed(ZoneBound::Unbounded)
    );
  }

  #[test]
  fn test_cadence_zone_is_dropped() {
    assert_eq!(
      encode_target(Target::Cadence(TargetRange::Zone(3))),
      TargetEncoding::Cadence(ZoneBound::Unbounded)
    );
    assert_eq!(
      encode_target(Target::cadence_range(85, 95)),
      TargetEncoding::Cadence(ZoneBound::Range { low: 85, high: 95 })
    );
  }

  #[test]
  fn test_rejects_plans_beyond_the_record_index_limit() {
    // 69,996 leaves plus one 2-child group (header + 2 children +
    // completion) = 70,000 device records, past what a u16 record
    // index can address
    let mut steps: Vec<Step> = (0..69_996).map(|_| Step::Leaf(LeafStep::default())).collect();
    steps.push(Step::Repeat(RepeatGroup {
      name: "2x".into(),
      repeat_count: 2,
      steps: vec![LeafStep::default(), LeafStep::default()],
      duration: Duration::Open,
      target: Target::Open,
      intensity: Intensity::Active,
    }));
    let plan = WorkoutPlan {
      name: "Too Long".into(),
      sport: Sport::Running,
      steps,
    };

    assert_eq!(
      compile(&plan),
      Err(CompileError::TooManyRecords { count: 70_000 })
    );
  }

  #[test]
  fn test_compiles_a_plan_at_the_record_limit() {
    let steps = (0..65_535).map(|_| Step::Leaf(LeafStep::default())).collect();
    let plan = WorkoutPlan {
      name: "Exactly Full".into(),
      sport: Sport::Running,
      steps,
    };

    let compiled = compile(&plan).unwrap();
    assert_eq!(compiled.total_record_count, 65_535);
    assert_eq!(compiled.records.last().map(|r| r.index), Some(65_534));
  }

  #[test]
  fn test_unnamed_steps_get_positional_names() {
    let plan = WorkoutPlan {
      name: "Anonymous".into(),
      sport: Sport::Running,
      steps: vec![
        Step::Leaf(LeafStep::default()),
        Step::Leaf(LeafStep::default()),
      ],
    };
    let compiled = compile(&plan).unwrap();
    assert_eq!(compiled.records[0].name, "Step 1");
    assert_eq!(compiled.records[1].name, "Step 2");
  }
}
