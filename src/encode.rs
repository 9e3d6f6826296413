//! Encoder-facing contract
//!
//! The binary FIT serialization lives in an external encoder crate. This
//! module defines what that encoder receives: file-level metadata plus the
//! compiled records in sequence order, behind the [`WorkoutEncoder`] trait.
//! [`export_plan`] drives a full export and guarantees the encoder is
//! closed on every exit path, so a failed export never leaves an output
//! that looks complete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compiler::{compile, CompileError, CompiledStepRecord};
use crate::models::{Sport, WorkoutPlan};

/// Capabilities flag the workout file header carries; fixed by the target
/// protocol for plain step workouts.
pub const WORKOUT_CAPABILITIES: u32 = 32;

/// File-level metadata written ahead of the step records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
  pub name: String,
  pub sport: Sport,
  pub capabilities: u32,
  /// Count of device step records, not of top-level plan steps
  pub total_record_count: u32,
  pub time_created: DateTime<Utc>,
}

impl FileMetadata {
  pub fn for_plan(plan: &WorkoutPlan, total_record_count: u32) -> Self {
    let name = if plan.name.is_empty() {
      "Custom Workout".to_string()
    } else {
      plan.name.clone()
    };
    Self {
      name,
      sport: plan.sport,
      capabilities: WORKOUT_CAPABILITIES,
      total_record_count,
      time_created: Utc::now(),
    }
  }
}

/// Sink for an ordered record stream. Implemented by the external FIT
/// encoder; nothing here assumes anything about its wire format.
pub trait WorkoutEncoder {
  type Error;

  /// Open the output and write the file header from `meta`.
  fn begin(&mut self, meta: &FileMetadata) -> Result<(), Self::Error>;

  /// Write one step record. Called once per record, in index order.
  fn write_step(&mut self, record: &CompiledStepRecord) -> Result<(), Self::Error>;

  /// Flush and close the output. Called exactly once, even after a failed
  /// begin/write, so the encoder can release its resources.
  fn finish(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ExportError<E> {
  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("encoder error: {0}")]
  Encode(E),
}

/// Compile `plan` and stream it into `encoder`.
///
/// Returns the total record count on success. The encoder's `finish` runs
/// whether or not writing succeeded; the first error wins.
pub fn export_plan<E: WorkoutEncoder>(
  plan: &WorkoutPlan,
  encoder: &mut E,
) -> Result<u32, ExportError<E::Error>> {
  let compiled = compile(plan)?;
  let meta = FileMetadata::for_plan(plan, compiled.total_record_count);

  let written = write_records(encoder, &meta, &compiled.records);
  let finished = encoder.finish();

  written.and(finished).map_err(ExportError::Encode)?;
  Ok(compiled.total_record_count)
}

fn write_records<E: WorkoutEncoder>(
  encoder: &mut E,
  meta: &FileMetadata,
  records: &[CompiledStepRecord],
) -> Result<(), E::Error> {
  encoder.begin(meta)?;
  for record in records {
    encoder.write_step(record)?;
  }
  Ok(())
}
