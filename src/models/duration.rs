use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Step Duration
/// ---------------------------------------------------------------------------

/// The condition under which a step ends.
///
/// Values are stored in canonical units (seconds, meters, kcal); unit
/// conversion for the device protocol happens in the compiler, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Duration {
  /// No end condition; the athlete advances the step manually
  #[default]
  Open,
  /// Elapsed time in seconds
  Time { seconds: u32 },
  /// Covered distance in meters
  Distance { meters: u32 },
  /// Burned calories in kcal
  Calories { kcal: u32 },
  /// Structural condition on repeat records: stop after n passes
  RepeatUntilStepsComplete { steps: u32 },
  /// Repeat until total elapsed time in seconds
  RepeatUntilTime { seconds: u32 },
  /// Repeat until total covered distance in meters
  RepeatUntilDistance { meters: u32 },
}

impl Duration {
  /// Time duration from whole minutes (stored as seconds, saturating)
  pub fn minutes(minutes: u32) -> Self {
    Duration::Time {
      seconds: minutes.saturating_mul(60),
    }
  }

  /// Time duration from seconds
  pub fn seconds(seconds: u32) -> Self {
    Duration::Time { seconds }
  }

  /// Distance duration from meters
  pub fn meters(meters: u32) -> Self {
    Duration::Distance { meters }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minutes_stores_seconds() {
    assert_eq!(Duration::minutes(10), Duration::Time { seconds: 600 });
    assert_eq!(Duration::minutes(0), Duration::Time { seconds: 0 });
  }

  #[test]
  fn test_minutes_saturate_instead_of_wrapping() {
    assert_eq!(
      Duration::minutes(u32::MAX),
      Duration::Time { seconds: u32::MAX }
    );
  }

  #[test]
  fn test_default_is_open() {
    assert_eq!(Duration::default(), Duration::Open);
  }
}
