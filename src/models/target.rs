use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Step Target
/// ---------------------------------------------------------------------------

/// The band a target constrains the step to: a predefined zone, a custom
/// numeric range, or nothing (constrained only by the target type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TargetRange {
  #[default]
  Unbounded,
  /// Predefined zone number (1-5 on most devices)
  Zone(u32),
  /// Custom range in the target type's native unit (bpm, watts, rpm, ...)
  Custom { low: u32, high: u32 },
}

/// The physiological/performance band a step aims for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Target {
  /// No target; the step is effort-free
  #[default]
  Open,
  HeartRate(TargetRange),
  Speed(TargetRange),
  Power(TargetRange),
  /// Cadence only supports custom ranges; devices define no cadence zones
  Cadence(TargetRange),
}

impl Target {
  pub fn heart_rate_zone(zone: u32) -> Self {
    Target::HeartRate(TargetRange::Zone(zone))
  }

  pub fn heart_rate_range(low: u32, high: u32) -> Self {
    Target::HeartRate(TargetRange::Custom { low, high })
  }

  pub fn speed_zone(zone: u32) -> Self {
    Target::Speed(TargetRange::Zone(zone))
  }

  pub fn speed_range(low: u32, high: u32) -> Self {
    Target::Speed(TargetRange::Custom { low, high })
  }

  pub fn power_zone(zone: u32) -> Self {
    Target::Power(TargetRange::Zone(zone))
  }

  pub fn power_range(low: u32, high: u32) -> Self {
    Target::Power(TargetRange::Custom { low, high })
  }

  pub fn cadence_range(low: u32, high: u32) -> Self {
    Target::Cadence(TargetRange::Custom { low, high })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_is_open() {
    assert_eq!(Target::default(), Target::Open);
    assert_eq!(TargetRange::default(), TargetRange::Unbounded);
  }

  #[test]
  fn test_constructors() {
    assert_eq!(
      Target::heart_rate_zone(2),
      Target::HeartRate(TargetRange::Zone(2))
    );
    assert_eq!(
      Target::power_range(200, 250),
      Target::Power(TargetRange::Custom {
        low: 200,
        high: 250
      })
    );
  }
}
