//! Breathing patterns and the fixed pattern catalog.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Keys of the built-in breathing patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKey {
    /// Simple 4-4 breathing
    #[default]
    Calm,
    /// Equal inhale, hold, exhale, hold
    Box,
    /// 4-7-8 relaxing breath
    #[serde(rename = "4-7-8")]
    FourSevenEight,
    /// Long inhale, short exhale
    Energizing,
}

impl PatternKey {
    /// Every key, in catalog order.
    pub const ALL: [PatternKey; 4] = [
        PatternKey::Calm,
        PatternKey::Box,
        PatternKey::FourSevenEight,
        PatternKey::Energizing,
    ];

    /// Returns the identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKey::Calm => "calm",
            PatternKey::Box => "box",
            PatternKey::FourSevenEight => "4-7-8",
            PatternKey::Energizing => "energizing",
        }
    }

    /// Returns the catalog entry for this key
    pub fn pattern(&self) -> BreathingPattern {
        match self {
            PatternKey::Calm => BreathingPattern::builtin(
                *self,
                "Calm Breathing",
                "Simple 4-4 breathing for relaxation",
                PatternTimings::new(4.0, 0.0, 4.0, 0.0),
            ),
            PatternKey::Box => BreathingPattern::builtin(
                *self,
                "Box Breathing",
                "Equal parts inhale, hold, exhale, and hold",
                PatternTimings::new(4.0, 4.0, 4.0, 4.0),
            ),
            PatternKey::FourSevenEight => BreathingPattern::builtin(
                *self,
                "4-7-8 Relaxing Breath",
                "Calming breath to reduce anxiety",
                PatternTimings::new(4.0, 7.0, 8.0, 0.0),
            ),
            PatternKey::Energizing => BreathingPattern::builtin(
                *self,
                "Energizing Breath",
                "Longer inhale, shorter exhale for energy",
                PatternTimings::new(6.0, 0.0, 2.0, 0.0),
            ),
        }
    }
}

impl std::fmt::Display for PatternKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PatternKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "calm" | "simple" => Ok(PatternKey::Calm),
            "box" => Ok(PatternKey::Box),
            "4-7-8" | "478" => Ok(PatternKey::FourSevenEight),
            "energizing" => Ok(PatternKey::Energizing),
            _ => Err(Error::UnknownPattern(s.to_string())),
        }
    }
}

/// Durations of the four phases of one breathing cycle, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternTimings {
    pub inhale: f64,
    pub hold1: f64,
    pub exhale: f64,
    pub hold2: f64,
}

impl PatternTimings {
    pub const fn new(inhale: f64, hold1: f64, exhale: f64, hold2: f64) -> Self {
        Self {
            inhale,
            hold1,
            exhale,
            hold2,
        }
    }

    /// Length of one full cycle
    pub fn total(&self) -> f64 {
        self.inhale + self.hold1 + self.exhale + self.hold2
    }

    /// Check that every phase is finite and non-negative and the cycle is non-empty.
    pub fn validate(&self, name: &str) -> Result<()> {
        let phases = [self.inhale, self.hold1, self.exhale, self.hold2];
        if phases.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(Error::InvalidPattern {
                name: name.to_string(),
                reason: "phase durations must be finite and non-negative".to_string(),
            });
        }
        if self.total() <= 0.0 {
            return Err(Error::InvalidPattern {
                name: name.to_string(),
                reason: "total cycle duration must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// A named breathing pattern from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreathingPattern {
    pub key: PatternKey,
    pub name: &'static str,
    pub description: &'static str,
    pub timings: PatternTimings,
}

impl BreathingPattern {
    const fn builtin(
        key: PatternKey,
        name: &'static str,
        description: &'static str,
        timings: PatternTimings,
    ) -> Self {
        Self {
            key,
            name,
            description,
            timings,
        }
    }

    /// Short phase summary, e.g. "In 4s / Hold 4s / Out 4s / Hold 4s".
    ///
    /// Zero-length holds are omitted.
    pub fn summary(&self) -> String {
        let t = &self.timings;
        let mut parts = vec![format!("In {}s", t.inhale)];
        if t.hold1 > 0.0 {
            parts.push(format!("Hold {}s", t.hold1));
        }
        parts.push(format!("Out {}s", t.exhale));
        if t.hold2 > 0.0 {
            parts.push(format!("Hold {}s", t.hold2));
        }
        parts.join(" / ")
    }
}

/// All built-in patterns, in catalog order.
pub fn catalog() -> Vec<BreathingPattern> {
    PatternKey::ALL.iter().map(|k| k.pattern()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_patterns_are_valid() {
        for pattern in catalog() {
            assert!(pattern.timings.validate(pattern.name).is_ok(), "{}", pattern.name);
        }
    }

    #[test]
    fn test_box_breathing_timings() {
        let pattern = PatternKey::Box.pattern();
        assert_eq!(pattern.timings, PatternTimings::new(4.0, 4.0, 4.0, 4.0));
        assert_eq!(pattern.timings.total(), 16.0);
    }

    #[test]
    fn test_zero_pattern_rejected() {
        let timings = PatternTimings::new(0.0, 0.0, 0.0, 0.0);
        let err = timings.validate("empty").unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
    }

    #[test]
    fn test_negative_phase_rejected() {
        let timings = PatternTimings::new(4.0, -1.0, 4.0, 0.0);
        assert!(timings.validate("negative").is_err());

        let timings = PatternTimings::new(f64::NAN, 0.0, 4.0, 0.0);
        assert!(timings.validate("nan").is_err());
    }

    #[test]
    fn test_key_round_trip() {
        for key in PatternKey::ALL {
            assert_eq!(key.as_str().parse::<PatternKey>().unwrap(), key);
        }
        assert_eq!("simple".parse::<PatternKey>().unwrap(), PatternKey::Calm);
        assert!("square".parse::<PatternKey>().is_err());
    }

    #[test]
    fn test_summary_omits_empty_holds() {
        assert_eq!(PatternKey::Calm.pattern().summary(), "In 4s / Out 4s");
        assert_eq!(
            PatternKey::FourSevenEight.pattern().summary(),
            "In 4s / Hold 7s / Out 8s"
        );
    }
}
