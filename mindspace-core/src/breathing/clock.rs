//! Phase clock: maps elapsed time onto the phases of a breathing cycle.
//!
//! Phases own half-open intervals `[start, start + duration)` laid out in the
//! order Inhale, Hold1, Exhale, Hold2. A phase with zero duration owns an
//! empty interval and is never reported as active.

use super::pattern::PatternTimings;
use crate::error::Result;
use serde::Serialize;

/// One segment of a breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Inhale,
    /// Hold after inhaling
    Hold1,
    Exhale,
    /// Hold after exhaling
    Hold2,
}

impl Phase {
    /// Phases in cycle order.
    pub const ALL: [Phase; 4] = [Phase::Inhale, Phase::Hold1, Phase::Exhale, Phase::Hold2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold1 => "hold1",
            Phase::Exhale => "exhale",
            Phase::Hold2 => "hold2",
        }
    }

    /// Instruction shown to the person breathing
    pub fn instruction(&self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe In",
            Phase::Hold1 | Phase::Hold2 => "Hold",
            Phase::Exhale => "Breathe Out",
        }
    }

    /// Duration of this phase in the given pattern
    pub fn duration_in(&self, timings: &PatternTimings) -> f64 {
        match self {
            Phase::Inhale => timings.inhale,
            Phase::Hold1 => timings.hold1,
            Phase::Exhale => timings.exhale,
            Phase::Hold2 => timings.hold2,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where in the cycle a given elapsed time falls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseState {
    pub phase: Phase,
    /// Seconds since the current phase began
    pub phase_elapsed: f64,
    pub phase_duration: f64,
    /// `phase_elapsed / phase_duration`, clamped to [0, 1]
    pub progress: f64,
    /// Seconds since the current cycle began
    pub cycle_elapsed: f64,
    /// Number of completed cycles
    pub cycle_index: u64,
}

impl PhaseState {
    /// State at the very start of a cycle.
    pub fn initial(timings: &PatternTimings) -> Self {
        let phase = Phase::ALL
            .into_iter()
            .find(|p| p.duration_in(timings) > 0.0)
            .unwrap_or(Phase::Inhale);
        Self::new(phase, 0.0, phase.duration_in(timings), 0.0, 0)
    }

    fn new(
        phase: Phase,
        phase_elapsed: f64,
        phase_duration: f64,
        cycle_elapsed: f64,
        cycle_index: u64,
    ) -> Self {
        let progress = if phase_duration > 0.0 {
            (phase_elapsed / phase_duration).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            phase,
            phase_elapsed,
            phase_duration,
            progress,
            cycle_elapsed,
            cycle_index,
        }
    }

    /// Seconds left in the current phase
    pub fn phase_remaining(&self) -> f64 {
        (self.phase_duration - self.phase_elapsed).max(0.0)
    }
}

/// Compute the phase state for `elapsed` seconds into a breathing exercise.
///
/// Negative or non-finite elapsed values are treated as zero. Fails with
/// [`crate::Error::InvalidPattern`] when the pattern has no positive-length cycle.
pub fn phase_at(timings: &PatternTimings, elapsed: f64) -> Result<PhaseState> {
    timings.validate("pattern")?;
    Ok(locate(timings, elapsed))
}

fn locate(timings: &PatternTimings, elapsed: f64) -> PhaseState {
    let total = timings.total();
    let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
        elapsed
    } else {
        0.0
    };
    let cycle_index = (elapsed / total).floor() as u64;
    let position = elapsed.rem_euclid(total);

    let mut start = 0.0;
    let mut last = None;
    for phase in Phase::ALL {
        let duration = phase.duration_in(timings);
        if duration <= 0.0 {
            continue;
        }
        if position < start + duration {
            return PhaseState::new(phase, position - start, duration, position, cycle_index);
        }
        last = Some((phase, start, duration));
        start += duration;
    }

    // Rounding can leave position a hair past the final boundary.
    match last {
        Some((phase, start, duration)) => {
            PhaseState::new(phase, duration, duration, start + duration, cycle_index)
        }
        None => PhaseState::initial(timings),
    }
}

/// Notification emitted when the active phase changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

/// Result of observing the clock at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseObservation {
    pub state: PhaseState,
    pub change: Option<PhaseChange>,
}

/// Stateful wrapper around [`phase_at`] that reports phase transitions.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    timings: PatternTimings,
    current: Phase,
}

impl PhaseClock {
    /// Create a clock for a pattern, rejecting patterns with an empty cycle.
    pub fn new(timings: PatternTimings) -> Result<Self> {
        timings.validate("pattern")?;
        Ok(Self {
            timings,
            current: PhaseState::initial(&timings).phase,
        })
    }

    pub fn timings(&self) -> &PatternTimings {
        &self.timings
    }

    /// Phase reported by the most recent observation
    pub fn current_phase(&self) -> Phase {
        self.current
    }

    /// Compute the state at `elapsed` and note whether the phase changed
    /// since the previous observation.
    pub fn observe(&mut self, elapsed: f64) -> PhaseObservation {
        let state = locate(&self.timings, elapsed);
        let change = if state.phase != self.current {
            let change = PhaseChange {
                from: self.current,
                to: state.phase,
            };
            self.current = state.phase;
            Some(change)
        } else {
            None
        };
        PhaseObservation { state, change }
    }

    /// Return to the start of the cycle.
    pub fn reset(&mut self) {
        self.current = PhaseState::initial(&self.timings).phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breathing::PatternKey;
    use crate::Error;

    fn box_timings() -> PatternTimings {
        PatternKey::Box.pattern().timings
    }

    #[test]
    fn test_box_breathing_scenario() {
        let timings = box_timings();

        let state = phase_at(&timings, 6.0).unwrap();
        assert_eq!(state.phase, Phase::Hold1);
        assert!((state.progress - 0.5).abs() < 1e-9);
        assert!((state.phase_elapsed - 2.0).abs() < 1e-9);

        let state = phase_at(&timings, 14.0).unwrap();
        assert_eq!(state.phase, Phase::Hold2);
        assert!((state.progress - 0.5).abs() < 1e-9);
        assert_eq!(state.cycle_index, 0);
    }

    #[test]
    fn test_phase_is_periodic() {
        for key in PatternKey::ALL {
            let timings = key.pattern().timings;
            let total = timings.total();
            for step in 0..40 {
                let elapsed = step as f64 * 0.5;
                let a = phase_at(&timings, elapsed).unwrap();
                let b = phase_at(&timings, elapsed + total).unwrap();
                assert_eq!(a.phase, b.phase, "{} at {}", key, elapsed);
                assert!((a.progress - b.progress).abs() < 1e-9);
                assert_eq!(b.cycle_index, a.cycle_index + 1);
            }
        }
    }

    #[test]
    fn test_zero_duration_phases_never_active() {
        let timings = PatternKey::Calm.pattern().timings;
        for step in 0..400 {
            let state = phase_at(&timings, step as f64 * 0.05).unwrap();
            assert!(matches!(state.phase, Phase::Inhale | Phase::Exhale));
        }

        // Boundary between inhale and exhale falls straight through the empty hold
        let state = phase_at(&timings, 4.0).unwrap();
        assert_eq!(state.phase, Phase::Exhale);
        assert_eq!(state.progress, 0.0);
    }

    #[test]
    fn test_leading_zero_phase_skipped() {
        let timings = PatternTimings::new(0.0, 2.0, 3.0, 0.0);
        let state = phase_at(&timings, 0.0).unwrap();
        assert_eq!(state.phase, Phase::Hold1);
        assert_eq!(PhaseState::initial(&timings).phase, Phase::Hold1);
    }

    #[test]
    fn test_progress_monotonic_within_phase() {
        let timings = PatternKey::FourSevenEight.pattern().timings;
        let mut previous: Option<PhaseState> = None;
        for step in 0..=1900 {
            let state = phase_at(&timings, step as f64 * 0.01).unwrap();
            match previous {
                Some(prev) if prev.phase == state.phase => {
                    assert!(state.progress >= prev.progress);
                }
                _ => assert!(state.progress < 0.01, "phase entry at {}", state.progress),
            }
            assert!((0.0..=1.0).contains(&state.progress));
            previous = Some(state);
        }
    }

    #[test]
    fn test_empty_cycle_is_config_error() {
        let timings = PatternTimings::new(0.0, 0.0, 0.0, 0.0);
        assert!(matches!(
            phase_at(&timings, 1.0),
            Err(Error::InvalidPattern { .. })
        ));
        assert!(PhaseClock::new(timings).is_err());
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        let state = phase_at(&box_timings(), -3.0).unwrap();
        assert_eq!(state.phase, Phase::Inhale);
        assert_eq!(state.phase_elapsed, 0.0);
    }

    #[test]
    fn test_clock_reports_transitions() {
        let mut clock = PhaseClock::new(box_timings()).unwrap();

        assert!(clock.observe(1.0).change.is_none());
        let obs = clock.observe(4.5);
        assert_eq!(
            obs.change,
            Some(PhaseChange {
                from: Phase::Inhale,
                to: Phase::Hold1
            })
        );
        // Offset into the new phase, not time since the last observation
        assert!((obs.state.phase_elapsed - 0.5).abs() < 1e-9);
        assert!(clock.observe(5.0).change.is_none());

        clock.reset();
        assert_eq!(clock.current_phase(), Phase::Inhale);
        assert!(clock.observe(0.0).change.is_none());
    }

    #[test]
    fn test_phase_remaining() {
        let state = phase_at(&box_timings(), 9.0).unwrap();
        assert_eq!(state.phase, Phase::Exhale);
        assert!((state.phase_remaining() - 3.0).abs() < 1e-9);
    }
}
