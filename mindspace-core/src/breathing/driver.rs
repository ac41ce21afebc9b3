//! Frame-driven breathing animation.
//!
//! [`BreathingState`] is a reducer: each call to [`BreathingState::step`]
//! folds one frame delta into the state and returns what to draw. It has no
//! rendering surface and can be driven from tests directly. [`RenderDriver`]
//! pairs the reducer with a [`Scene`] and owns the scene for its lifetime.

use super::clock::{PhaseChange, PhaseClock, PhaseState};
use super::pattern::BreathingPattern;
use super::visual::{Rotation, VisualParams, VisualProfile};
use crate::error::Result;
use serde::Serialize;

/// Default exponential smoothing rate for the sphere scale (per second).
pub const DEFAULT_SMOOTHING_RATE: f64 = 3.0;

/// Whether frames advance the breathing cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Playback {
    Running,
    Paused,
}

/// Everything a scene needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Frame {
    pub state: PhaseState,
    /// Unsmoothed parameters for the current phase and progress
    pub target: VisualParams,
    /// Scale after smoothing toward `target.scale`
    pub scale: f64,
    /// Accumulated decorative rotation
    pub rotation: Rotation,
}

/// Output of a single reducer step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub frame: Frame,
    pub change: Option<PhaseChange>,
    /// False when the step was ignored because playback is paused
    pub advanced: bool,
}

/// Breathing animation state, advanced one frame at a time.
#[derive(Debug, Clone)]
pub struct BreathingState {
    pattern: BreathingPattern,
    profile: VisualProfile,
    smoothing_rate: f64,
    clock: PhaseClock,
    elapsed: f64,
    playback: Playback,
    frame: Frame,
}

impl BreathingState {
    /// Start a running animation at the beginning of the pattern's cycle.
    pub fn new(pattern: BreathingPattern, profile: VisualProfile) -> Result<Self> {
        pattern.timings.validate(pattern.name)?;
        let clock = PhaseClock::new(pattern.timings)?;
        let frame = Self::initial_frame(&clock, &profile, profile.min_scale);
        Ok(Self {
            pattern,
            profile,
            smoothing_rate: DEFAULT_SMOOTHING_RATE,
            clock,
            elapsed: 0.0,
            playback: Playback::Running,
            frame,
        })
    }

    /// Override the scale smoothing rate. Non-positive values disable smoothing.
    pub fn with_smoothing_rate(mut self, rate: f64) -> Self {
        self.smoothing_rate = rate;
        self
    }

    fn initial_frame(clock: &PhaseClock, profile: &VisualProfile, scale: f64) -> Frame {
        let state = PhaseState::initial(clock.timings());
        Frame {
            state,
            target: profile.map(state.phase, state.progress),
            scale,
            rotation: Rotation::default(),
        }
    }

    pub fn pattern(&self) -> &BreathingPattern {
        &self.pattern
    }

    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Seconds of unpaused breathing since the last reset
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Most recently computed frame
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Fold one frame of `delta` seconds into the state.
    ///
    /// While paused the delta is discarded and the previous frame is returned.
    pub fn step(&mut self, delta: f64) -> StepOutcome {
        if self.playback == Playback::Paused {
            return StepOutcome {
                frame: self.frame,
                change: None,
                advanced: false,
            };
        }

        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.elapsed += delta;

        let observation = self.clock.observe(self.elapsed);
        let state = observation.state;
        let target = self.profile.map(state.phase, state.progress);

        let scale = if self.smoothing_rate > 0.0 {
            let alpha = (delta * self.smoothing_rate).min(1.0);
            self.frame.scale + (target.scale - self.frame.scale) * alpha
        } else {
            target.scale
        };
        let mut rotation = self.frame.rotation;
        rotation += self.profile.rotation(delta);

        self.frame = Frame {
            state,
            target,
            scale,
            rotation,
        };

        if let Some(change) = observation.change {
            tracing::debug!(
                from = %change.from,
                to = %change.to,
                elapsed = self.elapsed,
                "Breathing phase changed"
            );
        }

        StepOutcome {
            frame: self.frame,
            change: observation.change,
            advanced: true,
        }
    }

    pub fn pause(&mut self) {
        self.playback = Playback::Paused;
    }

    pub fn resume(&mut self) {
        self.playback = Playback::Running;
    }

    /// Switch between running and paused; returns the new playback state.
    pub fn toggle(&mut self) -> Playback {
        match self.playback {
            Playback::Running => self.pause(),
            Playback::Paused => self.resume(),
        }
        self.playback
    }

    /// Restart the cycle from the first phase. Scale and rotation carry over
    /// so the sphere eases back instead of snapping.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.clock.reset();
        let mut frame = Self::initial_frame(&self.clock, &self.profile, self.frame.scale);
        frame.rotation = self.frame.rotation;
        self.frame = frame;
    }

    /// Switch to another pattern and restart the cycle.
    pub fn set_pattern(&mut self, pattern: BreathingPattern) -> Result<()> {
        pattern.timings.validate(pattern.name)?;
        let clock = PhaseClock::new(pattern.timings)?;
        tracing::info!(pattern = pattern.name, "Breathing pattern selected");
        self.clock = clock;
        self.pattern = pattern;
        self.restart();
        Ok(())
    }
}

/// Render target for the breathing animation.
pub trait Scene {
    /// Draw a frame.
    fn apply(&mut self, frame: &Frame);

    /// Called after `apply` when the frame entered a new phase.
    fn phase_changed(&mut self, _change: PhaseChange, _state: &PhaseState) {}

    /// Release any resources held by the scene. Called exactly once.
    fn release(&mut self) {}
}

/// Drives a [`Scene`] from a [`BreathingState`].
///
/// The scene is released when the driver is dropped.
pub struct RenderDriver<S: Scene> {
    state: BreathingState,
    scene: S,
}

impl<S: Scene> RenderDriver<S> {
    /// Create a driver and draw the initial frame.
    pub fn new(state: BreathingState, mut scene: S) -> Self {
        scene.apply(state.frame());
        tracing::info!(pattern = state.pattern().name, "Render driver started");
        Self { state, scene }
    }

    /// Advance one frame and draw it. Returns the phase change, if any.
    pub fn frame(&mut self, delta: f64) -> Option<PhaseChange> {
        let outcome = self.state.step(delta);
        if !outcome.advanced {
            return None;
        }
        self.scene.apply(&outcome.frame);
        if let Some(change) = outcome.change {
            self.scene.phase_changed(change, &outcome.frame.state);
        }
        outcome.change
    }

    pub fn state(&self) -> &BreathingState {
        &self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn pause(&mut self) {
        self.state.pause();
        tracing::info!(elapsed = self.state.elapsed(), "Breathing paused");
    }

    pub fn resume(&mut self) {
        self.state.resume();
        tracing::info!(elapsed = self.state.elapsed(), "Breathing resumed");
    }

    /// Switch pattern, restart the cycle and redraw.
    pub fn set_pattern(&mut self, pattern: BreathingPattern) -> Result<()> {
        self.state.set_pattern(pattern)?;
        self.scene.apply(self.state.frame());
        Ok(())
    }
}

impl<S: Scene> Drop for RenderDriver<S> {
    fn drop(&mut self) {
        self.scene.release();
        tracing::info!(elapsed = self.state.elapsed(), "Render driver released scene");
    }
}
