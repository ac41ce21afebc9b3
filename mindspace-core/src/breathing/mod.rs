//! Guided breathing engine
//!
//! - [`pattern`]: the fixed catalog of breathing patterns
//! - [`clock`]: elapsed time to phase and intra-phase progress
//! - [`visual`]: phase and progress to sphere scale, color and rotation
//! - [`driver`]: per-frame reducer and scene driver with pause/resume

pub mod clock;
pub mod driver;
pub mod pattern;
pub mod visual;

pub use clock::{phase_at, Phase, PhaseChange, PhaseClock, PhaseObservation, PhaseState};
pub use driver::{BreathingState, Frame, Playback, RenderDriver, Scene, StepOutcome};
pub use pattern::{catalog, BreathingPattern, PatternKey, PatternTimings};
pub use visual::{ProfileKind, Rotation, VisualParams, VisualProfile};
