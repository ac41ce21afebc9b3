//! Visual mapping from breathing phase to sphere draw parameters.

use super::clock::Phase;
use serde::{Deserialize, Serialize};

/// Named visual presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    /// Sphere with a narrow blue-to-purple hue swing
    #[default]
    Sphere,
    /// Guided view with a wider hue swing
    Guide,
}

impl ProfileKind {
    pub fn profile(&self) -> VisualProfile {
        match self {
            ProfileKind::Sphere => VisualProfile::sphere(),
            ProfileKind::Guide => VisualProfile::guide(),
        }
    }
}

impl std::str::FromStr for ProfileKind {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "sphere" => Ok(ProfileKind::Sphere),
            "guide" => Ok(ProfileKind::Guide),
            _ => Err(crate::error::Error::Config(format!(
                "unknown visual profile '{}', expected 'sphere' or 'guide'",
                s
            ))),
        }
    }
}

/// Constants that shape the breathing animation.
///
/// Hue and lightness are HSL components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualProfile {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Hue at rest (blue)
    pub base_hue: f64,
    /// How far the hue moves toward purple at full inhale
    pub hue_shift: f64,
    pub saturation: f64,
    pub base_lightness: f64,
    pub lightness_range: f64,
    pub min_emissive: f64,
    pub max_emissive: f64,
    /// Radians per second around the y axis
    pub rotation_rate_y: f64,
    /// Radians per second around the z axis
    pub rotation_rate_z: f64,
}

impl VisualProfile {
    pub fn sphere() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 1.5,
            base_hue: 0.6,
            hue_shift: 0.1,
            saturation: 0.7,
            base_lightness: 0.5,
            lightness_range: 0.2,
            min_emissive: 0.1,
            max_emissive: 0.4,
            rotation_rate_y: 0.1,
            rotation_rate_z: 0.05,
        }
    }

    pub fn guide() -> Self {
        Self {
            hue_shift: 0.2,
            ..Self::sphere()
        }
    }

    /// Draw parameters for a phase at the given progress.
    ///
    /// Holds keep the values the preceding phase ended on, so the output is
    /// continuous across every phase boundary.
    pub fn map(&self, phase: Phase, progress: f64) -> VisualParams {
        let t = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match phase {
            Phase::Inhale => self.expansion(t),
            Phase::Hold1 => self.expansion(1.0),
            Phase::Exhale => self.expansion(1.0 - t),
            Phase::Hold2 => self.expansion(0.0),
        }
    }

    /// Rotation to add for a frame of `delta` seconds.
    pub fn rotation(&self, delta: f64) -> Rotation {
        let delta = delta.max(0.0);
        Rotation {
            y: delta * self.rotation_rate_y,
            z: delta * self.rotation_rate_z,
        }
    }

    /// Parameters at a given fraction of full expansion (0 = rest, 1 = full breath).
    fn expansion(&self, e: f64) -> VisualParams {
        VisualParams {
            scale: lerp(self.min_scale, self.max_scale, e),
            hue: self.base_hue - e * self.hue_shift,
            saturation: self.saturation,
            lightness: self.base_lightness + e * self.lightness_range,
            emissive_intensity: lerp(self.min_emissive, self.max_emissive, e),
        }
    }
}

impl Default for VisualProfile {
    fn default() -> Self {
        Self::sphere()
    }
}

/// Per-frame draw parameters for the breathing sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualParams {
    pub scale: f64,
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub emissive_intensity: f64,
}

/// Rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rotation {
    pub y: f64,
    pub z: f64,
}

impl std::ops::AddAssign for Rotation {
    fn add_assign(&mut self, rhs: Self) {
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn params_close(a: VisualParams, b: VisualParams) -> bool {
        close(a.scale, b.scale)
            && close(a.hue, b.hue)
            && close(a.lightness, b.lightness)
            && close(a.emissive_intensity, b.emissive_intensity)
    }

    #[test]
    fn test_inhale_ranges() {
        let profile = VisualProfile::sphere();
        let start = profile.map(Phase::Inhale, 0.0);
        let end = profile.map(Phase::Inhale, 1.0);

        assert!(close(start.scale, 1.0));
        assert!(close(end.scale, 1.5));
        assert!(close(start.emissive_intensity, 0.1));
        assert!(close(end.emissive_intensity, 0.4));
        assert!(close(start.hue, 0.6));
        assert!(close(end.hue, 0.5));
    }

    #[test]
    fn test_exhale_mirrors_inhale() {
        let profile = VisualProfile::sphere();
        let mid = profile.map(Phase::Exhale, 0.5);
        assert!(close(mid.scale, 1.25));
        assert!(close(profile.map(Phase::Exhale, 1.0).scale, 1.0));
        assert!(close(profile.map(Phase::Exhale, 1.0).emissive_intensity, 0.1));
    }

    #[test]
    fn test_holds_keep_scale() {
        let profile = VisualProfile::sphere();
        for progress in [0.0, 0.3, 1.0] {
            assert!(close(profile.map(Phase::Hold1, progress).scale, 1.5));
            assert!(close(profile.map(Phase::Hold2, progress).scale, 1.0));
        }
    }

    #[test]
    fn test_continuous_across_boundaries() {
        for profile in [VisualProfile::sphere(), VisualProfile::guide()] {
            let order = [Phase::Inhale, Phase::Hold1, Phase::Exhale, Phase::Hold2];
            for (i, &phase) in order.iter().enumerate() {
                let next = order[(i + 1) % order.len()];
                assert!(
                    params_close(profile.map(phase, 1.0), profile.map(next, 0.0)),
                    "{} -> {}",
                    phase,
                    next
                );
            }
            // Empty holds: inhale runs straight into exhale
            assert!(params_close(
                profile.map(Phase::Inhale, 1.0),
                profile.map(Phase::Exhale, 0.0)
            ));
        }
    }

    #[test]
    fn test_guide_profile_swings_further() {
        let end = VisualProfile::guide().map(Phase::Inhale, 1.0);
        assert!(close(end.hue, 0.4));
    }

    #[test]
    fn test_rotation_proportional_to_delta() {
        let profile = VisualProfile::sphere();
        let r = profile.rotation(2.0);
        assert!(close(r.y, 0.2));
        assert!(close(r.z, 0.1));
        assert_eq!(profile.rotation(-1.0), Rotation::default());
    }

    #[test]
    fn test_progress_clamped() {
        let profile = VisualProfile::sphere();
        assert!(close(profile.map(Phase::Inhale, 2.0).scale, 1.5));
        assert!(close(profile.map(Phase::Inhale, -1.0).scale, 1.0));
    }
}
