//! Easing curves for time-parameterized trajectories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when resolving easing curves from stage data.
#[derive(Debug, Clone, Error)]
pub enum EasingError {
    /// The named curve does not exist
    #[error("unknown easing curve: {0}")]
    UnknownCurve(String),
}

/// Easing curve applied to normalized trajectory time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// No easing, constant rate.
    #[default]
    Linear,
    /// Quadratic ease-in, slow start.
    SmoothIn,
    /// Quadratic ease-out, slow finish.
    SmoothOut,
    /// Smoothstep, slow at both ends.
    SmoothInOut,
    /// Cubic ease-in, slower start.
    CubicIn,
    /// Cubic ease-out, slower finish.
    CubicOut,
}

impl Easing {
    /// Applies the curve to `t`, clamped to [0, 1].
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::SmoothIn => t * t,
            Self::SmoothOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::SmoothInOut => t * t * (3.0 - 2.0 * t),
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// Resolves a curve by its stage-data name.
    pub fn from_name(name: &str) -> Result<Self, EasingError> {
        match name {
            "linear" => Ok(Self::Linear),
            "smooth_in" => Ok(Self::SmoothIn),
            "smooth_out" => Ok(Self::SmoothOut),
            "smooth_in_out" => Ok(Self::SmoothInOut),
            "cubic_in" => Ok(Self::CubicIn),
            "cubic_out" => Ok(Self::CubicOut),
            other => Err(EasingError::UnknownCurve(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_exact() {
        let curves = [
            Easing::Linear,
            Easing::SmoothIn,
            Easing::SmoothOut,
            Easing::SmoothInOut,
            Easing::CubicIn,
            Easing::CubicOut,
        ];
        for curve in curves {
            assert_eq!(curve.apply(0.0), 0.0, "{curve:?} at 0");
            assert_eq!(curve.apply(1.0), 1.0, "{curve:?} at 1");
        }
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Easing::CubicIn.apply(-2.0), 0.0);
        assert_eq!(Easing::CubicIn.apply(5.0), 1.0);
    }

    #[test]
    fn test_smooth_in_lags_linear() {
        assert!(Easing::SmoothIn.apply(0.5) < 0.5);
        assert!(Easing::SmoothOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Easing::from_name("smooth_in_out").ok(), Some(Easing::SmoothInOut));
        assert!(Easing::from_name("bouncy").is_err());
    }
}
