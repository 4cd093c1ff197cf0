use serde::{Deserialize, Serialize};

/// A search point, one component per problem dimension.
pub type Point = Vec<f32>;

/// Stand-in for the negative end of the float range.
///
/// Arithmetic clamps negative infinity to `1 - f32::MAX` rather than
/// `-f32::MAX`. Evolved programs were bred against this value, so it stays.
pub const NEG_FLOAT_CLAMP: f32 = 1.0 - f32::MAX;

/// Error recorded for a move that left the problem bounds.
pub const OUT_OF_BOUNDS_ERROR: f32 = f32::MAX;

/// Distance used in place of an infinite or undefined behavioural distance.
pub const DISTANCE_SENTINEL: f64 = 1e99;

/// Clamp a float result into the finite range. NaN becomes zero.
#[inline]
pub fn clamp_float(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else if value == f32::INFINITY {
        f32::MAX
    } else if value == f32::NEG_INFINITY {
        NEG_FLOAT_CLAMP
    } else {
        value
    }
}

/// Clamp infinities only, returning `fallback` for NaN.
#[inline]
pub fn clamp_float_or(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        clamp_float(value)
    }
}

/// Which breeding scheme produces the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReproductionMode {
    /// Elitism plus tournament-selected mutation and crossover.
    Standard,
    /// Deterministic crowding over parent groups.
    Crowding,
}

/// How swarm members pick their starting points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartMode {
    Random,
    Fixed,
    Share,
    Defined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_is_asymmetric() {
        assert_eq!(clamp_float(f32::INFINITY), f32::MAX);
        assert_eq!(clamp_float(f32::NEG_INFINITY), 1.0 - f32::MAX);
        assert_eq!(clamp_float(f32::NAN), 0.0);
        assert_eq!(clamp_float(-2.5), -2.5);
    }

    #[test]
    fn test_clamp_with_fallback() {
        assert_eq!(clamp_float_or(f32::NAN, 3.0), 3.0);
        assert_eq!(clamp_float_or(f32::INFINITY, 3.0), f32::MAX);
    }
}
