use std::time::Duration;

use crate::config::{
    EXTREME_ATTENUATION_DEPTH, EXTREME_MAGNITUDE, MEDIUM_ATTENUATION_DEPTH, MEDIUM_MAGNITUDE,
    SHAKE_BASE_MS, SHAKE_PER_MAGNITUDE_MS,
};
use crate::simulation::params::ShakeLevel;

/// Classify surface shaking from magnitude and hypocenter depth.
///
/// Magnitude picks the base level; depth then attenuates it one step per
/// threshold, EXTREME before MEDIUM, so a deep great quake can drop two levels.
pub fn classify(magnitude: f64, depth: f64) -> ShakeLevel {
    let mut level = ShakeLevel::Mild;
    if magnitude > MEDIUM_MAGNITUDE {
        level = ShakeLevel::Medium;
    }
    if magnitude > EXTREME_MAGNITUDE {
        level = ShakeLevel::Extreme;
    }

    if level == ShakeLevel::Extreme && depth > EXTREME_ATTENUATION_DEPTH {
        level = ShakeLevel::Medium;
    }
    if level == ShakeLevel::Medium && depth > MEDIUM_ATTENUATION_DEPTH {
        level = ShakeLevel::Mild;
    }

    level
}

/// Milliseconds of visible shaking for a magnitude
pub fn shake_duration_ms(magnitude: f64) -> f64 {
    SHAKE_BASE_MS + magnitude * SHAKE_PER_MAGNITUDE_MS
}

pub fn shake_duration(magnitude: f64) -> Duration {
    Duration::from_secs_f64(shake_duration_ms(magnitude) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_bands_at_shallow_depth() {
        for m in [1.0, 3.2, 4.9, 5.0] {
            assert_eq!(classify(m, 10.0), ShakeLevel::Mild, "m={}", m);
        }
        for m in [5.1, 6.0, 7.0] {
            assert_eq!(classify(m, 10.0), ShakeLevel::Medium, "m={}", m);
        }
        for m in [7.1, 8.5, 9.5] {
            assert_eq!(classify(m, 100.0), ShakeLevel::Extreme, "m={}", m);
        }
    }

    #[test]
    fn test_depth_attenuation() {
        assert_eq!(classify(7.5, 150.0), ShakeLevel::Medium);
        assert_eq!(classify(7.5, 50.0), ShakeLevel::Extreme);
        assert_eq!(classify(6.0, 350.0), ShakeLevel::Mild);
        assert_eq!(classify(6.0, 200.0), ShakeLevel::Medium);
    }

    #[test]
    fn test_double_attenuation() {
        assert_eq!(classify(9.0, 400.0), ShakeLevel::Mild);
        assert_eq!(classify(9.0, 300.0), ShakeLevel::Medium);
    }

    #[test]
    fn test_mild_never_attenuates_further() {
        assert_eq!(classify(2.0, 700.0), ShakeLevel::Mild);
    }

    #[test]
    fn test_classifier_never_returns_none() {
        let mut m = 1.0;
        while m <= 9.5 {
            let mut d = 0.0;
            while d <= 700.0 {
                assert_ne!(classify(m, d), ShakeLevel::None);
                d += 50.0;
            }
            m += 0.5;
        }
    }

    #[test]
    fn test_shake_duration() {
        assert_eq!(shake_duration_ms(5.5), 5750.0);
        assert_eq!(shake_duration(5.5), Duration::from_millis(5750));
        assert_eq!(shake_duration(1.0), Duration::from_millis(3500));
    }
}
