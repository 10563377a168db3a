use std::time::Duration;

use crate::config::{
    COLOR_ALERT, COLOR_AMBER, RINGS_PER_MAGNITUDE, RING_DURATION_MS,
    RING_HIGH_SEVERITY_MAGNITUDE, RING_RADIUS_DIVISOR, RING_STAGGER_MS, RING_START_OPACITY,
};
use crate::simulation::params::Epicenter;

/// Color class of a shockwave ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingColor {
    MidSeverity,
    HighSeverity,
}

impl RingColor {
    pub fn for_magnitude(magnitude: f64) -> Self {
        if magnitude > RING_HIGH_SEVERITY_MAGNITUDE {
            RingColor::HighSeverity
        } else {
            RingColor::MidSeverity
        }
    }

    pub fn rgba(self) -> [f32; 4] {
        match self {
            RingColor::MidSeverity => COLOR_AMBER,
            RingColor::HighSeverity => COLOR_ALERT,
        }
    }
}

/// Pixel size of the area rings expand across
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn shorter_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// One expanding shockwave, timed relative to the trigger
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagationRing {
    pub start_delay_ms: f64,
    pub duration_ms: f64,
    pub max_radius: f64,
    pub color: RingColor,
}

/// Animation state of a ring at one instant
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingFrame {
    pub radius: f64,
    pub opacity: f32,
    pub color: RingColor,
}

impl PropagationRing {
    /// Linear radius 0 -> max and opacity 0.8 -> 0 over the ring's lifetime.
    /// `None` before the ring starts and once it has finished.
    pub fn frame_at(&self, elapsed_ms: f64) -> Option<RingFrame> {
        let local = elapsed_ms - self.start_delay_ms;
        if local < 0.0 || local >= self.duration_ms {
            return None;
        }
        let progress = local / self.duration_ms;
        Some(RingFrame {
            radius: self.max_radius * progress,
            opacity: RING_START_OPACITY * (1.0 - progress as f32),
            color: self.color,
        })
    }

    fn end_ms(&self) -> f64 {
        self.start_delay_ms + self.duration_ms
    }
}

/// Rings for one trigger, anchored at the epicenter in viewport pixels
#[derive(Clone, Debug, PartialEq)]
pub struct PropagationPlan {
    pub origin: (f64, f64),
    pub rings: Vec<PropagationRing>,
}

impl PropagationPlan {
    /// Live rings at `elapsed` since the trigger
    pub fn frames_at(&self, elapsed: Duration) -> Vec<RingFrame> {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.rings
            .iter()
            .filter_map(|ring| ring.frame_at(elapsed_ms))
            .collect()
    }

    /// True once every ring has run its course
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.rings.iter().all(|ring| elapsed_ms >= ring.end_ms())
    }
}

/// Plan the shockwave rings for an event.
///
/// `floor(magnitude * 1.5)` rings, 300 ms apart, each 2 s long, all
/// reaching `min(width, height) * magnitude / 5`.
pub fn plan(epicenter: Epicenter, magnitude: f64, viewport: Viewport) -> PropagationPlan {
    let ring_count = (magnitude * RINGS_PER_MAGNITUDE).floor().max(0.0) as usize;
    let color = RingColor::for_magnitude(magnitude);
    let max_radius = viewport.shorter_side() * (magnitude / RING_RADIUS_DIVISOR);

    let rings = (0..ring_count)
        .map(|i| PropagationRing {
            start_delay_ms: i as f64 * RING_STAGGER_MS,
            duration_ms: RING_DURATION_MS,
            max_radius,
            color,
        })
        .collect();

    PropagationPlan {
        origin: (
            epicenter.x / 100.0 * viewport.width,
            epicenter.y / 100.0 * viewport.height,
        ),
        rings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(600.0, 400.0)
    }

    #[test]
    fn test_ring_count() {
        let e = Epicenter::default();
        assert_eq!(plan(e, 4.0, viewport()).rings.len(), 6);
        assert_eq!(plan(e, 9.0, viewport()).rings.len(), 13);
        assert_eq!(plan(e, 1.0, viewport()).rings.len(), 1);
        assert_eq!(plan(e, 9.5, viewport()).rings.len(), 14);
    }

    #[test]
    fn test_color_threshold() {
        let e = Epicenter::default();
        assert!(plan(e, 6.0, viewport())
            .rings
            .iter()
            .all(|r| r.color == RingColor::MidSeverity));
        assert!(plan(e, 6.1, viewport())
            .rings
            .iter()
            .all(|r| r.color == RingColor::HighSeverity));
    }

    #[test]
    fn test_ring_timing_and_radius() {
        let p = plan(Epicenter::default(), 5.0, viewport());
        for (i, ring) in p.rings.iter().enumerate() {
            assert_eq!(ring.start_delay_ms, i as f64 * 300.0);
            assert_eq!(ring.duration_ms, 2000.0);
            // min(600, 400) * 5 / 5
            assert_eq!(ring.max_radius, 400.0);
        }
    }

    #[test]
    fn test_origin_in_viewport_pixels() {
        let p = plan(Epicenter::new(25.0, 75.0), 5.0, viewport());
        assert_eq!(p.origin, (150.0, 300.0));
    }

    #[test]
    fn test_frame_interpolation() {
        let ring = PropagationRing {
            start_delay_ms: 300.0,
            duration_ms: 2000.0,
            max_radius: 200.0,
            color: RingColor::MidSeverity,
        };
        assert_eq!(ring.frame_at(299.0), None);

        let start = ring.frame_at(300.0).unwrap();
        assert_eq!(start.radius, 0.0);
        assert!((start.opacity - 0.8).abs() < 1e-6);

        let mid = ring.frame_at(1300.0).unwrap();
        assert_eq!(mid.radius, 100.0);
        assert!((mid.opacity - 0.4).abs() < 1e-6);

        assert_eq!(ring.frame_at(2300.0), None);
    }

    #[test]
    fn test_plan_frames_and_finish() {
        let p = plan(Epicenter::default(), 4.0, viewport());
        assert_eq!(p.frames_at(Duration::from_millis(0)).len(), 1);
        // rings 0..=3 have started by 1000 ms, none finished yet
        assert_eq!(p.frames_at(Duration::from_millis(1000)).len(), 4);
        assert!(!p.is_finished(Duration::from_millis(3400)));
        // last ring starts at 1500 ms and ends at 3500 ms
        assert!(p.is_finished(Duration::from_millis(3500)));
        assert!(p.frames_at(Duration::from_millis(3500)).is_empty());
    }
}
