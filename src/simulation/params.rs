use std::fmt;

use crate::config::{
    DEFAULT_DEPTH, DEFAULT_MAGNITUDE, DEPTH_MAX, DEPTH_MIN, DEPTH_STEP, EPICENTER_MAX,
    MAGNITUDE_MAX, MAGNITUDE_MIN, MAGNITUDE_STEP,
};

/// Discrete severity of surface shaking, ordered from quiet to violent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShakeLevel {
    #[default]
    None,
    Mild,
    Medium,
    Extreme,
}

impl ShakeLevel {
    pub fn is_shaking(self) -> bool {
        self != ShakeLevel::None
    }
}

impl fmt::Display for ShakeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShakeLevel::None => "NONE",
            ShakeLevel::Mild => "MILD",
            ShakeLevel::Medium => "MEDIUM",
            ShakeLevel::Extreme => "EXTREME",
        };
        f.write_str(name)
    }
}

/// Setting the event strikes, used to frame the impact report
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocationType {
    #[default]
    UrbanMetropolis,
    CoastalRegion,
    RuralFarmland,
    Mountainous,
    IndustrialZone,
    Desert,
}

impl LocationType {
    pub const ALL: [LocationType; 6] = [
        LocationType::UrbanMetropolis,
        LocationType::CoastalRegion,
        LocationType::RuralFarmland,
        LocationType::Mountainous,
        LocationType::IndustrialZone,
        LocationType::Desert,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LocationType::UrbanMetropolis => "Urban Metropolis",
            LocationType::CoastalRegion => "Coastal Region",
            LocationType::RuralFarmland => "Rural Farmland",
            LocationType::Mountainous => "Mountainous",
            LocationType::IndustrialZone => "Industrial Zone",
            LocationType::Desert => "Desert",
        }
    }

    /// Next setting in selector order, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&l| l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Epicenter position as a percentage (0-100) of the map panel on each axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Epicenter {
    pub x: f64,
    pub y: f64,
}

impl Epicenter {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, EPICENTER_MAX),
            y: y.clamp(0.0, EPICENTER_MAX),
        }
    }
}

impl Default for Epicenter {
    fn default() -> Self {
        Self { x: 50.0, y: 50.0 }
    }
}

/// User-controlled inputs of one simulated event.
///
/// Fields are private so every edit passes through the clamping setters;
/// the orchestrator takes a copy as the immutable snapshot for a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    magnitude: f64,
    depth: f64,
    location_type: LocationType,
    epicenter: Epicenter,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAGNITUDE,
            DEFAULT_DEPTH,
            LocationType::default(),
            Epicenter::default(),
        )
    }
}

impl SimulationParams {
    pub fn new(magnitude: f64, depth: f64, location_type: LocationType, epicenter: Epicenter) -> Self {
        let mut params = Self {
            magnitude: MAGNITUDE_MIN,
            depth: DEPTH_MIN,
            location_type,
            epicenter,
        };
        params.set_magnitude(magnitude);
        params.set_depth(depth);
        params.set_epicenter(epicenter);
        params
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn epicenter(&self) -> Epicenter {
        self.epicenter
    }

    /// Set magnitude, snapped to the 0.1 slider step and clamped to [1.0, 9.5]
    pub fn set_magnitude(&mut self, magnitude: f64) {
        self.magnitude = quantize(magnitude, MAGNITUDE_STEP).clamp(MAGNITUDE_MIN, MAGNITUDE_MAX);
    }

    /// Set depth, snapped to the 5 km slider step and clamped to [0, 700]
    pub fn set_depth(&mut self, depth: f64) {
        self.depth = quantize(depth, DEPTH_STEP).clamp(DEPTH_MIN, DEPTH_MAX);
    }

    pub fn set_location_type(&mut self, location_type: LocationType) {
        self.location_type = location_type;
    }

    pub fn set_epicenter(&mut self, epicenter: Epicenter) {
        self.epicenter = Epicenter::new(epicenter.x, epicenter.y);
    }
}

fn quantize(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}
