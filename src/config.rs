/// Window size on first launch (two side-by-side panels)
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 480;

/// Gap between panels and window edge, in pixels
pub const PANEL_MARGIN: f32 = 16.0;

// ============================================
// Simulation Parameters
// ============================================

/// Magnitude slider bounds (Richter)
pub const MAGNITUDE_MIN: f64 = 1.0;
pub const MAGNITUDE_MAX: f64 = 9.5;
pub const MAGNITUDE_STEP: f64 = 0.1;

/// Hypocenter depth bounds in km
pub const DEPTH_MIN: f64 = 0.0;
pub const DEPTH_MAX: f64 = 700.0;
pub const DEPTH_STEP: f64 = 5.0;

/// Epicenter coordinates are a percentage of the map panel on each axis
pub const EPICENTER_MAX: f64 = 100.0;

pub const DEFAULT_MAGNITUDE: f64 = 5.5;
pub const DEFAULT_DEPTH: f64 = 10.0;

// ============================================
// Intensity Classification
// ============================================

/// Magnitude above which shaking is at least MEDIUM
pub const MEDIUM_MAGNITUDE: f64 = 5.0;

/// Magnitude above which shaking is EXTREME (before attenuation)
pub const EXTREME_MAGNITUDE: f64 = 7.0;

/// Deeper than this, EXTREME attenuates to MEDIUM
pub const EXTREME_ATTENUATION_DEPTH: f64 = 100.0;

/// Deeper than this, MEDIUM attenuates to MILD
pub const MEDIUM_ATTENUATION_DEPTH: f64 = 300.0;

/// Shake duration = base + magnitude * per-magnitude (milliseconds)
pub const SHAKE_BASE_MS: f64 = 3000.0;
pub const SHAKE_PER_MAGNITUDE_MS: f64 = 500.0;

// ============================================
// Seismograph
// ============================================

/// Number of samples kept in the trace history
pub const WAVEFORM_CAPACITY: usize = 100;

/// Signal gain applied to magnitude while shaking
pub const WAVEFORM_GAIN: f64 = 2.5;

/// Background noise scale at rest
pub const REST_NOISE_SCALE: f64 = 0.5;

/// Periods (ms divisors) of the sine and cosine components
pub const SINE_PERIOD_MS: f64 = 50.0;
pub const COSINE_PERIOD_MS: f64 = 20.0;

/// Fixed y-domain of the trace
pub const TRACE_DOMAIN: f32 = 50.0;

// ============================================
// Wave Propagation
// ============================================

/// Rings per unit of magnitude (floored)
pub const RINGS_PER_MAGNITUDE: f64 = 1.5;

/// Delay between consecutive rings
pub const RING_STAGGER_MS: f64 = 300.0;

/// Lifetime of a single ring animation
pub const RING_DURATION_MS: f64 = 2000.0;

/// Magnitude that makes a ring reach the shorter panel side
pub const RING_RADIUS_DIVISOR: f64 = 5.0;

/// Above this magnitude rings use the high-severity color
pub const RING_HIGH_SEVERITY_MAGNITUDE: f64 = 6.0;

pub const RING_START_OPACITY: f32 = 0.8;

/// Upper bound on rings per plan: floor(MAGNITUDE_MAX * RINGS_PER_MAGNITUDE) = 14
pub const MAX_RINGS: usize = 16;

// ============================================
// Screen Shake
// ============================================

/// Peak jitter of the whole scene, in pixels
pub const SHAKE_MILD_PX: f32 = 2.0;
pub const SHAKE_MEDIUM_PX: f32 = 5.0;
pub const SHAKE_EXTREME_PX: f32 = 10.0;

// ============================================
// Palette (sRGB, 0..1)
// ============================================

pub const COLOR_ALERT: [f32; 4] = [0.937, 0.267, 0.267, 1.0]; // #ef4444
pub const COLOR_AMBER: [f32; 4] = [0.961, 0.620, 0.043, 1.0]; // #f59e0b
pub const COLOR_CALM: [f32; 4] = [0.063, 0.725, 0.506, 1.0]; // #10b981
pub const COLOR_MARKER_IDLE: [f32; 4] = [0.231, 0.510, 0.965, 1.0]; // #3b82f6

// ============================================
// Impact Report Service
// ============================================

pub const REPORT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const REPORT_MODEL: &str = "gemini-3-flash-preview";
pub const REPORT_TIMEOUT_MS: u64 = 30_000;
