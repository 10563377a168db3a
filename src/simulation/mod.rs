mod intensity;
mod orchestrator;
mod params;
mod propagation;
mod waveform;

pub use orchestrator::{Epoch, Orchestrator, ReportState, ReportTicket};
pub use params::{Epicenter, ShakeLevel, SimulationParams};
pub use propagation::Viewport;
pub use waveform::{wall_clock_ms, WaveformGenerator};

#[cfg(test)]
pub use params::LocationType;
