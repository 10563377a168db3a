//! Error types

use thiserror::Error;

/// Failures while bringing up the window and GPU
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Surface not supported by adapter")]
    UnsupportedSurface,

    #[error("Failed to build report client: {0}")]
    ReportClient(#[from] ReportError),

    #[error("Failed to start report worker: {0}")]
    ReportWorker(#[from] std::io::Error),
}

/// Failures talking to the impact report service.
///
/// Fetch failures never reach the orchestrator: `report::request_report`
/// turns every one of them into the fallback report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No API key configured (set GEMINI_API_KEY or API_KEY)")]
    MissingApiKey,

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No response text from service")]
    EmptyPayload,
}
