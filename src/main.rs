mod app;
mod config;
mod error;
mod gpu;
mod layout;
mod report;
mod simulation;

use std::sync::Arc;

use winit::event_loop::EventLoop;

use app::{App, AppEvent};
use error::AppError;
use report::{GeminiClient, ReportConfig, ReportSource, ReportWorker};

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let report_config = ReportConfig::from_env();
    if report_config.api_key.is_none() {
        log::warn!("No GEMINI_API_KEY set; impact reports will fall back to placeholder data");
    }
    log::info!("Report model: {}", report_config.model);
    let report_source: Arc<dyn ReportSource> = Arc::new(GeminiClient::new(report_config)?);

    let event_loop = EventLoop::<AppEvent>::with_user_event().build()?;
    let proxy = event_loop.create_proxy();
    let reports = ReportWorker::spawn(report_source, move |epoch, report| {
        if proxy.send_event(AppEvent::ReportReady { epoch, report }).is_err() {
            log::debug!("Event loop closed before report {} arrived", epoch);
        }
    })?;
    let mut app = App::new(reports);
    event_loop.run_app(&mut app)?;

    app.into_result()
}
