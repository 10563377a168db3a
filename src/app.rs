use std::sync::Arc;
use std::time::Instant;

use rand::rngs::ThreadRng;
use rand::Rng;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{
    COLOR_ALERT, COLOR_CALM, COLOR_MARKER_IDLE, DEPTH_STEP, MAGNITUDE_STEP, SHAKE_EXTREME_PX,
    SHAKE_MEDIUM_PX, SHAKE_MILD_PX, TRACE_DOMAIN, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::error::AppError;
use crate::gpu::{FrameParams, GpuContext, RenderPipeline, RingInstance, SceneBuffers};
use crate::layout::PanelLayout;
use crate::report::{ReportWorker, SimulationReport};
use crate::simulation::{
    wall_clock_ms, Epoch, Orchestrator, ReportState, ShakeLevel, WaveformGenerator,
};

/// Events posted to the loop from worker threads
#[derive(Debug)]
pub enum AppEvent {
    ReportReady { epoch: Epoch, report: SimulationReport },
}

/// Everything that exists only once a window is up
struct Renderer {
    gpu: GpuContext,
    buffers: SceneBuffers,
    pipeline: RenderPipeline,
    bind_group: wgpu::BindGroup,
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    reports: ReportWorker,
    orchestrator: Orchestrator,
    waveform: WaveformGenerator,
    layout: PanelLayout,
    cursor: Option<PhysicalPosition<f64>>,
    jitter: ThreadRng,
    fps_counter: FpsCounter,
    fps: f64,
    error: Option<AppError>,
}

impl App {
    pub fn new(reports: ReportWorker) -> Self {
        Self {
            window: None,
            renderer: None,
            reports,
            orchestrator: Orchestrator::default(),
            waveform: WaveformGenerator::new(),
            layout: PanelLayout::for_window(WINDOW_WIDTH, WINDOW_HEIGHT),
            cursor: None,
            jitter: rand::thread_rng(),
            fps_counter: FpsCounter::new(),
            fps: 0.0,
            error: None,
        }
    }

    /// Start-up failure recorded while the loop was running, if any
    pub fn into_result(self) -> Result<(), AppError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        log::info!("Initializing SEISMOGEN earthquake simulator...");

        let window_attrs = Window::default_attributes()
            .with_title("SEISMOGEN - Initializing...")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        log::info!("Creating GPU context...");
        let gpu = pollster::block_on(GpuContext::new(window.clone()))?;

        let (width, height) = gpu.size();
        self.layout = PanelLayout::for_window(width, height);

        log::info!("Creating scene pipeline...");
        let buffers = SceneBuffers::new(&gpu.device);
        let pipeline = RenderPipeline::new(&gpu.device, gpu.format());
        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers);

        log::info!("Initialization complete!");
        log::info!("Controls:");
        log::info!("  Up/Down: Magnitude -/+ {:.1}", MAGNITUDE_STEP);
        log::info!("  Left/Right: Depth -/+ {} km", DEPTH_STEP);
        log::info!("  L: Next environment");
        log::info!("  Click map: Set epicenter");
        log::info!("  Space/Enter: Trigger quake / reset system");
        log::info!("  R: Reset system");
        log::info!("  Escape: Quit");

        window.request_redraw();
        self.window = Some(window);
        self.renderer = Some(Renderer {
            gpu,
            buffers,
            pipeline,
            bind_group,
        });
        self.refresh_title();
        Ok(())
    }

    fn trigger(&mut self) {
        let viewport = self.layout.map.viewport();
        if let Some(ticket) = self.orchestrator.trigger(Instant::now(), viewport) {
            log::info!("ANALYZING SEISMIC DATA...");
            let epoch = ticket.epoch;
            if !self.reports.submit(ticket) {
                log::error!("Report worker stopped; using fallback report");
                self.orchestrator
                    .deliver_report(epoch, SimulationReport::fallback());
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        let params = *self.orchestrator.params();
        match key_code {
            KeyCode::ArrowUp => {
                self.orchestrator.set_magnitude(params.magnitude() + MAGNITUDE_STEP);
            }
            KeyCode::ArrowDown => {
                self.orchestrator.set_magnitude(params.magnitude() - MAGNITUDE_STEP);
            }
            KeyCode::ArrowRight => {
                self.orchestrator.set_depth(params.depth() + DEPTH_STEP);
            }
            KeyCode::ArrowLeft => {
                self.orchestrator.set_depth(params.depth() - DEPTH_STEP);
            }
            KeyCode::KeyL => {
                let next = params.location_type().next();
                if self.orchestrator.set_location_type(next) {
                    log::info!("Environment: {}", next);
                }
            }
            KeyCode::Space | KeyCode::Enter | KeyCode::NumpadEnter => {
                if self.orchestrator.is_active() {
                    self.orchestrator.reset();
                } else {
                    self.trigger();
                }
            }
            KeyCode::KeyR => {
                if self.orchestrator.is_active() {
                    self.orchestrator.reset();
                }
            }
            _ => return,
        }
        self.refresh_title();
    }

    fn handle_click(&mut self) {
        let Some(position) = self.cursor else {
            return;
        };
        if self.orchestrator.is_active() {
            log::debug!("Epicenter locked during simulation");
            return;
        }
        if let Some(epicenter) = self.layout.epicenter_at(position.x as f32, position.y as f32) {
            self.orchestrator.set_epicenter(epicenter);
            log::info!("Epicenter set to ({:.1}, {:.1})", epicenter.x, epicenter.y);
        }
    }

    fn handle_report(&mut self, epoch: Epoch, report: SimulationReport) {
        if !self.orchestrator.deliver_report(epoch, report) {
            return;
        }
        if let ReportState::Ready(report) = self.orchestrator.report() {
            log::info!("\n{}", report);
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let params = self.orchestrator.params();
        let status = if self.orchestrator.is_active() {
            "EVENT IN PROGRESS"
        } else {
            "MONITORING"
        };
        let report = match self.orchestrator.report() {
            ReportState::Empty => String::new(),
            ReportState::Loading { .. } => " | ANALYZING SEISMIC DATA...".to_string(),
            ReportState::Ready(report) => format!(" | {}", report.headline),
        };
        window.set_title(&format!(
            "SEISMOGEN - {} - M{:.1} | {} km | {} | {:.0} FPS{}",
            status,
            params.magnitude(),
            params.depth(),
            params.location_type(),
            self.fps,
            report
        ));
    }

    /// One frame: advance timers, take a seismograph sample, draw
    fn frame(&mut self) {
        let now = Instant::now();
        if self.orchestrator.tick(now) {
            self.refresh_title();
        }

        let level = self.orchestrator.level();
        self.waveform
            .sample(level, self.orchestrator.params().magnitude(), wall_clock_ms());

        self.render(now, level);

        if let Some(fps) = self.fps_counter.tick() {
            self.fps = fps;
            self.refresh_title();
        }
    }

    fn render(&mut self, now: Instant, level: ShakeLevel) {
        let samples: Vec<f32> = self.waveform.samples().map(|s| s as f32).collect();
        let rings: Option<Vec<RingInstance>> = if self.orchestrator.rings_settled(now) {
            None
        } else {
            Some(
                self.orchestrator
                    .ring_frames(now)
                    .into_iter()
                    .map(|frame| RingInstance {
                        color: frame.color.rgba(),
                        radius: frame.radius as f32,
                        opacity: frame.opacity,
                        _padding: [0.0, 0.0],
                    })
                    .collect(),
            )
        };

        let map = self.layout.map;
        let epicenter = match self.orchestrator.plan() {
            Some(plan) => [plan.origin.0 as f32, plan.origin.1 as f32],
            None => {
                let e = self.orchestrator.params().epicenter();
                [e.x as f32 / 100.0 * map.width, e.y as f32 / 100.0 * map.height]
            }
        };
        let amplitude = shake_amplitude(level);
        let shake_offset = if amplitude > 0.0 {
            [
                self.jitter.gen_range(-amplitude..=amplitude),
                self.jitter.gen_range(-amplitude..=amplitude),
            ]
        } else {
            [0.0, 0.0]
        };
        let active = self.orchestrator.is_active();

        let Some(renderer) = self.renderer.as_ref() else {
            return;
        };
        let gpu = &renderer.gpu;

        let sample_count = renderer.buffers.update_samples(&gpu.queue, &samples);
        let ring_count = match &rings {
            Some(rings) => renderer.buffers.update_rings(&gpu.queue, rings),
            None => 0,
        };
        renderer.buffers.update_frame(
            &gpu.queue,
            &FrameParams {
                trace_rect: self.layout.seismograph.as_array(),
                map_rect: map.as_array(),
                trace_color: if level == ShakeLevel::Extreme { COLOR_ALERT } else { COLOR_CALM },
                live_color: if level.is_shaking() { COLOR_ALERT } else { COLOR_CALM },
                marker_color: if active { COLOR_ALERT } else { COLOR_MARKER_IDLE },
                epicenter,
                shake_offset,
                sample_count,
                ring_count,
                trace_domain: TRACE_DOMAIN,
                _padding: 0,
            },
        );

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        renderer.pipeline.draw(&mut encoder, &view, &renderer.bind_group);

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Peak screen jitter in pixels for a shake level
fn shake_amplitude(level: ShakeLevel) -> f32 {
    match level {
        ShakeLevel::None => 0.0,
        ShakeLevel::Mild => SHAKE_MILD_PX,
        ShakeLevel::Medium => SHAKE_MEDIUM_PX,
        ShakeLevel::Extreme => SHAKE_EXTREME_PX,
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Initialization failed: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::ReportReady { epoch, report } => self.handle_report(epoch, report),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = &mut self.renderer {
                    log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                    renderer.gpu.resize(new_size);
                    let (width, height) = renderer.gpu.size();
                    self.layout = PanelLayout::for_window(width, height);
                    self.orchestrator.relayout(self.layout.map.viewport());
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_amplitude_grows_with_level() {
        assert_eq!(shake_amplitude(ShakeLevel::None), 0.0);
        assert!(shake_amplitude(ShakeLevel::Mild) < shake_amplitude(ShakeLevel::Medium));
        assert!(shake_amplitude(ShakeLevel::Medium) < shake_amplitude(ShakeLevel::Extreme));
    }

    #[test]
    fn test_fps_counter_quiet_within_first_second() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.tick(), None);
        assert_eq!(counter.frame_count, 1);
    }
}
