use std::time::{Duration, Instant};

use crate::report::SimulationReport;
use crate::simulation::intensity::{classify, shake_duration};
use crate::simulation::params::{Epicenter, LocationType, ShakeLevel, SimulationParams};
use crate::simulation::propagation::{plan, PropagationPlan, RingFrame, Viewport};

/// Generation counter. Bumped on every trigger and reset; deferred work
/// tagged with an older epoch is stale and must be dropped.
pub type Epoch = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Active,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ReportState {
    Empty,
    Loading { epoch: Epoch },
    Ready(SimulationReport),
}

/// Handed out by `trigger`: the caller fetches a report for `params` and
/// delivers it back tagged with `epoch`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportTicket {
    pub epoch: Epoch,
    pub params: SimulationParams,
}

/// Revert-to-quiescent deadline armed by a trigger
#[derive(Clone, Copy, Debug)]
struct ShakeDeadline {
    epoch: Epoch,
    at: Instant,
}

/// Drives one simulated event from trigger to reset.
///
/// Holds no clock and does no I/O: callers pass the current `Instant`
/// and carry out report requests themselves. Shaking and report delivery
/// are independent; neither waits for the other.
pub struct Orchestrator {
    params: SimulationParams,
    phase: Phase,
    level: ShakeLevel,
    epoch: Epoch,
    deadline: Option<ShakeDeadline>,
    triggered_at: Option<Instant>,
    plan: Option<PropagationPlan>,
    report: ReportState,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(SimulationParams::default())
    }
}

impl Orchestrator {
    pub fn new(params: SimulationParams) -> Self {
        Self {
            params,
            phase: Phase::Idle,
            level: ShakeLevel::None,
            epoch: 0,
            deadline: None,
            triggered_at: None,
            plan: None,
            report: ReportState::Empty,
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn level(&self) -> ShakeLevel {
        self.level
    }

    pub fn report(&self) -> &ReportState {
        &self.report
    }

    pub fn plan(&self) -> Option<&PropagationPlan> {
        self.plan.as_ref()
    }

    /// Apply a parameter edit. Ignored while a simulation is running.
    pub fn edit_params(&mut self, edit: impl FnOnce(&mut SimulationParams)) -> bool {
        if self.is_active() {
            log::debug!("Parameters locked while simulation is active");
            return false;
        }
        edit(&mut self.params);
        true
    }

    pub fn set_magnitude(&mut self, magnitude: f64) -> bool {
        self.edit_params(|p| p.set_magnitude(magnitude))
    }

    pub fn set_depth(&mut self, depth: f64) -> bool {
        self.edit_params(|p| p.set_depth(depth))
    }

    pub fn set_location_type(&mut self, location_type: LocationType) -> bool {
        self.edit_params(|p| p.set_location_type(location_type))
    }

    pub fn set_epicenter(&mut self, epicenter: Epicenter) -> bool {
        self.edit_params(|p| p.set_epicenter(epicenter))
    }

    /// Start an event. Returns the report request to issue, or `None` if a
    /// simulation is already running.
    pub fn trigger(&mut self, now: Instant, map_viewport: Viewport) -> Option<ReportTicket> {
        if self.is_active() {
            log::debug!("Trigger ignored: simulation already active");
            return None;
        }

        self.epoch += 1;
        let magnitude = self.params.magnitude();
        let level = classify(magnitude, self.params.depth());
        let duration = shake_duration(magnitude);

        self.phase = Phase::Active;
        self.level = level;
        self.deadline = Some(ShakeDeadline {
            epoch: self.epoch,
            at: now + duration,
        });
        self.triggered_at = Some(now);
        self.plan = Some(plan(self.params.epicenter(), magnitude, map_viewport));
        self.report = ReportState::Loading { epoch: self.epoch };

        log::info!(
            "Quake triggered: M{:.1} at {} km ({}), level {}, shaking for {} ms",
            magnitude,
            self.params.depth(),
            self.params.location_type(),
            level,
            duration.as_millis()
        );

        Some(ReportTicket {
            epoch: self.epoch,
            params: self.params,
        })
    }

    /// Advance timers. Returns true when shaking subsided on this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline.epoch == self.epoch && now >= deadline.at => {
                self.deadline = None;
                self.level = ShakeLevel::None;
                log::info!("Shaking subsided");
                true
            }
            Some(deadline) if deadline.epoch != self.epoch => {
                self.deadline = None;
                false
            }
            _ => false,
        }
    }

    /// Accept a finished report. Stale epochs are dropped and return false.
    pub fn deliver_report(&mut self, epoch: Epoch, report: SimulationReport) -> bool {
        match self.report {
            ReportState::Loading { epoch: pending } if pending == epoch && epoch == self.epoch => {
                self.report = ReportState::Ready(report);
                true
            }
            _ => {
                log::debug!(
                    "Dropping stale report for epoch {} (current {})",
                    epoch,
                    self.epoch
                );
                false
            }
        }
    }

    /// Return to idle immediately, discarding shaking, rings and any report
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.phase = Phase::Idle;
        self.level = ShakeLevel::None;
        self.deadline = None;
        self.triggered_at = None;
        self.plan = None;
        self.report = ReportState::Empty;
        log::info!("Simulation reset");
    }

    /// Time since the running event was triggered
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.triggered_at
            .map(|at| now.saturating_duration_since(at))
    }

    /// Ring animation frames at `now`
    pub fn ring_frames(&self, now: Instant) -> Vec<RingFrame> {
        match (&self.plan, self.elapsed(now)) {
            (Some(plan), Some(elapsed)) => plan.frames_at(elapsed),
            _ => Vec::new(),
        }
    }

    /// True when no ring is pending or expanding at `now`
    pub fn rings_settled(&self, now: Instant) -> bool {
        match (&self.plan, self.elapsed(now)) {
            (Some(plan), Some(elapsed)) => plan.is_finished(elapsed),
            _ => true,
        }
    }

    /// Re-anchor the running event's rings to a resized map panel. Ring
    /// timing is kept; origin and reach follow the new panel size.
    pub fn relayout(&mut self, map_viewport: Viewport) {
        if self.plan.is_some() {
            self.plan = Some(plan(
                self.params.epicenter(),
                self.params.magnitude(),
                map_viewport,
            ));
        }
    }
}
