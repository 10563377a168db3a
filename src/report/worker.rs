//! Background report fetching.
//!
//! One long-lived thread serves every trigger, so at most one request is in
//! flight at a time. Tickets that queue up behind a slow request are
//! collapsed to the newest: each trigger bumps the epoch, so only the last
//! queued ticket can still be current.

use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::report::{request_report, ReportSource, SimulationReport};
use crate::simulation::{Epoch, ReportTicket};

pub struct ReportWorker {
    tx: Sender<ReportTicket>,
}

impl ReportWorker {
    /// Start the worker. `deliver` runs on the worker thread once per
    /// fetched report.
    pub fn spawn<F>(source: Arc<dyn ReportSource>, deliver: F) -> io::Result<Self>
    where
        F: Fn(Epoch, SimulationReport) + Send + 'static,
    {
        let (tx, rx) = channel();
        thread::Builder::new()
            .name("report-worker".to_string())
            .spawn(move || Self::run(source, rx, deliver))?;
        Ok(Self { tx })
    }

    /// Queue a request. Returns false if the worker thread is gone.
    pub fn submit(&self, ticket: ReportTicket) -> bool {
        self.tx.send(ticket).is_ok()
    }

    fn run<F>(source: Arc<dyn ReportSource>, rx: Receiver<ReportTicket>, deliver: F)
    where
        F: Fn(Epoch, SimulationReport),
    {
        while let Ok(mut ticket) = rx.recv() {
            while let Ok(newer) = rx.try_recv() {
                log::debug!("Skipping superseded report request {}", ticket.epoch);
                ticket = newer;
            }
            let report = request_report(source.as_ref(), &ticket.params);
            deliver(ticket.epoch, report);
        }
        log::debug!("Report worker shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::simulation::{Epicenter, LocationType, SimulationParams};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Blocks its first fetch until the gate closes and records each
    /// requested magnitude.
    struct Gated {
        started: Mutex<Sender<f64>>,
        gate: Mutex<Receiver<()>>,
    }

    impl ReportSource for Gated {
        fn fetch(&self, params: &SimulationParams) -> Result<SimulationReport, ReportError> {
            let _ = self.started.lock().unwrap().send(params.magnitude());
            let _ = self.gate.lock().unwrap().recv();
            Err(ReportError::EmptyPayload)
        }
    }

    fn ticket(epoch: Epoch, magnitude: f64) -> ReportTicket {
        ReportTicket {
            epoch,
            params: SimulationParams::new(
                magnitude,
                10.0,
                LocationType::UrbanMetropolis,
                Epicenter::default(),
            ),
        }
    }

    #[test]
    fn test_queued_requests_collapse_to_newest() {
        let (started_tx, started_rx) = channel();
        let (gate_tx, gate_rx) = channel::<()>();
        let source = Arc::new(Gated {
            started: Mutex::new(started_tx),
            gate: Mutex::new(gate_rx),
        });
        let (delivered_tx, delivered_rx) = channel();
        let worker = ReportWorker::spawn(source, move |epoch, report| {
            let _ = delivered_tx.send((epoch, report));
        })
        .unwrap();

        assert!(worker.submit(ticket(1, 4.0)));
        let timeout = Duration::from_secs(5);
        assert_eq!(started_rx.recv_timeout(timeout).unwrap(), 4.0);

        // Trigger, reset, trigger while the first request is still blocked
        assert!(worker.submit(ticket(3, 6.0)));
        assert!(worker.submit(ticket(5, 8.0)));
        drop(gate_tx);

        let (first, report) = delivered_rx.recv_timeout(timeout).unwrap();
        assert_eq!(first, 1);
        assert_eq!(report, SimulationReport::fallback());

        let (second, _) = delivered_rx.recv_timeout(timeout).unwrap();
        assert_eq!(second, 5);
        assert_eq!(started_rx.recv_timeout(timeout).unwrap(), 8.0);
        assert!(started_rx.try_recv().is_err());
    }
}
