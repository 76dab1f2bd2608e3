//! Background validation runs
//!
//! A run moves `Idle -> Running -> {Finished, Cancelled}`. The worker thread
//! pushes every defect over an mpsc channel as soon as it is found and ends
//! with exactly one terminal event. Status changes and error publication share
//! one lock, so nothing is published once `cancel()` has returned.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::debug;

use crate::error::{Result, ValidatorError};
use crate::geometry::Geometry;

use super::checks::{run_checks, CheckOutcome};
use super::reporter::Reporter;
use super::types::{RunStatus, ValidationError, ValidationEvent, ValidationRules, ValidationSummary};

/// State shared between a worker and its handle
#[derive(Debug)]
struct RunControl {
    status: Mutex<RunStatus>,
    cancel_requested: AtomicBool,
}

impl RunControl {
    fn new() -> Self {
        Self {
            status: Mutex::new(RunStatus::Idle),
            cancel_requested: AtomicBool::new(false),
        }
    }

    fn status(&self) -> RunStatus {
        *self.status.lock()
    }

    fn cancel(&self) {
        let mut status = self.status.lock();
        self.cancel_requested.store(true, Ordering::SeqCst);
        if *status == RunStatus::Running {
            *status = RunStatus::Cancelled;
        }
    }
}

/// Worker-side sink: records each defect and pushes it to the handle
struct ChannelReporter {
    control: Arc<RunControl>,
    events: Sender<ValidationEvent>,
    errors: Vec<ValidationError>,
}

impl Reporter for ChannelReporter {
    fn report(&mut self, error: ValidationError) {
        let status = self.control.status.lock();
        if *status != RunStatus::Running {
            return;
        }
        self.errors.push(error.clone());
        // Receiver gone means the handle was dropped; the run is being cancelled
        let _ = self.events.send(ValidationEvent::ErrorFound(error));
    }

    fn is_cancelled(&self) -> bool {
        self.control.cancel_requested.load(Ordering::SeqCst)
    }
}

/// What the worker hands back through its join handle
#[derive(Debug)]
struct RunReport {
    errors: Vec<ValidationError>,
    summary: ValidationSummary,
}

/// Final state of a run after `wait()`
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationOutcome {
    pub errors: Vec<ValidationError>,
    pub summary: ValidationSummary,
}

impl ValidationOutcome {
    pub fn status(&self) -> RunStatus {
        self.summary.status
    }

    pub fn is_valid(&self) -> bool {
        self.summary.status == RunStatus::Finished && self.errors.is_empty()
    }
}

/// A validation run over one geometry snapshot
#[derive(Debug)]
pub struct ValidationRun {
    geometry: Arc<Geometry>,
    rules: ValidationRules,
    control: Arc<RunControl>,
}

impl ValidationRun {
    /// Create an idle run with default rules
    pub fn new(geometry: Geometry) -> Result<Self> {
        Self::with_rules(geometry, ValidationRules::default())
    }

    /// Create an idle run; malformed input is rejected here, not in the worker
    pub fn with_rules(geometry: Geometry, rules: ValidationRules) -> Result<Self> {
        geometry.ensure_well_formed()?;
        Ok(Self {
            geometry: Arc::new(geometry),
            rules,
            control: Arc::new(RunControl::new()),
        })
    }

    pub fn status(&self) -> RunStatus {
        self.control.status()
    }

    /// Spawn the worker; a run can only be started once
    pub fn start(&mut self) -> Result<ValidationHandle> {
        {
            let mut status = self.control.status.lock();
            if *status != RunStatus::Idle {
                return Err(ValidatorError::AlreadyStarted);
            }
            *status = RunStatus::Running;
        }

        let (tx, rx) = mpsc::channel();
        let geometry = Arc::clone(&self.geometry);
        let rules = self.rules.clone();
        let control = Arc::clone(&self.control);

        debug!(
            "[Validator] Starting run: {} parts, {} vertices",
            geometry.parts.len(),
            geometry.vertex_count()
        );

        let worker = thread::spawn(move || run_worker(&geometry, &rules, control, tx));

        Ok(ValidationHandle {
            control: Arc::clone(&self.control),
            events: rx,
            pending: VecDeque::new(),
            errors: Vec::new(),
            summary: None,
            worker: Some(worker),
        })
    }
}

fn run_worker(
    geometry: &Geometry,
    rules: &ValidationRules,
    control: Arc<RunControl>,
    events: Sender<ValidationEvent>,
) -> RunReport {
    let start = Instant::now();
    let mut reporter = ChannelReporter {
        control: Arc::clone(&control),
        events: events.clone(),
        errors: Vec::new(),
    };
    let outcome = run_checks(geometry, rules, &mut reporter);

    let mut status = control.status.lock();
    if *status == RunStatus::Running {
        *status = match outcome {
            CheckOutcome::Completed => RunStatus::Finished,
            CheckOutcome::Cancelled => RunStatus::Cancelled,
        };
    }
    let summary = ValidationSummary {
        status: *status,
        error_count: reporter.errors.len(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };
    // Sent under the lock so a terminal status implies the terminal event is queued
    let terminal = match summary.status {
        RunStatus::Cancelled => ValidationEvent::Cancelled(summary.clone()),
        _ => ValidationEvent::Finished(summary.clone()),
    };
    let _ = events.send(terminal);
    drop(status);

    debug!(
        "[Validator] Run {:?} in {:.2}ms: {}",
        summary.status,
        summary.elapsed_ms,
        summary.message()
    );

    RunReport {
        errors: reporter.errors,
        summary,
    }
}

/// Caller's side of a running validation
///
/// Dropping the handle cancels the run and joins the worker.
#[derive(Debug)]
pub struct ValidationHandle {
    control: Arc<RunControl>,
    events: Receiver<ValidationEvent>,
    /// Events pulled off the channel by `errors()` but not yet handed out
    pending: VecDeque<ValidationEvent>,
    errors: Vec<ValidationError>,
    summary: Option<ValidationSummary>,
    worker: Option<JoinHandle<RunReport>>,
}

impl ValidationHandle {
    /// Request cancellation; no-op once the run has ended
    pub fn cancel(&self) {
        self.control.cancel();
    }

    pub fn status(&self) -> RunStatus {
        self.control.status()
    }

    /// True once the run is `Finished` or `Cancelled`
    pub fn is_finished(&self) -> bool {
        self.status().is_terminal()
    }

    /// Errors received so far, in emission order
    pub fn errors(&mut self) -> &[ValidationError] {
        while let Ok(event) = self.events.try_recv() {
            self.absorb(&event);
            self.pending.push_back(event);
        }
        &self.errors
    }

    /// Summary, once the terminal event has been received
    pub fn summary(&self) -> Option<&ValidationSummary> {
        self.summary.as_ref()
    }

    /// Next event without blocking
    pub fn try_next_event(&mut self) -> Option<ValidationEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match self.events.try_recv() {
            Ok(event) => {
                self.absorb(&event);
                Some(event)
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Next event, blocking until one arrives; `None` after the terminal event
    pub fn next_event(&mut self) -> Option<ValidationEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        let event = self.events.recv().ok()?;
        self.absorb(&event);
        Some(event)
    }

    /// Block until the worker exits and return everything it found
    pub fn wait(mut self) -> ValidationOutcome {
        let Some(worker) = self.worker.take() else {
            return self.outcome_so_far();
        };
        match worker.join() {
            Ok(report) => ValidationOutcome {
                errors: report.errors,
                summary: report.summary,
            },
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    fn absorb(&mut self, event: &ValidationEvent) {
        match event {
            ValidationEvent::ErrorFound(error) => self.errors.push(error.clone()),
            ValidationEvent::Finished(summary) | ValidationEvent::Cancelled(summary) => {
                self.summary = Some(summary.clone())
            }
        }
    }

    fn outcome_so_far(&mut self) -> ValidationOutcome {
        self.errors();
        let summary = self.summary.clone().unwrap_or(ValidationSummary {
            status: self.status(),
            error_count: self.errors.len(),
            elapsed_ms: 0.0,
        });
        ValidationOutcome {
            errors: self.errors.clone(),
            summary,
        }
    }
}

impl Drop for ValidationHandle {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.control.cancel();
            let _ = worker.join();
        }
    }
}
