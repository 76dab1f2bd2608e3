//! Server state management for the validation server
//!
//! A run stays addressable after its terminal notification has gone out, so
//! clients can still query its status and errors. Only the newest
//! `retain_finished` settled runs are kept; older ones are dropped and their
//! ids become unknown.

use std::collections::VecDeque;

use indexmap::IndexMap;
use tracing::debug;

use crate::validator::{ValidationEvent, ValidationHandle, ValidationRules};

use super::protocol::Notification;

/// Session rules and the background runs started in this session
pub struct ServerState {
    pub rules: ValidationRules,
    /// Runs in creation order, settled ones included until evicted
    pub runs: IndexMap<u64, ValidationHandle>,
    /// Settled runs kept for queries once their terminal event was delivered
    pub retain_finished: usize,
    /// Ids of runs whose terminal event was delivered, oldest first
    settled: VecDeque<u64>,
    next_run_id: u64,
}

pub const DEFAULT_RETAIN_FINISHED: usize = 64;

impl ServerState {
    pub fn new() -> Self {
        Self {
            rules: ValidationRules::default(),
            runs: IndexMap::new(),
            retain_finished: DEFAULT_RETAIN_FINISHED,
            settled: VecDeque::new(),
            next_run_id: 1,
        }
    }

    /// Register a started run and return its id
    pub fn insert_run(&mut self, handle: ValidationHandle) -> u64 {
        let run_id = self.next_run_id;
        self.next_run_id += 1;
        self.runs.insert(run_id, handle);
        run_id
    }

    pub fn run_mut(&mut self, run_id: u64) -> Option<&mut ValidationHandle> {
        self.runs.get_mut(&run_id)
    }

    /// Remove a run; dropping the handle cancels and joins its worker
    pub fn discard_run(&mut self, run_id: u64) -> Option<ValidationHandle> {
        self.settled.retain(|&id| id != run_id);
        self.runs.shift_remove(&run_id)
    }

    /// Events queued by every run, as notifications, without blocking
    ///
    /// Evicts the oldest settled runs beyond `retain_finished` afterwards.
    pub fn pending_notifications(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for (&run_id, handle) in self.runs.iter_mut() {
            while let Some(event) = handle.try_next_event() {
                if matches!(event, ValidationEvent::Finished(_) | ValidationEvent::Cancelled(_)) {
                    self.settled.push_back(run_id);
                }
                notifications.push(Notification::from_event(run_id, &event));
            }
        }
        self.evict_settled();
        notifications
    }

    fn evict_settled(&mut self) {
        while self.settled.len() > self.retain_finished {
            let Some(run_id) = self.settled.pop_front() else {
                break;
            };
            if self.runs.shift_remove(&run_id).is_some() {
                debug!("[Validator Server] Evicted settled run {}", run_id);
            }
        }
    }

    /// Cancel every run and collect the rest of their events
    ///
    /// Blocks until each worker has sent its terminal event.
    pub fn shutdown(&mut self) -> Vec<Notification> {
        debug!("[Validator Server] Cancelling {} active runs", self.runs.len());
        for handle in self.runs.values() {
            handle.cancel();
        }
        let mut notifications = Vec::new();
        for (&run_id, handle) in self.runs.iter_mut() {
            while let Some(event) = handle.next_event() {
                notifications.push(Notification::from_event(run_id, &event));
            }
        }
        self.runs.clear();
        self.settled.clear();
        notifications
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
