//! Background delivery of order payloads.
//!
//! # Responsibility
//! - Send order payloads from a worker thread so drag handling never waits
//!   on the network.
//! - Report each delivery result back as a `PersistOutcome`.
//!
//! # Invariants
//! - Payloads are delivered in submission order, one request each.
//! - A failed delivery is reported once and never retried.
//! - A payload the worker can no longer accept is reported as failed on the
//!   next drain or wait.
//! - Dropping the persister drains queued payloads before the worker exits.

use super::backend::{BackendError, CurriculumBackend};
use super::payload::ContentOrderPayload;
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

struct PersistJob {
    sequence: u64,
    payload: ContentOrderPayload,
}

/// Result of one delivered payload.
#[derive(Debug)]
pub struct PersistOutcome {
    /// Submission sequence number, starting at 1.
    pub sequence: u64,
    pub result: Result<(), BackendError>,
}

impl PersistOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fire-and-forget order sender backed by one worker thread.
pub struct Persister {
    jobs: Option<Sender<PersistJob>>,
    outcomes: Receiver<PersistOutcome>,
    undelivered: VecDeque<PersistOutcome>,
    worker: Option<JoinHandle<()>>,
    next_sequence: u64,
}

impl Persister {
    /// Spawns the delivery worker.
    pub fn spawn(backend: Arc<dyn CurriculumBackend>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<PersistJob>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<PersistOutcome>();

        let worker = std::thread::spawn(move || {
            for job in job_rx {
                let result = backend.update_content_order(&job.payload);
                match &result {
                    Ok(()) => info!(
                        "event=persist_order module=sync status=ok sequence={} topics={}",
                        job.sequence,
                        job.payload.sorting.len()
                    ),
                    Err(err) => warn!(
                        "event=persist_order module=sync status=error sequence={} error={}",
                        job.sequence, err
                    ),
                }
                if outcome_tx
                    .send(PersistOutcome {
                        sequence: job.sequence,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            undelivered: VecDeque::new(),
            worker: Some(worker),
            next_sequence: 1,
        }
    }

    /// Queues one payload and returns its sequence number.
    pub fn submit(&mut self, payload: ContentOrderPayload) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let sent = self
            .jobs
            .as_ref()
            .map(|jobs| jobs.send(PersistJob { sequence, payload }).is_ok())
            .unwrap_or(false);
        if !sent {
            warn!(
                "event=persist_submit module=sync status=error sequence={} reason=worker_stopped",
                sequence
            );
            self.undelivered.push_back(PersistOutcome {
                sequence,
                result: Err(BackendError::WorkerStopped),
            });
        }
        sequence
    }

    /// Returns every outcome reported so far without blocking.
    pub fn drain(&mut self) -> Vec<PersistOutcome> {
        let mut outcomes = self.undelivered.drain(..).collect::<Vec<_>>();
        outcomes.extend(self.outcomes.try_iter());
        outcomes
    }

    /// Waits up to `timeout` for the next outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<PersistOutcome> {
        if let Some(outcome) = self.undelivered.pop_front() {
            return Some(outcome);
        }
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for Persister {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
