//! Background prediction thread
//!
//! Requests go in through one channel and completions come back through
//! another. A single worker drains the queue, so requests run one at a time
//! and complete in submission order.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use tracing::{debug, warn};

use super::Pipeline;
use crate::error::{PredictError, PredictResult};
use crate::risk::Assessment;

pub type RequestId = u64;

struct Job {
    id: RequestId,
    input: String,
}

/// A finished request, successful or not
#[derive(Debug)]
pub struct Completed {
    pub id: RequestId,
    pub result: PredictResult<Assessment>,
}

pub struct PredictionWorker {
    jobs: Option<Sender<Job>>,
    completions: Receiver<Completed>,
    handle: Option<JoinHandle<()>>,
    pending: VecDeque<RequestId>,
    next_id: RequestId,
}

impl PredictionWorker {
    /// Start the worker thread.
    pub fn spawn(pipeline: Arc<Pipeline>) -> Self {
        let (job_tx, job_rx) = unbounded::<Job>();
        let (done_tx, done_rx) = unbounded::<Completed>();

        let handle = thread::spawn(move || {
            debug!("Prediction worker started");
            for job in job_rx {
                let result = catch_unwind(AssertUnwindSafe(|| pipeline.run(&job.input)))
                    .unwrap_or_else(|_| {
                        Err(PredictError::inference("prediction panicked"))
                    });
                if let Err(e) = &result {
                    debug!("Request {} failed: {}", job.id, e);
                }
                if done_tx.send(Completed { id: job.id, result }).is_err() {
                    // Owner gone, nobody to report to
                    break;
                }
            }
            debug!("Prediction worker stopped");
        });

        Self {
            jobs: Some(job_tx),
            completions: done_rx,
            handle: Some(handle),
            pending: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Queue a request and return its id.
    pub fn submit(&mut self, input: impl Into<String>) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push_back(id);

        let job = Job {
            id,
            input: input.into(),
        };
        let sent = self.jobs.as_ref().map(|tx| tx.send(job).is_ok());
        if sent != Some(true) {
            // recv() reports the loss for this id
            warn!("Prediction worker is not running; request {} dropped", id);
        }
        id
    }

    /// Block until the oldest pending request completes.
    ///
    /// Returns `None` when nothing is pending.
    pub fn recv(&mut self) -> Option<Completed> {
        let expected = *self.pending.front()?;
        let completed = match self.completions.recv() {
            Ok(done) => done,
            Err(_) => lost(expected),
        };
        self.pending.pop_front();
        Some(completed)
    }

    /// Like [`recv`](Self::recv) but never blocks.
    pub fn try_recv(&mut self) -> Option<Completed> {
        let expected = *self.pending.front()?;
        let completed = match self.completions.try_recv() {
            Ok(done) => done,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => lost(expected),
        };
        self.pending.pop_front();
        Some(completed)
    }

    /// Number of submitted requests not yet received
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

fn lost(id: RequestId) -> Completed {
    Completed {
        id,
        result: Err(PredictError::inference("prediction worker stopped")),
    }
}

impl Drop for PredictionWorker {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Prediction worker exited abnormally");
            }
        }
    }
}
