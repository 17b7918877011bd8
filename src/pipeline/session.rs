//! Interactive-side session state
//!
//! The session submits requests to the worker and applies completions on
//! the caller's thread: a success appends to the trend and replaces the
//! shown result, a failure clears the shown result and leaves the trend
//! alone.

use std::sync::Arc;
use tracing::{info, warn};

use super::worker::{Completed, PredictionWorker, RequestId};
use super::Pipeline;
use crate::error::{PredictError, PredictResult};
use crate::risk::Assessment;
use crate::trend::TrendBuffer;

/// What the result area currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    #[default]
    Empty,
    Result(Assessment),
    Error(String),
}

/// A completion after it has been applied to the session
#[derive(Debug)]
pub struct Outcome {
    pub id: RequestId,
    pub result: PredictResult<Assessment>,
}

pub struct Session {
    worker: PredictionWorker,
    trend: TrendBuffer,
    view: View,
}

impl Session {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            worker: PredictionWorker::spawn(Arc::new(pipeline)),
            trend: TrendBuffer::new(),
            view: View::Empty,
        }
    }

    /// Queue a Predict action; the result is applied by `wait`/`poll`.
    pub fn submit(&mut self, input: impl Into<String>) -> RequestId {
        self.worker.submit(input)
    }

    /// Block for the oldest in-flight request and apply it.
    pub fn wait(&mut self) -> Option<Outcome> {
        let done = self.worker.recv()?;
        Some(self.apply(done))
    }

    /// Apply the oldest request if it has already finished.
    pub fn poll(&mut self) -> Option<Outcome> {
        let done = self.worker.try_recv()?;
        Some(self.apply(done))
    }

    /// Submit and wait, for callers without an event loop.
    ///
    /// Anything already in flight is applied first so ordering holds.
    pub fn predict(&mut self, input: &str) -> PredictResult<Assessment> {
        while self.wait().is_some() {}
        let id = self.submit(input);
        match self.wait() {
            Some(outcome) if outcome.id == id => outcome.result,
            _ => Err(PredictError::inference("prediction result was lost")),
        }
    }

    fn apply(&mut self, done: Completed) -> Outcome {
        match &done.result {
            Ok(assessment) => {
                info!(
                    "Request {}: probability {:.2} ({})",
                    done.id, assessment.probability, assessment.band
                );
                self.trend.append(assessment.probability);
                self.view = View::Result(*assessment);
            }
            Err(e) => {
                warn!("Request {} failed: {}", done.id, e);
                self.view = View::Error(e.to_string());
            }
        }
        Outcome {
            id: done.id,
            result: done.result,
        }
    }

    pub fn trend(&self) -> &TrendBuffer {
        &self.trend
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn in_flight(&self) -> usize {
        self.worker.pending()
    }
}
