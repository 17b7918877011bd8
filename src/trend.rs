//! Rolling probability history for the trend chart

use serde::Serialize;
use std::collections::VecDeque;

/// Number of past predictions kept for display
pub const TREND_CAPACITY: usize = 12;

/// Bounded FIFO of past probabilities, oldest first
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendBuffer {
    points: VecDeque<f32>,
}

impl TrendBuffer {
    pub fn new() -> Self {
        Self {
            points: VecDeque::with_capacity(TREND_CAPACITY + 1),
        }
    }

    /// Append `p`, evicting the oldest point once the buffer is full.
    pub fn append(&mut self, p: f32) {
        self.points.push_back(p);
        if self.points.len() > TREND_CAPACITY {
            self.points.pop_front();
        }
    }

    /// Ordered copy of the history, oldest first
    pub fn snapshot(&self) -> Vec<f32> {
        self.points.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().copied()
    }

    pub fn latest(&self) -> Option<f32> {
        self.points.back().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
