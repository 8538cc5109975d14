//! Sliding one-hour rainfall window

use chrono::Duration;
use std::collections::VecDeque;
use wxrec_core::Timestamp;

/// One point of scan-cumulative rainfall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingSample {
    pub ts: Timestamp,
    pub cumulative: f64,
}

/// FIFO of cumulative rain samples covering the trailing hour.
///
/// The counter fed in must only grow during a scan (finalised earlier days
/// plus today's rain so far), otherwise a daily counter reset would show up
/// as negative rain.
#[derive(Debug, Clone)]
pub struct RollingHourWindow {
    span: Duration,
    samples: VecDeque<RollingSample>,
}

impl RollingHourWindow {
    pub fn new() -> Self {
        Self::with_span(Duration::hours(1))
    }

    pub fn with_span(span: Duration) -> Self {
        Self {
            span,
            samples: VecDeque::with_capacity(64),
        }
    }

    pub fn append(&mut self, ts: Timestamp, cumulative: f64) {
        self.samples.push_back(RollingSample { ts, cumulative });
    }

    /// Drop every sample older than `as_of - span`
    pub fn evict(&mut self, as_of: Timestamp) {
        let cutoff = as_of - self.span;
        while self.samples.front().map_or(false, |s| s.ts < cutoff) {
            self.samples.pop_front();
        }
    }

    /// Rain within the window; zero with fewer than two samples
    pub fn current_delta(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 => {
                (last.cumulative - first.cumulative).max(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl Default for RollingHourWindow {
    fn default() -> Self {
        Self::new()
    }
}
