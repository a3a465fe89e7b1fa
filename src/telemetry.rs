// src/telemetry.rs
//
// Explicitly constructed metrics context. Created once at process start,
// shared by reference, torn down at shutdown; never a module-level global.
// The buffer is append-only and size-capped, trimmed from the oldest entry,
// so concurrent requests only ever contend on this one lock.

use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone, Debug, Serialize)]
pub struct TelemetryEvent {
    pub request_id: String,
    pub stage: String,
    pub attempt: u8,
    pub score: Option<u8>,
    pub detail: String,
    pub recorded_at: u64,
}

pub struct Telemetry {
    events: Mutex<VecDeque<TelemetryEvent>>,
    capacity: usize,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&self, request_id: &str, stage: &str, attempt: u8, score: Option<u8>, detail: &str) {
        let event = TelemetryEvent {
            request_id: request_id.to_string(),
            stage: stage.to_string(),
            attempt,
            score,
            detail: detail.to_string(),
            recorded_at: current_timestamp(),
        };

        let mut events = self.events.lock().unwrap();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn snapshot(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let telemetry = Telemetry::new();
        telemetry.record("req-1", "requesting", 1, None, "first attempt");
        telemetry.record("req-1", "validating", 1, Some(72), "scored");

        let events = telemetry.snapshot();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].stage, "requesting");
        assert_eq!(events[1].score, Some(72));
    }

    #[test]
    fn test_capacity_trims_oldest() {
        let telemetry = Telemetry::with_capacity(3);
        for i in 0..5 {
            telemetry.record("req", "stage", i, None, &format!("event {}", i));
        }

        let events = telemetry.snapshot();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].detail, "event 2");
        assert_eq!(events[2].detail, "event 4");
    }
}
