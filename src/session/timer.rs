//! Rest interval countdown
//!
//! Driven by elapsed wall time from the UI loop rather than its own task,
//! so it is deterministic under test.

use std::time::Duration;

pub const MIN_REST_SECS: u64 = 15;
pub const MAX_REST_SECS: u64 = 300;
pub const REST_STEP_SECS: u64 = 15;
pub const DEFAULT_REST_SECS: u64 = 60;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Outcome of feeding elapsed time to the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Nothing changed or still counting
    Idle,
    /// At least one second passed
    Ticked,
    /// Reached zero while running; reported once
    Expired,
}

/// Color band of the remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

/// Snap a requested rest length onto the allowed 15 s grid within 15..=300 s
pub fn clamp_rest_secs(secs: u64) -> u64 {
    let snapped = ((secs + REST_STEP_SECS / 2) / REST_STEP_SECS) * REST_STEP_SECS;
    snapped.clamp(MIN_REST_SECS, MAX_REST_SECS)
}

#[derive(Debug, Clone)]
pub struct RestTimer {
    default_secs: u64,
    /// Length of the countdown currently shown
    length: u64,
    remaining: u64,
    custom_secs: u64,
    running: bool,
    expired: bool,
    carry: Duration,
}

impl RestTimer {
    pub fn new(default_secs: u64) -> Self {
        let default_secs = clamp_rest_secs(default_secs);
        Self {
            default_secs,
            length: default_secs,
            remaining: default_secs,
            custom_secs: default_secs,
            running: false,
            expired: false,
            carry: Duration::ZERO,
        }
    }

    /// Back to a fresh, stopped countdown of the default length
    pub fn reset(&mut self) {
        *self = Self::new(self.default_secs);
    }

    pub fn default_secs(&self) -> u64 {
        self.default_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining
    }

    pub fn custom_secs(&self) -> u64 {
        self.custom_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Not started yet and untouched
    pub fn is_fresh(&self) -> bool {
        !self.running && !self.expired && self.remaining == self.default_secs
    }

    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Pause or resume
    pub fn toggle(&mut self) {
        if self.running {
            self.running = false;
        } else {
            self.start();
        }
    }

    pub fn increase_custom(&mut self) {
        self.custom_secs = (self.custom_secs + REST_STEP_SECS).min(MAX_REST_SECS);
    }

    pub fn decrease_custom(&mut self) {
        self.custom_secs = self
            .custom_secs
            .saturating_sub(REST_STEP_SECS)
            .max(MIN_REST_SECS);
    }

    pub fn set_custom(&mut self, secs: u64) {
        self.custom_secs = clamp_rest_secs(secs);
    }

    /// Restart the countdown from the chosen custom length
    pub fn apply_custom(&mut self) {
        self.remaining = self.custom_secs;
        self.length = self.custom_secs;
        self.carry = Duration::ZERO;
        self.expired = false;
        self.running = true;
    }

    /// Feed elapsed time. Sub-second remainders carry over between calls.
    pub fn tick(&mut self, elapsed: Duration) -> TimerEvent {
        if !self.running || self.expired {
            return TimerEvent::Idle;
        }
        self.carry += elapsed;
        let mut ticked = false;
        while self.carry >= ONE_SECOND && self.remaining > 0 {
            self.carry -= ONE_SECOND;
            self.remaining -= 1;
            ticked = true;
        }
        if self.remaining == 0 {
            self.running = false;
            self.expired = true;
            self.carry = Duration::ZERO;
            return TimerEvent::Expired;
        }
        if ticked {
            TimerEvent::Ticked
        } else {
            TimerEvent::Idle
        }
    }

    pub fn urgency(&self) -> Urgency {
        match self.remaining {
            0..=5 => Urgency::Critical,
            6..=15 => Urgency::Warning,
            _ => Urgency::Calm,
        }
    }

    /// Remaining fraction of the current countdown length, for gauges
    pub fn ratio(&self) -> f64 {
        (self.remaining as f64 / self.length.max(1) as f64).clamp(0.0, 1.0)
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new(DEFAULT_REST_SECS)
    }
}
