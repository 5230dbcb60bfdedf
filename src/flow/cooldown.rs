//! Resend rate limiting
//!
//! The OTP step lets the user request a fresh code, but only once per
//! window. The timer starts when a resend actually succeeds, never on
//! failure.

use std::time::{Duration, Instant};

/// Default window between successful resends
pub const RESEND_WINDOW: Duration = Duration::from_secs(60);

/// Tracks when the next OTP resend is permitted
#[derive(Debug)]
pub struct ResendCooldown {
    window: Duration,
    deadline: Option<Instant>,
}

impl ResendCooldown {
    pub fn new() -> Self {
        Self::with_window(RESEND_WINDOW)
    }

    /// Construct with a custom window, used by tests to avoid waiting
    /// out the full minute
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Start (or restart) the window after a successful resend
    pub fn begin(&mut self) {
        self.deadline = Some(Instant::now() + self.window);
    }

    pub fn is_active(&self) -> bool {
        self.deadline
            .map(|d| Instant::now() < d)
            .unwrap_or(false)
    }

    /// Time left before the next resend is allowed; zero when inactive
    pub fn remaining(&self) -> Duration {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for ResendCooldown {
    fn default() -> Self {
        Self::new()
    }
}
