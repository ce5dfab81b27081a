//! Rolling one-minute request counter

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use tornlink_core::{Clock, SystemClock};

/// Length of one rate window
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Count of outbound requests since `started_at`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    pub started_at: Instant,
    pub count: u32,
}

impl RateWindow {
    /// A window is over once strictly more than [`RATE_WINDOW`] has passed
    fn is_elapsed(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) > RATE_WINDOW
    }
}

/// Rolling per-minute counter of outbound upstream requests
///
/// Purely observational: nothing in the client throttles on it, the upstream
/// service enforces its own limit. A stale window is reset on read as well as
/// on write, so an idle client reports zero.
pub struct RateTracker {
    window: Mutex<Option<RateWindow>>,
    clock: Arc<dyn Clock>,
}

impl RateTracker {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            window: Mutex::new(None),
            clock,
        }
    }

    /// Count one outbound request and return the new window count
    pub fn record_request(&self) -> u32 {
        let now = self.clock.now();
        let mut window = self.window.lock();
        match window.as_mut() {
            Some(current) if !current.is_elapsed(now) => {
                current.count = current.count.saturating_add(1);
                current.count
            }
            _ => {
                *window = Some(RateWindow {
                    started_at: now,
                    count: 1,
                });
                1
            }
        }
    }

    /// Requests counted in the current window, 0 if it has elapsed
    pub fn current_count(&self) -> u32 {
        let now = self.clock.now();
        let mut window = self.window.lock();
        match *window {
            Some(current) if !current.is_elapsed(now) => current.count,
            Some(_) => {
                *window = None;
                0
            }
            None => 0,
        }
    }

    /// Copy of the current window, if one is open
    pub fn window(&self) -> Option<RateWindow> {
        let now = self.clock.now();
        self.window.lock().filter(|w| !w.is_elapsed(now))
    }
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
