/// Unauthenticated GitHub search quota per window
pub const SEARCHES_PER_WINDOW: u32 = 10;
/// Length of one accounting window in seconds
pub const WINDOW_SECONDS: u32 = 60;

/// Searches issued in the current 60 second window plus the countdown to its reset.
///
/// The window only counts. Whether an over-quota search is blocked or merely
/// flagged is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindow {
    search_count: u32,
    seconds_remaining: u32,
}

impl Default for RateLimitWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimitWindow {
    pub fn new() -> Self {
        Self {
            search_count: 0,
            seconds_remaining: WINDOW_SECONDS,
        }
    }

    /// Advance the countdown by one second. Returns true when the window reset.
    pub fn tick(&mut self) -> bool {
        if self.seconds_remaining == 0 {
            self.search_count = 0;
            self.seconds_remaining = WINDOW_SECONDS;
            true
        } else {
            self.seconds_remaining -= 1;
            false
        }
    }

    /// Count one issued search. The first search of a fresh window restarts the clock.
    pub fn record_search(&mut self) {
        if self.search_count == 0 {
            self.seconds_remaining = WINDOW_SECONDS;
        }
        self.search_count = self.search_count.saturating_add(1);
    }

    pub fn search_count(&self) -> u32 {
        self.search_count
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    // Strictly greater: the 11th search is the first one flagged.
    pub fn is_over_quota(&self) -> bool {
        self.search_count > SEARCHES_PER_WINDOW
    }
}
