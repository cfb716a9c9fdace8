use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiescence delay before a search is dispatched
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct Pending {
    generation: u64,
    text: String,
    timer: Option<JoinHandle<()>>,
}

/// Single-slot debounce state: at most one pending text, replaced on every new input.
///
/// Timers are plain tokio tasks attached with [`Debouncer::arm`]. A timer that
/// fires after being superseded is ignored by [`Debouncer::fire`] even if the
/// abort did not land in time.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: u64,
    pending: Option<Pending>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace whatever is pending with `text` and return the new generation.
    pub fn schedule(&mut self, text: String) -> u64 {
        self.cancel();
        self.generation += 1;
        self.pending = Some(Pending {
            generation: self.generation,
            text,
            timer: None,
        });
        self.generation
    }

    /// Attach the timer task for the current pending generation.
    pub fn arm(&mut self, timer: JoinHandle<()>) {
        match self.pending.as_mut() {
            Some(pending) => pending.timer = Some(timer),
            None => timer.abort(),
        }
    }

    /// Called when a timer elapses. Yields the text only for the latest generation.
    pub fn fire(&mut self, generation: u64) -> Option<String> {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending.take().map(|p| p.text)
            }
            _ => None,
        }
    }

    /// Cancel the pending timer and hand back its text for immediate dispatch.
    pub fn flush(&mut self) -> Option<String> {
        let pending = self.pending.take()?;
        if let Some(timer) = pending.timer {
            timer.abort();
        }
        Some(pending.text)
    }

    pub fn cancel(&mut self) {
        if let Some(Pending { timer: Some(timer), .. }) = self.pending.take() {
            timer.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
