use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Collapses bursts of search keystrokes into one settled value.
///
/// Each call to [`settle`](Self::settle) waits out the quiet period and yields
/// its input only if no later call started in the meantime.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn settle(&self, input: String) -> Option<String> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(input)
    }
}
