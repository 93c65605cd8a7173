use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

/// One-shot timer that is re-armed by every [`DebounceTimer::call_once`].
///
/// When the delay passes without another call, `event(generation)` is sent on
/// the channel; the owner confirms it with [`DebounceTimer::take_fired`] so a
/// message from an older arming is ignored. Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct DebounceTimer<E> {
    delay: Duration,
    tx: UnboundedSender<E>,
    event: fn(u64) -> E,
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl<E: Send + 'static> DebounceTimer<E> {
    pub fn new(delay: Duration, tx: UnboundedSender<E>, event: fn(u64) -> E) -> Self {
        Self {
            delay,
            tx,
            event,
            generation: 0,
            pending: None,
        }
    }

    pub fn call_once(&mut self) {
        self.cancel();
        self.generation = self.generation.wrapping_add(1);

        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        let event = self.event;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event(generation));
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// `true` once for the latest arming; stale or cancelled firings return `false`.
    pub fn take_fired(&mut self, generation: u64) -> bool {
        if self.pending.is_some() && generation == self.generation {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

impl<E> Drop for DebounceTimer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Fired(u64);

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_after_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DebounceTimer::new(Duration::from_millis(1000), tx, Fired);

        for _ in 0..5 {
            timer.call_once();
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert!(rx.try_recv().is_err());
        }

        let Fired(generation) = rx.recv().await.unwrap();
        assert!(timer.take_fired(generation));
        assert!(!timer.is_pending());
        assert!(!timer.take_fired(generation));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = DebounceTimer::new(Duration::from_millis(50), tx, Fired);
        timer.call_once();
        timer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
        assert!(!timer.take_fired(1));
    }
}
