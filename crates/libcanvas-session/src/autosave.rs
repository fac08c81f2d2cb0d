//! Debounced autosave timer
//!
//! An explicit cancelable deferred task. Every mutation re-arms a fixed
//! delay; a save tick is emitted only after a full quiet period, so rapid
//! edits coalesce into a single save timed from the last one.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Marker emitted when a quiet period elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTick;

/// Owner of the pending-save timer handle
pub struct Autosaver {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tick_tx: mpsc::UnboundedSender<SaveTick>,
}

impl Autosaver {
    /// Create an autosaver and the receiver its ticks arrive on
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<SaveTick>) {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                pending: None,
                tick_tx,
            },
            tick_rx,
        )
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)arm the timer: cancel any pending tick and schedule a new one a
    /// full delay from now.
    ///
    /// The deadline is fixed here, at mutation time, not when the timer task
    /// first runs.
    pub fn touch(&mut self) {
        self.cancel();
        let tx = self.tick_tx.clone();
        let deadline = tokio::time::Instant::now() + self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(SaveTick);
        }));
    }

    /// Tear down a pending tick without emitting it
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Emit a pending tick immediately (session teardown). Returns whether
    /// a tick was still outstanding.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                let _ = self.tick_tx.send(SaveTick);
                true
            }
            _ => false,
        }
    }

    /// Whether a tick is scheduled and has not fired yet
    pub fn is_armed(&self) -> bool {
        matches!(&self.pending, Some(handle) if !handle.is_finished())
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    const DELAY: Duration = Duration::from_millis(2000);

    /// Let already-due timer tasks run
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_touch_fires_once_after_delay() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);
        autosaver.touch();

        tokio::time::advance(DELAY - Duration::from_millis(1)).await;
        settle().await;
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(ticks.try_recv().unwrap(), SaveTick);
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_touches_coalesce_into_one_tick() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);

        // Five mutations, each 500ms apart - well inside the quiet period
        for _ in 0..5 {
            autosaver.touch();
            tokio::time::advance(Duration::from_millis(500)).await;
            settle().await;
        }
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));

        // The tick is timed from the LAST touch: 500ms already elapsed
        tokio::time::advance(DELAY - Duration::from_millis(500) - Duration::from_millis(1)).await;
        settle().await;
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));

        tokio::time::advance(Duration::from_millis(2)).await;
        settle().await;
        assert_eq!(ticks.try_recv().unwrap(), SaveTick);
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_tick() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);
        autosaver.touch();
        assert!(autosaver.is_armed());

        autosaver.cancel();
        assert!(!autosaver.is_armed());

        tokio::time::advance(DELAY * 2).await;
        settle().await;
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_emits_pending_tick_immediately() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);
        autosaver.touch();

        assert!(autosaver.flush());
        settle().await;
        assert_eq!(ticks.try_recv().unwrap(), SaveTick);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_without_pending_is_noop() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);
        assert!(!autosaver.flush());
        settle().await;
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_after_fired_tick_does_not_double_emit() {
        let (mut autosaver, mut ticks) = Autosaver::new(DELAY);
        autosaver.touch();

        tokio::time::advance(DELAY + Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(ticks.try_recv().unwrap(), SaveTick);

        assert!(!autosaver.flush());
        settle().await;
        assert!(matches!(ticks.try_recv(), Err(TryRecvError::Empty)));
    }
}
