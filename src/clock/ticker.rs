//! Repeating one-second tick source.
//!
//! The controller acquires at most one interval at a time through a
//! [`TickScheduler`]. Dropping the returned handle cancels the interval.
//! Every interval is tagged with a generation number that travels with its
//! ticks, so ticks still queued from a cancelled interval can be told apart
//! from live ones.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::debug;

use super::runtime::ClockInput;

/// Period between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Acquires repeating tick intervals.
pub trait TickScheduler {
    /// Cancels the interval when dropped.
    type Handle;

    /// Starts a new interval whose ticks carry `generation`.
    fn schedule(&mut self, generation: u64) -> Self::Handle;
}

// ============================================================================
// TokioScheduler
// ============================================================================

/// Scheduler backed by a spawned tokio task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    input_tx: mpsc::UnboundedSender<ClockInput>,
    period: Duration,
}

impl TokioScheduler {
    /// Creates a scheduler that delivers ticks to `input_tx`.
    pub fn new(input_tx: mpsc::UnboundedSender<ClockInput>) -> Self {
        Self {
            input_tx,
            period: TICK_PERIOD,
        }
    }
}

impl TickScheduler for TokioScheduler {
    type Handle = IntervalHandle;

    fn schedule(&mut self, generation: u64) -> IntervalHandle {
        let tx = self.input_tx.clone();
        let period = self.period;

        let task = tokio::spawn(async move {
            // First tick one full period from now, not immediately.
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if tx.send(ClockInput::Tick { generation }).is_err() {
                    break;
                }
            }
        });

        debug!(generation, "Interval acquired");
        IntervalHandle { generation, task }
    }
}

/// A live tokio interval. Aborts its task on drop.
#[derive(Debug)]
pub struct IntervalHandle {
    generation: u64,
    task: JoinHandle<()>,
}

impl IntervalHandle {
    /// Generation carried by this interval's ticks.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!(generation = self.generation, "Interval released");
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that never ticks on its own. Tests drive ticks by hand and use
/// the counters to check the one-live-interval invariant.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Arc<AtomicUsize>,
    acquired: Arc<AtomicUsize>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles currently alive.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Number of handles ever handed out.
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }
}

impl TickScheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&mut self, _generation: u64) -> ManualHandle {
        self.live.fetch_add(1, Ordering::SeqCst);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        ManualHandle {
            live: Arc::clone(&self.live),
        }
    }
}

/// Handle returned by [`ManualScheduler`].
#[derive(Debug)]
pub struct ManualHandle {
    live: Arc<AtomicUsize>,
}

impl Drop for ManualHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod manual_scheduler_tests {
        use super::*;

        #[test]
        fn test_counts_live_handles() {
            let mut scheduler = ManualScheduler::new();
            let observer = scheduler.clone();

            let first = scheduler.schedule(1);
            assert_eq!(observer.live_handles(), 1);

            let second = scheduler.schedule(2);
            assert_eq!(observer.live_handles(), 2);
            assert_eq!(observer.acquired(), 2);

            drop(first);
            drop(second);
            assert_eq!(observer.live_handles(), 0);
            assert_eq!(observer.acquired(), 2);
        }
    }

    mod tokio_scheduler_tests {
        use super::*;
        use tokio::time::timeout;

        #[tokio::test]
        async fn test_first_tick_after_one_period() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioScheduler::new(tx);

            let handle = scheduler.schedule(7);
            assert_eq!(handle.generation(), 7);

            // Nothing arrives immediately.
            tokio::time::sleep(Duration::from_millis(300)).await;
            assert!(rx.try_recv().is_err());

            let input = timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
            assert_eq!(input, Some(ClockInput::Tick { generation: 7 }));
        }

        #[tokio::test]
        async fn test_drop_stops_ticks() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioScheduler::new(tx);

            let handle = scheduler.schedule(1);
            drop(handle);

            tokio::time::sleep(Duration::from_millis(1500)).await;
            assert!(
                rx.try_recv().is_err(),
                "A released interval must not tick"
            );
        }

        #[tokio::test]
        async fn test_tick_rate() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut scheduler = TokioScheduler::new(tx);

            let handle = scheduler.schedule(3);
            tokio::time::sleep(Duration::from_millis(3100)).await;
            drop(handle);

            let mut tick_count = 0;
            while let Ok(input) = rx.try_recv() {
                assert_eq!(input, ClockInput::Tick { generation: 3 });
                tick_count += 1;
            }

            assert!(
                (2..=4).contains(&tick_count),
                "Expected ~3 ticks, got {}",
                tick_count
            );
        }
    }
}
