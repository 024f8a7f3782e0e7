use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One wake-up from a running countdown.
///
/// Carries the generation of the task that produced it so a tick that was
/// already queued when its task was cancelled can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

impl Tick {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a running periodic task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickTask {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickTask {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True if `tick` was produced by this task.
    #[must_use]
    pub fn owns(&self, tick: Tick) -> bool {
        tick.generation == self.generation
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!(generation = self.generation, "countdown cancelled");
    }
}

/// Spawns periodic tick tasks and receives their ticks on a single channel.
///
/// Must be used from within a Tokio runtime.
pub struct Ticker {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
    next_generation: u64,
}

impl Ticker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            period,
            tx,
            rx,
            next_generation: 0,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start a new task that ticks once per period, first firing one period from now.
    pub fn spawn(&mut self) -> TickTask {
        self.next_generation += 1;
        let generation = self.next_generation;
        let tx = self.tx.clone();
        let period = self.period;

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });

        tracing::debug!(generation, ?period, "countdown started");
        TickTask { generation, handle }
    }

    /// Wait for the next tick from any task spawned by this ticker.
    ///
    /// Pending forever while no task is running.
    pub async fn recv(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let task = ticker.spawn();
        let started = Instant::now();

        let first = ticker.recv().await.unwrap();
        let second = ticker.recv().await.unwrap();

        assert!(task.owns(first));
        assert!(task.owns(second));
        assert_eq!(started.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_task_stops_ticking() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let task = ticker.spawn();
        drop(task);

        let waited = tokio::time::timeout(Duration::from_secs(5), ticker.recv()).await;
        assert!(waited.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn generations_distinguish_tasks() {
        let mut ticker = Ticker::new(Duration::from_secs(1));
        let old = ticker.spawn();
        drop(old);
        let current = ticker.spawn();

        let tick = ticker.recv().await.unwrap();
        assert!(current.owns(tick));
        assert_eq!(current.generation(), 2);
    }
}
