use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Repeating timer backing automatic playback
///
/// The first tick fires one `period` after arming, then every `period`
/// after that. `on_tick` returning `false` ends the timer. Dropping the
/// handle aborts the task, so a disarmed timer can never tick again once
/// its current tick (if any) has finished.
pub struct TickTimer {
    id: u64,
    period: Duration,
    task: JoinHandle<()>,
}

impl TickTimer {
    /// Arm a new timer on `runtime`
    pub fn spawn<F>(runtime: &Handle, id: u64, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let start = Instant::now() + period;
        let task = runtime.spawn(async move {
            let mut interval = time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });

        Self { id, period, task }
    }

    /// Identifier the owner uses to recognise ticks from this timer
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
