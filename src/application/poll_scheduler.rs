// Owned timer pair driving periodic refreshes
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Period of the countdown tick
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub type Job = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Holds at most one periodic fetch timer and one countdown tick timer.
///
/// Every operation cancels the existing timers before creating new ones, so
/// calling `start` twice never leaves two schedules running.
pub struct PollScheduler {
    on_fetch: Job,
    on_tick: Job,
    fetch_task: Option<JoinHandle<()>>,
    tick_task: Option<JoinHandle<()>>,
    period: Option<Duration>,
}

impl PollScheduler {
    pub fn new(on_fetch: Job, on_tick: Job) -> Self {
        Self {
            on_fetch,
            on_tick,
            fetch_task: None,
            tick_task: None,
            period: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    #[cfg(test)]
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// First fetch fires one full period from now, then every period.
    /// Each fetch is spawned so a hung request never delays the timer.
    pub fn start(&mut self, period: Duration) {
        self.stop();

        let on_fetch = self.on_fetch.clone();
        self.fetch_task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                tokio::spawn(on_fetch());
            }
        }));

        let on_tick = self.on_tick.clone();
        self.tick_task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                on_tick().await;
            }
        }));

        self.period = Some(period);
        tracing::debug!(period_secs = period.as_secs(), "Polling schedule started");
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        if let Some(task) = self.tick_task.take() {
            task.abort();
        }
        if self.period.take().is_some() {
            tracing::debug!("Polling schedule cancelled");
        }
    }

    /// Restart from now with a new period; does nothing while stopped
    pub fn reschedule(&mut self, period: Duration) {
        if self.is_running() {
            self.start(period);
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: Arc<AtomicUsize>) -> Job {
        Arc::new(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    fn scheduler() -> (PollScheduler, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let fetches = Arc::new(AtomicUsize::new(0));
        let ticks = Arc::new(AtomicUsize::new(0));
        let scheduler = PollScheduler::new(counting_job(fetches.clone()), counting_job(ticks.clone()));
        (scheduler, fetches, ticks)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_after_one_period() {
        let (mut scheduler, fetches, ticks) = scheduler();
        scheduler.start(Duration::from_secs(30));

        time::sleep(Duration::from_millis(29_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert!(ticks.load(Ordering::SeqCst) >= 29);

        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_schedule() {
        let (mut scheduler, fetches, _) = scheduler();
        scheduler.start(Duration::from_secs(30));

        time::sleep(Duration::from_secs(20)).await;
        scheduler.reschedule(Duration::from_secs(10));

        // The old schedule would have fired at t=30
        time::sleep(Duration::from_millis(9_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.period(), Some(Duration::from_secs(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_both_timers() {
        let (mut scheduler, fetches, ticks) = scheduler();
        scheduler.start(Duration::from_secs(10));
        time::sleep(Duration::from_millis(10_500)).await;
        scheduler.stop();
        assert!(!scheduler.is_running());

        let fetched = fetches.load(Ordering::SeqCst);
        let ticked = ticks.load(Ordering::SeqCst);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), fetched);
        assert_eq!(ticks.load(Ordering::SeqCst), ticked);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_while_stopped_is_noop() {
        let (mut scheduler, fetches, _) = scheduler();
        scheduler.reschedule(Duration::from_secs(5));
        assert!(!scheduler.is_running());

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_keeps_period() {
        let (mut scheduler, fetches, _) = scheduler();
        scheduler.start(Duration::from_secs(10));
        scheduler.stop();
        scheduler.start(Duration::from_secs(10));
        scheduler.start(Duration::from_secs(10));

        time::sleep(Duration::from_millis(10_500)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }
}
