// Polling controller - Keeps the dashboard snapshot fresh
use crate::application::dashboard_source::DashboardSource;
use crate::application::poll_scheduler::{Job, PollScheduler};
use crate::domain::filters::{FilterError, FilterSet};
use crate::domain::polling::{is_valid_interval, PollingState, MAX_INTERVAL_SECS};
use crate::domain::snapshot::DashboardSnapshot;
use chrono::{TimeDelta, Utc};
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Error, PartialEq)]
pub enum PollingError {
    #[error("polling interval must be between 1 and {} seconds", MAX_INTERVAL_SECS)]
    InvalidInterval,
}

/// Everything the dashboard view renders from
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub snapshot: Option<DashboardSnapshot>,
    /// Bumped every time a fetched snapshot is applied
    pub snapshot_version: u64,
    pub error: Option<String>,
    pub loading: bool,
    pub polling: PollingState,
    pub filters: FilterSet,
    issued: u64,
    applied: u64,
    in_flight: usize,
}

impl DashboardState {
    pub fn new(polling: PollingState, filters: FilterSet) -> Self {
        Self {
            polling,
            filters,
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

struct Inner {
    source: Arc<dyn DashboardSource>,
    state: watch::Sender<DashboardState>,
}

impl Inner {
    /// One fetch cycle. Fetches are numbered when issued; a result older than
    /// the last applied one is dropped so late responses never overwrite
    /// newer data.
    async fn fetch(self: Arc<Self>) {
        let mut seq = 0;
        let mut filters = FilterSet::default();
        self.state.send_modify(|s| {
            s.issued += 1;
            s.in_flight += 1;
            s.loading = true;
            seq = s.issued;
            filters = s.filters.clone();
        });

        tracing::debug!(seq, path = %filters.dashboard_path(), "Fetching dashboard");
        let result = self.source.fetch(&filters).await;

        self.state.send_modify(|s| {
            s.in_flight -= 1;
            s.loading = s.in_flight > 0;

            if seq < s.applied {
                tracing::debug!(seq, applied = s.applied, "Discarding stale dashboard response");
                return;
            }
            s.applied = seq;

            match result {
                Ok(snapshot) => {
                    s.snapshot = Some(snapshot);
                    s.snapshot_version += 1;
                    s.error = None;
                    s.polling.last_update = Some(Utc::now());
                    tracing::info!(seq, "Dashboard data received");
                }
                Err(e) => {
                    tracing::error!(seq, error = %e, "Dashboard fetch failed");
                    s.error = Some(e.to_string());
                }
            }
        });
    }

    fn mark_next_update(&self) {
        self.state.send_modify(|s| {
            let delta = i64::try_from(s.polling.interval_secs)
                .ok()
                .and_then(TimeDelta::try_seconds);
            s.polling.next_update = delta.and_then(|d| Utc::now().checked_add_signed(d));
        });
    }
}

/// Owns the dashboard state and the refresh schedule.
///
/// State changes are published on a watch channel; the scheduler is
/// cancelled when the controller is shut down or dropped.
pub struct PollingController {
    inner: Arc<Inner>,
    scheduler: PollScheduler,
}

impl PollingController {
    pub fn new(source: Arc<dyn DashboardSource>, polling: PollingState, filters: FilterSet) -> Self {
        let (state, _) = watch::channel(DashboardState::new(polling, filters));
        let inner = Arc::new(Inner { source, state });

        let fetch_inner = inner.clone();
        let on_fetch: Job = Arc::new(move || {
            let inner = fetch_inner.clone();
            async move {
                inner.mark_next_update();
                inner.fetch().await;
            }
            .boxed()
        });

        // The tick only republishes state so countdowns re-render
        let tick_inner = inner.clone();
        let on_tick: Job = Arc::new(move || {
            let inner = tick_inner.clone();
            async move {
                inner.state.send_modify(|_| {});
            }
            .boxed()
        });

        Self {
            inner,
            scheduler: PollScheduler::new(on_fetch, on_tick),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> DashboardState {
        self.inner.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Initial load: fetch once and start the schedule if real-time mode is on
    pub fn mount(&mut self) -> JoinHandle<()> {
        if self.inner.state.borrow().polling.enabled {
            self.start_schedule();
        }
        tokio::spawn(self.inner.clone().fetch())
    }

    /// Cancel all timers. In-flight fetches still complete.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
    }

    pub fn set_realtime(&mut self, enabled: bool) {
        if enabled {
            self.inner.state.send_modify(|s| s.polling.enabled = true);
            self.start_schedule();
        } else {
            self.scheduler.stop();
            self.inner.state.send_modify(|s| {
                s.polling.enabled = false;
                s.polling.next_update = None;
            });
        }
        tracing::info!(enabled, "Real-time updates toggled");
    }

    pub fn toggle_realtime(&mut self) -> bool {
        let enabled = !self.inner.state.borrow().polling.enabled;
        self.set_realtime(enabled);
        enabled
    }

    /// Change the polling period. A running schedule restarts from now
    /// without an immediate fetch.
    pub fn set_interval(&mut self, secs: u64) -> Result<(), PollingError> {
        if !is_valid_interval(secs) {
            return Err(PollingError::InvalidInterval);
        }
        self.inner.state.send_modify(|s| s.polling.interval_secs = secs);

        if self.scheduler.is_running() {
            self.scheduler.reschedule(Duration::from_secs(secs));
            self.inner.mark_next_update();
        }
        tracing::info!(interval_secs = secs, "Polling interval changed");
        Ok(())
    }

    /// Fetch now. If real-time mode is on, the periodic schedule restarts
    /// from this moment.
    pub fn refresh_now(&mut self) -> JoinHandle<()> {
        if self.scheduler.is_running() {
            self.start_schedule();
        }
        tokio::spawn(self.inner.clone().fetch())
    }

    /// Filters apply from the next fetch on
    pub fn set_filter(&mut self, key: &str, value: &str) -> Result<(), FilterError> {
        let mut filters = self.inner.state.borrow().filters.clone();
        filters.set(key, value)?;
        self.inner.state.send_modify(|s| s.filters = filters);
        Ok(())
    }

    pub fn clear_filter(&mut self, key: &str) -> Result<(), FilterError> {
        let mut filters = self.inner.state.borrow().filters.clone();
        filters.clear(key)?;
        self.inner.state.send_modify(|s| s.filters = filters);
        Ok(())
    }

    fn start_schedule(&mut self) {
        let secs = self.inner.state.borrow().polling.interval_secs;
        self.scheduler.start(Duration::from_secs(secs));
        self.inner.mark_next_update();
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
