//! Periodic refresh of the latest reading and the history chart
//!
//! Two independent timers. A tick never waits for the previous refresh to
//! finish; overlapping results are sorted out by fetch epochs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::controller::DashboardController;
use crate::sync::RefreshStatus;

pub struct PollingScheduler {
    controller: Arc<DashboardController>,
    timers: Vec<JoinHandle<()>>,
}

impl PollingScheduler {
    pub fn new(controller: Arc<DashboardController>) -> Self {
        Self {
            controller,
            timers: Vec::new(),
        }
    }

    /// Start both timers. The first tick of each fires one period after
    /// start. Restarting replaces the running timers.
    pub fn start(&mut self, latest_interval: Duration, history_interval: Duration) {
        self.stop();

        let latest = self.controller.clone();
        self.timers.push(spawn_timer("latest", latest_interval, move || {
            let controller = latest.clone();
            async move { controller.refresh_latest().await }
        }));

        let history = self.controller.clone();
        self.timers.push(spawn_timer("history", history_interval, move || {
            let controller = history.clone();
            async move { controller.refresh_history().await }
        }));

        info!(
            latest_ms = latest_interval.as_millis() as u64,
            history_ms = history_interval.as_millis() as u64,
            "polling started"
        );
    }

    /// Stop both timers. Refreshes already in flight run to completion.
    pub fn stop(&mut self) {
        if self.timers.is_empty() {
            return;
        }
        for timer in self.timers.drain(..) {
            timer.abort();
        }
        info!("polling stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.timers.is_empty()
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_timer<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = RefreshStatus> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let refresh = tick();
            tokio::spawn(async move {
                let status = refresh.await;
                debug!(refresh = name, ?status, "scheduled refresh finished");
            });
        }
    })
}
