//! Dashboard controller
//!
//! Single owner of the mutable page state: range selection, the chart
//! binding, the display panels and the pump control. Every event handler
//! and the polling scheduler go through it.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{RangeKind, RangeSelection, Tables};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::chart::{ChartBindingAdapter, ChartRenderer};
use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::pump::{PumpAck, PumpCommandDispatcher};
use crate::store::ReadingStore;
use crate::sync::{HistoryOutcome, HistoryQueryEngine, LatestReadingSync, RefreshStatus};
use crate::view::{
    DashboardView, HistoryPanel, HistoryStatus, LatestPanel, PumpControl, PUMP_STATUS_FAILED,
    PUMP_STATUS_SENDING, PUMP_STATUS_SENT,
};

struct DashboardState {
    selection: RangeSelection,
    latest: LatestPanel,
    history: HistoryPanel,
    chart: ChartBindingAdapter,
    pump_status: Option<&'static str>,
}

pub struct DashboardController {
    latest: LatestReadingSync,
    history: HistoryQueryEngine,
    pump: Arc<PumpCommandDispatcher>,
    clock: Arc<dyn Clock>,
    state: Arc<Mutex<DashboardState>>,
}

impl DashboardController {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        tables: &Tables,
        renderer: Arc<dyn ChartRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            latest: LatestReadingSync::new(store.clone(), tables.sensor_logs.clone()),
            history: HistoryQueryEngine::new(store.clone(), tables.sensor_logs.clone()),
            pump: Arc::new(PumpCommandDispatcher::new(
                store,
                tables.pump_control.clone(),
                clock.clone(),
            )),
            clock,
            state: Arc::new(Mutex::new(DashboardState {
                selection: RangeSelection::default(),
                latest: LatestPanel::default(),
                history: HistoryPanel::default(),
                chart: ChartBindingAdapter::new(renderer),
                pump_status: None,
            })),
        }
    }

    /// Initial load in page order: latest reading first, then history
    pub async fn initialize(&self) {
        let latest = self.refresh_latest().await;
        let history = self.refresh_history().await;
        info!(?latest, ?history, "dashboard initialized");
    }

    /// Fetch the newest reading and show it, unless a newer fetch was
    /// issued meanwhile. Failures keep the values already on screen.
    pub async fn refresh_latest(&self) -> RefreshStatus {
        let fetched = self.latest.refresh().await;

        let mut state = self.state.lock().await;
        if !self.latest.is_current(fetched.epoch) {
            debug!(epoch = fetched.epoch.value(), "latest reading superseded");
            return RefreshStatus::Superseded;
        }

        match fetched.result {
            Ok(Some(reading)) => {
                state.latest.show(&reading, self.clock.as_ref());
                RefreshStatus::Applied
            }
            Ok(None) => {
                state.latest.show_no_data();
                RefreshStatus::Applied
            }
            Err(e) => {
                warn!("Failed to fetch latest reading: {}", e);
                state.latest.mark_failed();
                RefreshStatus::Failed
            }
        }
    }

    /// Fetch the history of the current selection and bind it to the chart,
    /// unless a newer fetch was issued meanwhile. Anything but a non-empty
    /// series clears the chart.
    pub async fn refresh_history(&self) -> RefreshStatus {
        let (epoch, selection) = {
            let state = self.state.lock().await;
            (self.history.issue(), state.selection.clone())
        };
        let fetched = self
            .history
            .refresh(epoch, &selection, self.clock.as_ref())
            .await;

        let mut state = self.state.lock().await;
        if !self.history.is_current(fetched.epoch) {
            debug!(epoch = fetched.epoch.value(), "history superseded");
            return RefreshStatus::Superseded;
        }

        let (panel, status) = match fetched.result {
            Ok(HistoryOutcome::Series(series)) => {
                let points = series.len();
                state.chart.update(series);
                (HistoryPanel::new(HistoryStatus::Ready, points), RefreshStatus::Applied)
            }
            Ok(HistoryOutcome::Empty) => {
                state.chart.clear();
                (HistoryPanel::new(HistoryStatus::Empty, 0), RefreshStatus::Applied)
            }
            Ok(HistoryOutcome::Unresolved) => {
                state.chart.clear();
                (HistoryPanel::new(HistoryStatus::Unresolved, 0), RefreshStatus::Applied)
            }
            Err(e) => {
                warn!("Failed to fetch history: {}", e);
                state.chart.clear();
                (HistoryPanel::new(HistoryStatus::Failed, 0), RefreshStatus::Failed)
            }
        };
        state.history = panel;
        status
    }

    /// Switch the window kind and reload history
    pub async fn select_range(&self, kind: RangeKind) -> RefreshStatus {
        self.state.lock().await.selection.set_kind(kind);
        self.refresh_history().await
    }

    /// Remember the picked day. History reloads only when date mode is
    /// active; otherwise the date waits for the switch.
    pub async fn choose_date(&self, date: NaiveDate) -> Option<RefreshStatus> {
        let date_mode = {
            let mut state = self.state.lock().await;
            state.selection.set_explicit_date(date);
            state.selection.kind == RangeKind::Date
        };

        if date_mode {
            Some(self.refresh_history().await)
        } else {
            None
        }
    }

    /// Set kind and, optionally, the day in one step, then reload history
    pub async fn set_range(&self, kind: RangeKind, date: Option<NaiveDate>) -> RefreshStatus {
        {
            let mut state = self.state.lock().await;
            if let Some(date) = date {
                state.selection.set_explicit_date(date);
            }
            state.selection.set_kind(kind);
        }
        self.refresh_history().await
    }

    /// Send the "pump on" command. A press while one is outstanding is
    /// rejected with [`AppError::DispatchInFlight`] and changes nothing.
    /// Once started, the dispatch finishes even if the caller is dropped.
    pub async fn press_pump(&self) -> AppResult<PumpAck> {
        if self.pump.is_in_flight() {
            return Err(AppError::DispatchInFlight);
        }

        let previous = {
            let mut state = self.state.lock().await;
            std::mem::replace(&mut state.pump_status, Some(PUMP_STATUS_SENDING))
        };

        // Detached: a dropped caller must not leave the status at "sending"
        let pump = self.pump.clone();
        let state = self.state.clone();
        let dispatch = tokio::spawn(async move {
            let result = pump.dispatch_on().await;

            let mut state = state.lock().await;
            state.pump_status = match &result {
                Ok(_) => Some(PUMP_STATUS_SENT),
                Err(AppError::DispatchInFlight) => previous,
                Err(e) => {
                    warn!("Failed to send pump command: {}", e);
                    Some(PUMP_STATUS_FAILED)
                }
            };
            result
        });

        dispatch
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?
    }

    /// Copy of everything the page shows
    pub async fn snapshot(&self) -> DashboardView {
        let state = self.state.lock().await;
        DashboardView {
            latest: state.latest.clone(),
            history: state.history.clone(),
            chart: state.chart.frame(),
            range: state.selection.clone(),
            pump: PumpControl::new(self.pump.is_in_flight(), state.pump_status),
        }
    }
}
