//! Shared fixtures for dashboard integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use irrigation_dashboard::chart::TracingRenderer;
use irrigation_dashboard::clock::FixedClock;
use irrigation_dashboard::error::{AppError, AppResult};
use irrigation_dashboard::store::{ReadingStore, StoreAck};
use irrigation_dashboard::DashboardController;
use shared::{PumpCommand, ResolvedWindow, SensorReading, Tables};
use tokio::sync::oneshot;

/// "Now" for every test: 15 June 2024, noon, UTC+7
pub fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-06-15T12:00:00+07:00").unwrap()
}

pub fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(now()))
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    now().with_timezone(&Utc) - Duration::days(days)
}

pub fn reading(at: DateTime<Utc>, temperature: f64) -> SensorReading {
    SensorReading::new(at, Some(temperature), Some(40.0), Some(6.5))
}

pub fn unavailable() -> AppError {
    AppError::StoreUnavailable("connection refused".to_string())
}

enum Step<T> {
    Ready(AppResult<T>),
    Gated(oneshot::Receiver<AppResult<T>>),
}

impl<T> Step<T> {
    async fn resolve(self) -> AppResult<T> {
        match self {
            Step::Ready(result) => result,
            Step::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(AppError::StoreUnavailable("gate dropped".to_string()))),
        }
    }
}

/// In-memory store answering from per-operation scripts. An empty script
/// answers with no rows and successful inserts.
#[derive(Default)]
pub struct ScriptedStore {
    latest: Mutex<VecDeque<Step<Option<SensorReading>>>>,
    range: Mutex<VecDeque<Step<Vec<SensorReading>>>>,
    insert: Mutex<VecDeque<Step<StoreAck>>>,
    latest_calls: AtomicUsize,
    range_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    windows: Mutex<Vec<ResolvedWindow>>,
    commands: Mutex<Vec<PumpCommand>>,
}

impl ScriptedStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_latest(&self, result: AppResult<Option<SensorReading>>) {
        self.latest.lock().unwrap().push_back(Step::Ready(result));
    }

    pub fn push_range(&self, result: AppResult<Vec<SensorReading>>) {
        self.range.lock().unwrap().push_back(Step::Ready(result));
    }

    pub fn push_insert(&self, result: AppResult<StoreAck>) {
        self.insert.lock().unwrap().push_back(Step::Ready(result));
    }

    /// Next latest query waits until the returned sender fires
    pub fn gate_latest(&self) -> oneshot::Sender<AppResult<Option<SensorReading>>> {
        let (tx, rx) = oneshot::channel();
        self.latest.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    /// Next range query waits until the returned sender fires
    pub fn gate_range(&self) -> oneshot::Sender<AppResult<Vec<SensorReading>>> {
        let (tx, rx) = oneshot::channel();
        self.range.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    /// Next insert waits until the returned sender fires
    pub fn gate_insert(&self) -> oneshot::Sender<AppResult<StoreAck>> {
        let (tx, rx) = oneshot::channel();
        self.insert.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    pub fn latest_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
    }

    pub fn range_calls(&self) -> usize {
        self.range_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn windows(&self) -> Vec<ResolvedWindow> {
        self.windows.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<PumpCommand> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReadingStore for ScriptedStore {
    async fn query_latest(&self, _table: &str) -> AppResult<Option<SensorReading>> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.latest.lock().unwrap().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Ok(None),
        }
    }

    async fn query_range(
        &self,
        _table: &str,
        window: &ResolvedWindow,
    ) -> AppResult<Vec<SensorReading>> {
        self.range_calls.fetch_add(1, Ordering::SeqCst);
        self.windows.lock().unwrap().push(*window);
        let step = self.range.lock().unwrap().pop_front();
        match step {
            Some(step) => step.resolve().await,
            None => Ok(Vec::new()),
        }
    }

    async fn insert_command(&self, _table: &str, command: &PumpCommand) -> AppResult<StoreAck> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.insert.lock().unwrap().pop_front();
        let result = match step {
            Some(step) => step.resolve().await,
            None => Ok(StoreAck { inserted: 1 }),
        };
        if result.is_ok() {
            self.commands.lock().unwrap().push(command.clone());
        }
        result
    }
}

/// Store whose history answer depends on the window asked for: one row for
/// windows up to a week, two rows for anything longer
pub struct WindowSizedStore;

#[async_trait]
impl ReadingStore for WindowSizedStore {
    async fn query_latest(&self, _table: &str) -> AppResult<Option<SensorReading>> {
        Ok(None)
    }

    async fn query_range(
        &self,
        _table: &str,
        window: &ResolvedWindow,
    ) -> AppResult<Vec<SensorReading>> {
        tokio::task::yield_now().await;
        let mut rows = vec![reading(window.to - Duration::days(1), 24.0)];
        if window.to - window.from > Duration::days(7) {
            rows.insert(0, reading(window.to - Duration::days(20), 21.0));
        }
        Ok(rows)
    }

    async fn insert_command(&self, _table: &str, _command: &PumpCommand) -> AppResult<StoreAck> {
        Ok(StoreAck { inserted: 1 })
    }
}

pub fn controller(store: Arc<dyn ReadingStore>) -> Arc<DashboardController> {
    Arc::new(DashboardController::new(
        store,
        &Tables::default(),
        Arc::new(TracingRenderer),
        clock(),
    ))
}

/// Let spawned tasks run until `done` holds
pub async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
