//! Pump command integration tests
//!
//! - A press while a command is outstanding is rejected and sends nothing
//! - The control is disabled while sending and re-enabled afterwards
//! - Failures are reported and the next press is allowed

mod common;

use common::*;
use irrigation_dashboard::error::AppError;
use irrigation_dashboard::store::StoreAck;
use irrigation_dashboard::view::{
    PumpControl, PUMP_LABEL_IDLE, PUMP_LABEL_SENDING, PUMP_STATUS_FAILED, PUMP_STATUS_SENDING,
    PUMP_STATUS_SENT,
};
use irrigation_dashboard::DashboardController;
use shared::PumpAction;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn test_press_sends_one_on_command() {
    let store = ScriptedStore::new();
    let controller = controller(store.clone());

    let sent = assert_ok!(controller.press_pump().await);

    assert_eq!(sent.command.action, PumpAction::On);
    assert_eq!(sent.command.requested_at, days_ago(0));
    assert_eq!(store.commands(), vec![sent.command]);

    let pump = controller.snapshot().await.pump;
    assert!(pump.enabled);
    assert_eq!(pump.label, PUMP_LABEL_IDLE);
    assert_eq!(pump.status, Some(PUMP_STATUS_SENT));
}

#[tokio::test]
async fn test_second_press_while_in_flight_is_rejected() {
    let store = ScriptedStore::new();
    let gate = store.gate_insert();
    let controller = controller(store.clone());

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.press_pump().await }
    });
    settle(|| store.insert_calls() == 1).await;

    let pump = controller.snapshot().await.pump;
    assert!(!pump.enabled);
    assert_eq!(pump.label, PUMP_LABEL_SENDING);
    assert_eq!(pump.status, Some(PUMP_STATUS_SENDING));

    let second = controller.press_pump().await;
    assert!(matches!(second, Err(AppError::DispatchInFlight)));
    assert_eq!(store.insert_calls(), 1);
    // Rejected press leaves the sending status alone
    assert_eq!(
        controller.snapshot().await.pump.status,
        Some(PUMP_STATUS_SENDING)
    );

    gate.send(Ok(StoreAck { inserted: 1 })).unwrap();
    assert_ok!(first.await.unwrap());

    assert_eq!(store.commands().len(), 1);
    let pump = controller.snapshot().await.pump;
    assert!(pump.enabled);
    assert_eq!(pump.status, Some(PUMP_STATUS_SENT));
}

#[tokio::test]
async fn test_failed_dispatch_reenables_control() {
    let store = ScriptedStore::new();
    store.push_insert(Err(unavailable()));
    let controller = controller(store.clone());

    let result = controller.press_pump().await;
    assert!(matches!(result, Err(AppError::StoreUnavailable(_))));

    let pump = controller.snapshot().await.pump;
    assert!(pump.enabled);
    assert_eq!(pump.label, PUMP_LABEL_IDLE);
    assert_eq!(pump.status, Some(PUMP_STATUS_FAILED));
    assert!(store.commands().is_empty());

    // No automatic retry; the operator presses again
    assert_eq!(store.insert_calls(), 1);
    assert_ok!(controller.press_pump().await);
    assert_eq!(store.insert_calls(), 2);
    assert_eq!(store.commands().len(), 1);
}

/// Wait until the control is usable again and no longer shows "sending"
async fn settled_pump(controller: &DashboardController) -> PumpControl {
    for _ in 0..1000 {
        let pump = controller.snapshot().await.pump;
        if pump.enabled && pump.status != Some(PUMP_STATUS_SENDING) {
            return pump;
        }
        tokio::task::yield_now().await;
    }
    panic!("pump control never settled");
}

#[tokio::test]
async fn test_abandoned_press_still_completes() {
    let store = ScriptedStore::new();
    let gate = store.gate_insert();
    let controller = controller(store.clone());

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.press_pump().await }
    });
    settle(|| store.insert_calls() == 1).await;

    // Caller goes away mid-press; the insert is still outstanding
    pending.abort();
    let _ = pending.await;
    let pump = controller.snapshot().await.pump;
    assert!(!pump.enabled);
    assert_eq!(pump.status, Some(PUMP_STATUS_SENDING));

    gate.send(Ok(StoreAck { inserted: 1 })).unwrap();

    let pump = settled_pump(&controller).await;
    assert_eq!(pump.label, PUMP_LABEL_IDLE);
    assert_eq!(pump.status, Some(PUMP_STATUS_SENT));
    assert_eq!(store.commands().len(), 1);
}

#[tokio::test]
async fn test_abandoned_press_without_reply_reports_failure() {
    let store = ScriptedStore::new();
    let gate = store.gate_insert();
    let controller = controller(store.clone());

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.press_pump().await }
    });
    settle(|| store.insert_calls() == 1).await;

    pending.abort();
    let _ = pending.await;
    drop(gate);

    let pump = settled_pump(&controller).await;
    assert_ne!(pump.status, Some(PUMP_STATUS_SENDING));
    assert_eq!(pump.status, Some(PUMP_STATUS_FAILED));

    store.push_insert(Err(unavailable()));
    assert_err!(controller.press_pump().await);
    assert_eq!(store.insert_calls(), 2);
}
