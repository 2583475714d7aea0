//! Integration tests for Store action broadcasting
//!
//! Observers see every applied action, including actions fed back by effects,
//! in the order the store applied them.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use reducer_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use reducer_macros::Action;
use reducer_runtime::Store;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Action, Debug, Clone, PartialEq)]
enum StepAction {
    /// Start a chain of follow-up steps
    Start,
    /// A step finished
    StepCompleted { step: u32 },
    /// Plain state change with no effects
    Bump,
    /// Record a value in application order
    Mark(u32),
}

#[derive(Debug, Clone, Default)]
struct StepState {
    steps: Vec<u32>,
    bumps: u32,
    marks: Vec<u32>,
}

#[derive(Clone)]
struct StepReducer;

impl Reducer for StepReducer {
    type State = StepState;
    type Action = StepAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            StepAction::Start => {
                state.steps.clear();
                smallvec![Effect::future(async {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    Some(StepAction::StepCompleted { step: 1 })
                })]
            },
            StepAction::StepCompleted { step } => {
                state.steps.push(step);
                if step < 3 {
                    smallvec![Effect::future(async move {
                        Some(StepAction::StepCompleted { step: step + 1 })
                    })]
                } else {
                    SmallVec::new()
                }
            },
            StepAction::Bump => {
                state.bumps += 1;
                SmallVec::new()
            },
            StepAction::Mark(n) => {
                state.marks.push(n);
                SmallVec::new()
            },
        }
    }
}

fn store() -> Store<StepState, StepAction, (), StepReducer> {
    Store::new(StepState::default(), StepReducer, ())
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_subscriber_sees_dispatched_actions_in_order() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store.send(StepAction::Bump).await.unwrap();
    store.send(StepAction::Bump).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), StepAction::Bump);
    assert_eq!(rx.recv().await.unwrap(), StepAction::Bump);
    assert_eq!(rx.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test]
async fn test_subscriber_sees_effect_feedback() {
    let store = store();
    let mut rx = store.subscribe_actions();

    store.send(StepAction::Start).await.unwrap();
    store.wait_for_effects(Duration::from_secs(1)).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(action) = rx.try_recv() {
        seen.push(action);
    }

    assert_eq!(
        seen,
        vec![
            StepAction::Start,
            StepAction::StepCompleted { step: 1 },
            StepAction::StepCompleted { step: 2 },
            StepAction::StepCompleted { step: 3 },
        ]
    );
    assert_eq!(store.state(|s| s.steps.clone()).await, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_late_subscriber_misses_earlier_actions() {
    let store = store();

    store.send(StepAction::Bump).await.unwrap();
    let mut rx = store.subscribe_actions();
    store.send(StepAction::Start).await.unwrap();

    assert_eq!(rx.recv().await.unwrap(), StepAction::Start);
}

#[tokio::test]
async fn test_send_without_subscribers() {
    let store = store();

    store.send(StepAction::Bump).await.unwrap();

    assert_eq!(store.state(|s| s.bumps).await, 1);
}

#[tokio::test]
async fn test_small_capacity_lags_slow_subscriber() {
    let store = Store::with_broadcast_capacity(StepState::default(), StepReducer, (), 2);
    let mut rx = store.subscribe_actions();

    for _ in 0..5 {
        store.send(StepAction::Bump).await.unwrap();
    }

    assert!(matches!(
        rx.try_recv(),
        Err(TryRecvError::Lagged(3))
    ));
    assert_eq!(store.state(|s| s.bumps).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_sends_broadcast_in_apply_order() {
    const SENDERS: u32 = 64;

    for _ in 0..500 {
        let store = Store::with_broadcast_capacity(
            StepState::default(),
            StepReducer,
            (),
            SENDERS as usize * 2,
        );
        let mut rx = store.subscribe_actions();

        let handles: Vec<_> = (0..SENDERS)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move { store.send(StepAction::Mark(n)).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut seen = Vec::new();
        while let Ok(action) = rx.try_recv() {
            match action {
                StepAction::Mark(n) => seen.push(n),
                other => panic!("unexpected action {other:?}"),
            }
        }

        let applied = store.state(|s| s.marks.clone()).await;
        assert_eq!(applied.len(), SENDERS as usize);
        assert_eq!(seen, applied);
    }
}
