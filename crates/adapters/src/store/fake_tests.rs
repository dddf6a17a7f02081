// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ds_core::{Deposit, DepositStatus};

#[tokio::test]
async fn reads_return_independent_copies() {
    let store = FakeResourceClient::new();
    store.put(&Deposit::new("dep-1", "sub-1", "repo-1"));

    let mut first: Deposit = store.get("dep-1").await.unwrap();
    first.mark_failed();
    let second: Deposit = store.get("dep-1").await.unwrap();

    assert!(second.status.is_none());
}

#[tokio::test]
async fn update_checks_version() {
    let store = FakeResourceClient::new();
    store.put(&Deposit::new("dep-1", "sub-1", "repo-1"));

    let deposit: Deposit = store.get("dep-1").await.unwrap();
    store.external_update::<Deposit>("dep-1", |d| d.mark_failed());

    let err = store.update(&deposit).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        store.snapshot::<Deposit>("dep-1").unwrap().status,
        Some(DepositStatus::Failed)
    );
}

#[tokio::test]
async fn injected_failures_are_targeted() {
    let store = FakeResourceClient::new();
    store.put(&Deposit::new("dep-1", "sub-1", "repo-1"));
    store.put(&Deposit::new("dep-2", "sub-1", "repo-1"));
    store.fail(StoreOp::Get, "dep-1");

    assert!(matches!(
        store.get::<Deposit>("dep-1").await,
        Err(StoreError::Unavailable(_))
    ));
    assert!(store.get::<Deposit>("dep-2").await.is_ok());

    store.clear_failures();
    assert!(store.get::<Deposit>("dep-1").await.is_ok());
}

#[tokio::test]
async fn calls_are_recorded() {
    let store = FakeResourceClient::new();
    store.put(&Deposit::new("dep-1", "sub-1", "repo-1"));

    let deposit: Deposit = store.get("dep-1").await.unwrap();
    store.update(&deposit).await.unwrap();
    let _ = store.select::<Deposit>(&|_| true).await.unwrap();

    let ops: Vec<_> = store.calls().iter().map(|c| c.op).collect();
    assert_eq!(ops, vec![StoreOp::Get, StoreOp::Update, StoreOp::Select]);
    assert_eq!(store.update_calls("dep-1"), 1);
}

#[tokio::test]
async fn kinds_are_separate() {
    let store = FakeResourceClient::new();
    store.put(&Deposit::new("x", "sub-1", "repo-1"));

    assert_eq!(store.count::<Deposit>(), 1);
    assert_eq!(store.count::<ds_core::Submission>(), 0);
    assert!(store
        .get::<ds_core::Submission>("x")
        .await
        .unwrap_err()
        .is_not_found());
}
