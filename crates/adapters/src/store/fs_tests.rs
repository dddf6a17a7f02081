// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ds_core::{Deposit, DepositStatus};

fn open_temp() -> (tempfile::TempDir, FsResourceClient) {
    let dir = tempfile::tempdir().unwrap();
    let store = FsResourceClient::open(dir.path().join("store")).unwrap();
    (dir, store)
}

#[tokio::test]
async fn create_then_get() {
    let (_dir, store) = open_temp();
    let deposit = Deposit::new("dep-1", "sub-1", "repo-1");

    store.create(&deposit).await.unwrap();
    let loaded: Deposit = store.get("dep-1").await.unwrap();

    assert_eq!(loaded, deposit);
    assert!(store.root().join("deposit/dep-1.json").exists());
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let (_dir, store) = open_temp();
    let err = store.get::<Deposit>("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn create_twice_fails() {
    let (_dir, store) = open_temp();
    let deposit = Deposit::new("dep-1", "sub-1", "repo-1");
    store.create(&deposit).await.unwrap();

    let err = store.create(&deposit).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists { kind: "deposit", .. }));
}

#[tokio::test]
async fn update_bumps_version() {
    let (_dir, store) = open_temp();
    store
        .create(&Deposit::new("dep-1", "sub-1", "repo-1"))
        .await
        .unwrap();

    let mut deposit: Deposit = store.get("dep-1").await.unwrap();
    deposit.mark_failed();
    store.update(&deposit).await.unwrap();

    let loaded: Deposit = store.get("dep-1").await.unwrap();
    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.status, Some(DepositStatus::Failed));
}

#[tokio::test]
async fn stale_update_conflicts() {
    let (_dir, store) = open_temp();
    store
        .create(&Deposit::new("dep-1", "sub-1", "repo-1"))
        .await
        .unwrap();

    let first: Deposit = store.get("dep-1").await.unwrap();
    let mut second = first.clone();

    store.update(&first).await.unwrap();
    second.mark_failed();
    let err = store.update(&second).await.unwrap_err();

    assert!(err.is_conflict());
    assert!(!err.is_not_found());
    let loaded: Deposit = store.get("dep-1").await.unwrap();
    assert!(loaded.status.is_none());
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let (_dir, store) = open_temp();
    let err = store
        .update(&Deposit::new("dep-1", "sub-1", "repo-1"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn select_filters_and_orders() {
    let (_dir, store) = open_temp();
    for (id, failed) in [("dep-3", true), ("dep-1", true), ("dep-2", false)] {
        let mut deposit = Deposit::new(id, "sub-1", "repo-1");
        if failed {
            deposit.mark_failed();
        }
        store.create(&deposit).await.unwrap();
    }

    let failed = store
        .select::<Deposit>(&|d| d.status == Some(DepositStatus::Failed))
        .await
        .unwrap();

    let ids: Vec<_> = failed.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["dep-1", "dep-3"]);
}

#[tokio::test]
async fn select_empty_kind() {
    let (_dir, store) = open_temp();
    let all = store.select::<Deposit>(&|_| true).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn path_traversal_ids_are_rejected() {
    let (_dir, store) = open_temp();
    for id in ["../escape", "a/b", ".hidden", ""] {
        let err = store.get::<Deposit>(id).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidId(_)), "id {:?}", id);
    }
}

#[tokio::test]
async fn select_with_captured_filter() {
    let (_dir, store) = open_temp();
    store
        .create(&Deposit::new("dep-1", "sub-1", "repo-1"))
        .await
        .unwrap();
    store
        .create(&Deposit::new("dep-2", "sub-2", "repo-1"))
        .await
        .unwrap();

    let wanted = String::from("sub-2");
    let found = store
        .select::<Deposit>(&|d| d.submission == wanted)
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "dep-2");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clients_sharing_a_root_detect_each_others_updates() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("store");
    let first = FsResourceClient::open(&root).unwrap();
    let second = FsResourceClient::open(&root).unwrap();
    first
        .create(&Deposit::new("dep-1", "sub-1", "repo-1"))
        .await
        .unwrap();

    for round in 0..100 {
        let snapshot: Deposit = first.get("dep-1").await.unwrap();
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(2));

        let writers = [first.clone(), second.clone()].map(|client| {
            let snapshot = snapshot.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                barrier.wait();
                rt.block_on(client.update(&snapshot))
            })
        });
        let results: Vec<_> = writers.map(|w| w.join().unwrap()).into_iter().collect();

        let applied = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| r.as_ref().is_err_and(StoreError::is_conflict))
            .count();
        assert_eq!((applied, conflicts), (1, 1), "round {}", round);

        let stored: Deposit = second.get("dep-1").await.unwrap();
        assert_eq!(stored.version, snapshot.version + 1);
    }

    let leftovers: Vec<_> = std::fs::read_dir(root.join("deposit"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
