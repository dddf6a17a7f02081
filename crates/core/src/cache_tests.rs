// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn insert_then_get_returns_copy() {
    let cache = LookupCache::new();
    cache.insert("repo-1", "fs-archive".to_string());

    let mut value = cache.get("repo-1").unwrap();
    value.push_str("-changed");

    assert_eq!(cache.get("repo-1").as_deref(), Some("fs-archive"));
}

#[test]
fn clones_share_entries() {
    let cache: LookupCache<u32> = LookupCache::new();
    let other = cache.clone();
    other.insert("a", 1);
    assert_eq!(cache.get("a"), Some(1));
    assert_eq!(cache.len(), 1);
}

#[test]
fn separate_caches_are_isolated() {
    let first: LookupCache<u32> = LookupCache::new();
    let second: LookupCache<u32> = LookupCache::new();
    first.insert("a", 1);
    assert!(second.is_empty());
}

#[test]
fn invalidate_removes_entry() {
    let cache: LookupCache<u32> = LookupCache::new();
    cache.insert("a", 1);
    cache.invalidate("a");
    assert!(cache.get("a").is_none());
}
