//! Setup error specs
//!
//! Problems that keep the service from starting exit with status 2.

use crate::prelude::*;

#[test]
fn missing_config_exits_2() {
    let temp = Project::empty();

    temp.ds()
        .args(&["reconcile", "dirty"])
        .exits(2)
        .stderr_has("cannot load configuration")
        .stderr_has("--config");
}

#[test]
fn explicit_config_path_is_used() {
    let temp = Project::configured();
    let elsewhere = Project::empty();
    let config = temp.path().join("ds.toml");

    elsewhere
        .ds()
        .args(&["--config", config.to_str().unwrap(), "submission", "sub-1"])
        .passes()
        .stdout_has("dispatched=1");
    // The store root is relative to the config file, not the working dir
    assert_eq!(temp.deposits().len(), 1);
}

#[test]
fn zero_workers_is_rejected() {
    let temp = Project::empty();
    temp.file("ds.toml", "[pool]\nworkers = 0\n");

    temp.ds()
        .args(&["reconcile", "dirty"])
        .exits(2)
        .stderr_has("pool.workers");
}

#[test]
fn unknown_section_is_rejected() {
    let temp = Project::empty();
    temp.file("ds.toml", "[mystery]\nvalue = 1\n");

    temp.ds()
        .args(&["reconcile", "dirty"])
        .exits(2)
        .stderr_has("cannot load configuration");
}

#[test]
fn unknown_transport_is_rejected() {
    let temp = Project::empty();
    temp.file(
        "ds.toml",
        "[packager.p]\nassembler = \"bundle\"\ntransport = \"sword\"\n",
    );

    temp.ds()
        .args(&["reconcile", "dirty"])
        .exits(2)
        .stderr_has("unknown transport 'sword'")
        .stderr_has("Available transports: filesystem");
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    cli().args(&["frobnicate"]).exits(2);
}

#[test]
fn unknown_deposit_fails() {
    let temp = Project::configured();

    temp.ds()
        .args(&["deposit", "ghost"])
        .fails()
        .stderr_has("deposit:ghost");
}
