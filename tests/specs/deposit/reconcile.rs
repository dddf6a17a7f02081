//! Reconciliation runner specs: `ds reconcile dirty|submitted`

use crate::prelude::*;

#[test]
fn dirty_runner_with_no_candidates_exits_1() {
    let temp = Project::configured();

    temp.ds()
        .args(&["reconcile", "dirty"])
        .fails()
        .stdout_has("candidates=0");
}

#[test]
fn dirty_runner_resubmits_failed_and_unsubmitted() {
    let temp = Project::configured();
    temp.deposit("dep-1", None, None);
    temp.deposit("dep-2", Some("failed"), None);
    temp.deposit("dep-3", Some("accepted"), Some("/nowhere/statement.json"));

    temp.ds()
        .args(&["reconcile", "dirty"])
        .passes()
        .stdout_has("candidates=2 dispatched=2 skipped=0 failed=0");

    assert_eq!(temp.read_deposit("dep-1")["status"], "submitted");
    assert_eq!(temp.read_deposit("dep-2")["status"], "submitted");
    assert_eq!(temp.read_deposit("dep-3")["status"], "accepted");
    // Resubmission keeps the deposit's identity
    assert_eq!(temp.deposits().len(), 3);
}

#[test]
fn dirty_runner_twice_finds_nothing_the_second_time() {
    let temp = Project::configured();
    temp.deposit("dep-1", None, None);
    temp.ds().args(&["reconcile", "dirty"]).passes();

    temp.ds()
        .args(&["reconcile", "dirty"])
        .fails()
        .stdout_has("candidates=0");
}

#[test]
fn dirty_runner_honors_explicit_ids() {
    let temp = Project::configured();
    temp.deposit("dep-1", None, None);
    temp.deposit("dep-2", None, None);

    temp.ds()
        .args(&["--foreground", "reconcile", "dirty", "--ids", "dep-2"])
        .passes()
        .stdout_has("candidates=1 dispatched=1");

    assert!(temp.read_deposit("dep-1")["status"].is_null());
    assert_eq!(temp.read_deposit("dep-2")["status"], "submitted");
}

#[test]
fn deposit_without_packager_is_skipped() {
    let temp = Project::configured();
    temp.repository("repo-1", "unconfigured");
    temp.deposit("dep-1", None, None);

    temp.ds()
        .args(&["reconcile", "dirty"])
        .passes()
        .stdout_has("skipped=1");
    assert!(temp.read_deposit("dep-1")["status"].is_null());
}

#[test]
fn failed_transfer_exits_1() {
    let temp = Project::configured();
    std::fs::remove_file(temp.path().join("files/sub-1.txt")).unwrap();
    temp.deposit("dep-1", None, None);

    temp.ds()
        .args(&["reconcile", "dirty"])
        .fails()
        .stdout_has("failed=1");
    assert_eq!(temp.read_deposit("dep-1")["status"], "failed");
}

#[test]
fn submitted_runner_applies_final_states_only() {
    let temp = Project::configured();
    let archived = temp.statement("remote/dep-1.json", "archived");
    let withdrawn = temp.statement("remote/dep-2.json", "withdrawn");
    let pending = temp.statement("remote/dep-3.json", "in-progress");
    temp.deposit("dep-1", Some("submitted"), Some(&archived));
    temp.deposit("dep-2", Some("submitted"), Some(&withdrawn));
    temp.deposit("dep-3", Some("submitted"), Some(&pending));

    temp.ds()
        .args(&["reconcile", "submitted"])
        .passes()
        .stdout_has("candidates=3 dispatched=3");

    assert_eq!(temp.read_deposit("dep-1")["status"], "accepted");
    assert_eq!(temp.read_deposit("dep-2")["status"], "rejected");
    assert_eq!(temp.read_deposit("dep-3")["status"], "submitted");
}

#[test]
fn submitted_runner_counts_unreadable_statements() {
    let temp = Project::configured();
    temp.deposit("dep-1", Some("submitted"), Some("/nowhere/statement.json"));

    temp.ds()
        .args(&["reconcile", "submitted"])
        .fails()
        .stdout_has("failed=1");
    assert_eq!(temp.read_deposit("dep-1")["status"], "submitted");
}

#[test]
fn submitted_runner_reads_atom_statements() {
    let temp = Project::configured();
    temp.file(
        "remote/dep-1.atom",
        r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <category scheme="http://purl.org/net/sword/terms/state"
            term="http://dspace.org/state/archived"/>
</feed>"#,
    );
    let statement = temp.path().join("remote/dep-1.atom").display().to_string();
    temp.deposit("dep-1", Some("submitted"), Some(&statement));

    temp.ds().args(&["reconcile", "submitted"]).passes();

    assert_eq!(temp.read_deposit("dep-1")["status"], "accepted");
}
