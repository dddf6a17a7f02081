//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("submission")
        .stdout_has("deposit")
        .stdout_has("reconcile")
        .stdout_has("listen");
}

#[test]
fn help_lists_global_flags() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("--config")
        .stdout_has("--log-file")
        .stdout_has("--foreground");
}

#[test]
fn reconcile_help_lists_runners() {
    cli()
        .args(&["reconcile", "--help"])
        .passes()
        .stdout_has("dirty")
        .stdout_has("submitted");
}

#[test]
fn runner_help_documents_ids() {
    cli()
        .args(&["reconcile", "dirty", "--help"])
        .passes()
        .stdout_has("--ids");
}
