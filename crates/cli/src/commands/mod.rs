// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod listen;
pub mod reconcile;
pub mod wake;

use ds_engine::RunSummary;
use std::process::ExitCode;

/// Exit status for a finished run: 1 on any failure, and on an empty
/// candidate set when `require_candidates` is set
fn exit_code(summary: &RunSummary, require_candidates: bool) -> ExitCode {
    if summary.has_failures() || (require_candidates && summary.is_empty()) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
