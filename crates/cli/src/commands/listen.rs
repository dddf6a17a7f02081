// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ds listen` - wake-ups from stdin
//!
//! One message per line, JSON or `kind:id` shorthand. Each wake-up is
//! handled to completion before the next line is read.

use super::exit_code;
use crate::context::Context;
use anyhow::Result;
use ds_core::WakeUp;
use ds_engine::{RunSummary, WakeUpHandler};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

pub async fn handle<R: AsyncRead + Unpin>(ctx: &Context, input: R) -> Result<ExitCode> {
    let handler = WakeUpHandler::new(ctx.services.clone(), ctx.dispatch.clone());
    let mut lines = BufReader::new(input).lines();
    let mut total = RunSummary::default();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let wake = match WakeUp::parse(&line) {
            Ok(wake) => wake,
            Err(e) => {
                tracing::warn!(line = %line.trim(), error = %e, "malformed wake-up, skipping");
                continue;
            }
        };
        match handler.handle(&wake).await {
            Ok(summary) => total += summary,
            Err(e) => {
                tracing::warn!(%wake, error = %e, "wake-up failed");
                total.failed += 1;
            }
        }
    }

    tracing::info!(%total, "input closed");
    ctx.finish(&total).await;
    Ok(exit_code(&total, false))
}

#[cfg(test)]
#[path = "listen_tests.rs"]
mod tests;
