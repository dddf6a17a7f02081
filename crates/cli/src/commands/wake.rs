// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ds submission <id>` and `ds deposit <id>` - single wake-ups

use super::exit_code;
use crate::context::Context;
use anyhow::{Context as _, Result};
use clap::Args;
use ds_core::WakeUp;
use ds_engine::WakeUpHandler;
use std::process::ExitCode;

#[derive(Args)]
pub struct SubmissionArgs {
    /// Submission id
    pub id: String,
}

#[derive(Args)]
pub struct DepositArgs {
    /// Deposit id
    pub id: String,
}

pub async fn submission(ctx: &Context, args: SubmissionArgs) -> Result<ExitCode> {
    wake(ctx, WakeUp::Submission(args.id)).await
}

pub async fn deposit(ctx: &Context, args: DepositArgs) -> Result<ExitCode> {
    wake(ctx, WakeUp::Deposit(args.id)).await
}

async fn wake(ctx: &Context, wake: WakeUp) -> Result<ExitCode> {
    let summary = WakeUpHandler::new(ctx.services.clone(), ctx.dispatch.clone())
        .handle(&wake)
        .await
        .with_context(|| format!("wake-up {}", wake))?;
    ctx.finish(&summary).await;
    Ok(exit_code(&summary, false))
}
