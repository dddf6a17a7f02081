// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ds reconcile dirty|submitted [--ids a,b]` - reconciliation runners

use super::exit_code;
use crate::context::Context;
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use ds_engine::{DirtyDepositRunner, SubmittedDepositRunner};
use std::process::ExitCode;

#[derive(Args)]
pub struct ReconcileArgs {
    #[command(subcommand)]
    pub command: ReconcileCommand,
}

#[derive(Subcommand)]
pub enum ReconcileCommand {
    /// Resubmit deposits that were never submitted or whose last attempt failed
    Dirty(RunnerArgs),
    /// Re-resolve the status of submitted deposits
    Submitted(RunnerArgs),
}

#[derive(Args)]
pub struct RunnerArgs {
    /// Only consider these deposit ids (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub ids: Option<Vec<String>>,
}

impl RunnerArgs {
    fn ids(&self) -> Option<Vec<String>> {
        self.ids.as_ref().map(|ids| {
            ids.iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect()
        })
    }
}

pub async fn handle(ctx: &Context, args: ReconcileArgs) -> Result<ExitCode> {
    let services = ctx.services.clone();
    let dispatch = ctx.dispatch.clone();

    let summary = match args.command {
        ReconcileCommand::Dirty(args) => DirtyDepositRunner::new(services, dispatch)
            .run(args.ids().as_deref())
            .await
            .context("selecting dirty deposits")?,
        ReconcileCommand::Submitted(args) => SubmittedDepositRunner::new(services, dispatch)
            .run(args.ids().as_deref())
            .await
            .context("selecting submitted deposits")?,
    };

    if summary.is_empty() {
        tracing::warn!("no candidate deposits found");
    }
    ctx.finish(&summary).await;
    Ok(exit_code(&summary, true))
}
