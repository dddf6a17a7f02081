// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ds - Deposit services CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod context;
mod error;
mod logging;

use clap::{Parser, Subcommand};
use commands::{listen, reconcile, wake};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::context::Context;
use crate::error::CliError;

#[derive(Parser)]
#[command(
    name = "ds",
    version,
    about = "Deposit services - transfer submissions to their target repositories"
)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = "ds.toml")]
    config: PathBuf,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Run work inline, one unit at a time, instead of on the worker pool
    #[arg(long, global = true)]
    foreground: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wake up a submission: create its deposits and submit them
    Submission(wake::SubmissionArgs),
    /// Wake up a deposit: submit it when dirty, resolve its status when submitted
    Deposit(wake::DepositArgs),
    /// Recover deposits left behind by earlier runs
    Reconcile(reconcile::ReconcileArgs),
    /// Read wake-up messages from stdin, one per line, until EOF
    Listen,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held for the life of main so buffered log lines get flushed
    let _log_guard = match logging::setup(cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprint!("{}", e);
            return e.exit_code();
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(cli_error) => {
                eprint!("{}", cli_error);
                cli_error.exit_code()
            }
            None => {
                tracing::error!(error = %format!("{:#}", e), "command failed");
                eprintln!("error: {:#}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let ctx = Context::load(&cli.config, cli.foreground)?;

    match cli.command {
        Commands::Submission(args) => wake::submission(&ctx, args).await,
        Commands::Deposit(args) => wake::deposit(&ctx, args).await,
        Commands::Reconcile(args) => reconcile::handle(&ctx, args).await,
        Commands::Listen => listen::handle(&ctx, tokio::io::stdin()).await,
    }
}
