// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Setup errors with context and suggestions.
//!
//! Anything that keeps the service from starting (configuration, store,
//! packagers, log file) is reported through [`CliError`] and exits with
//! status 2. Failures while processing deposits exit with status 1.

use ds_adapters::StoreError;
use ds_core::ConfigError;
use ds_engine::RegistryError;
use std::fmt;
use std::path::Path;
use std::process::ExitCode;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(2)
    }

    /// The configuration file could not be read or is invalid
    pub fn config(path: &Path, error: ConfigError) -> Self {
        let err = CliError::new(format!("cannot load configuration {}", path.display()))
            .with_context(error.to_string());
        let err = match &error {
            ConfigError::Io { .. } => err
                .with_suggestion("Create ds.toml in the working directory")
                .with_suggestion("Or point at another file: ds --config <path> ..."),
            ConfigError::Toml(_) => err.with_suggestion(
                "Check the file against the documented sections: store, pool, resolution, packager",
            ),
            ConfigError::Invalid(_) => err.with_suggestion("Fix the reported setting and retry"),
        };
        err.with_source(error)
    }

    /// The resource store directory could not be opened
    pub fn store(root: &Path, error: StoreError) -> Self {
        CliError::new(format!("cannot open resource store at {}", root.display()))
            .with_context(error.to_string())
            .with_suggestion("Check [store] root in the configuration")
            .with_source(error)
    }

    /// A packager names a component that does not exist
    pub fn registry(error: RegistryError) -> Self {
        CliError::new("cannot build packagers")
            .with_context(error.to_string())
            .with_suggestion("Available assemblers: bundle")
            .with_suggestion("Available transports: filesystem")
            .with_source(error)
    }

    pub fn log_file(path: &Path, reason: impl fmt::Display) -> Self {
        CliError::new(format!("cannot write log file {}", path.display()))
            .with_context(reason.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}
