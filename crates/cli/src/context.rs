// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service wiring shared by every command

use crate::error::CliError;
use ds_adapters::{FilesystemStatusResolver, FsResourceClient, TracedStatusResolver};
use ds_core::Config;
use ds_engine::{
    Components, DepositServices, Dispatch, ErrorHandler, LoggingErrorHandler, PackagerRegistry,
    RunSummary, WorkerPool,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct Context {
    pub services: DepositServices<FsResourceClient>,
    pub dispatch: Dispatch,
    shutdown_timeout: Duration,
}

impl Context {
    /// Load the configuration and build the store, packagers and dispatcher
    pub fn load(config_path: &Path, foreground: bool) -> Result<Self, CliError> {
        let config = Config::load(config_path).map_err(|e| CliError::config(config_path, e))?;
        let store = FsResourceClient::open(config.store.root.clone())
            .map_err(|e| CliError::store(&config.store.root, e))?;
        let registry = PackagerRegistry::from_config(&config.packager, &Components::builtin())
            .map_err(CliError::registry)?;

        let errors: Arc<dyn ErrorHandler> = Arc::new(LoggingErrorHandler);
        let resolver = Arc::new(TracedStatusResolver::new(FilesystemStatusResolver::new()));
        let services = DepositServices::new(store, registry, resolver, Arc::clone(&errors))
            .with_synchronous_resolution(config.resolution.synchronous);

        let dispatch = if foreground {
            Dispatch::Inline(errors)
        } else {
            Dispatch::Pool(WorkerPool::new(&config.pool, errors))
        };

        tracing::debug!(
            config = %config_path.display(),
            store = %config.store.root.display(),
            packagers = ?services.registry.names(),
            foreground,
            "services ready"
        );

        Ok(Self {
            services,
            dispatch,
            shutdown_timeout: config.pool.shutdown_timeout,
        })
    }

    /// Wait for pooled work, then print the summary line
    pub async fn finish(&self, summary: &RunSummary) {
        let abandoned = self.dispatch.finish(self.shutdown_timeout).await;
        if abandoned > 0 {
            tracing::warn!(abandoned, "shutdown timed out with work in flight");
        }
        println!("{}", summary);
    }
}
