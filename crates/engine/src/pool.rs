// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded worker pool
//!
//! At most `workers` tasks run at once and at most `queue_capacity` more
//! wait for a worker. Anything beyond that is rejected immediately: the
//! deposit's state is durable and the next reconciliation pass will pick
//! it up, so the submitter never blocks.

use crate::handler::{DepositFailure, ErrorHandler, FailureKind};
use ds_core::PoolConfig;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{oneshot, Notify, Semaphore};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("worker pool saturated; {0} left for reconciliation")]
    Saturated(String),
    #[error("worker pool is shutting down; {0} left for reconciliation")]
    ShuttingDown(String),
}

/// Eventual output of a submitted task
pub struct TaskHandle<O> {
    rx: oneshot::Receiver<O>,
}

impl<O> TaskHandle<O> {
    pub(crate) fn ready(output: O) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(output);
        Self { rx }
    }

    pub(crate) fn lost() -> Self {
        let (_, rx) = oneshot::channel();
        Self { rx }
    }

    /// Wait for the task. `None` when it panicked.
    pub async fn outcome(self) -> Option<O> {
        self.rx.await.ok()
    }
}

struct PoolInner {
    admission: Arc<Semaphore>,
    workers: Arc<Semaphore>,
    errors: Arc<dyn ErrorHandler>,
    in_flight: AtomicUsize,
    idle: Notify,
    closed: AtomicBool,
}

/// Bounded pool for deposit work
#[derive(Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

impl WorkerPool {
    pub fn new(config: &PoolConfig, errors: Arc<dyn ErrorHandler>) -> Self {
        let workers = config.workers.max(1);
        Self {
            inner: Arc::new(PoolInner {
                admission: Arc::new(Semaphore::new(workers + config.queue_capacity)),
                workers: Arc::new(Semaphore::new(workers)),
                errors,
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Tasks admitted and not yet finished
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    fn reject(&self, context: &str, error: PoolError) -> PoolError {
        self.inner.errors.handle(&DepositFailure::new(
            context,
            FailureKind::Rejected,
            error.to_string(),
        ));
        error
    }

    /// Queue `task` for a worker without waiting.
    ///
    /// `context` names the deposit the task works on; it is what the error
    /// handler sees when the task is rejected or panics.
    pub fn try_submit<F, O>(&self, context: &str, task: F) -> Result<TaskHandle<O>, PoolError>
    where
        F: Future<Output = O> + Send + 'static,
        O: Send + 'static,
    {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(self.reject(context, PoolError::ShuttingDown(context.to_string())));
        }
        let admitted = match Arc::clone(&self.inner.admission).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(context, "worker pool saturated, rejecting task");
                return Err(self.reject(context, PoolError::Saturated(context.to_string())));
            }
        };

        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let context = context.to_string();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let _admitted = admitted;
            // The worker semaphore is never closed
            let worker = Arc::clone(&inner.workers).acquire_owned().await;

            // A nested task isolates panics from the worker loop
            match tokio::spawn(task).await {
                Ok(output) => {
                    let _ = tx.send(output);
                }
                Err(e) if e.is_panic() => {
                    let message = panic_message(e.into_panic());
                    tracing::error!(context = %context, error = %message, "task panicked");
                    inner.errors.handle(&DepositFailure::new(
                        &context,
                        FailureKind::Panicked,
                        message,
                    ));
                }
                Err(e) => tracing::warn!(context = %context, error = %e, "task cancelled"),
            }

            drop(worker);
            if inner.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                inner.idle.notify_waiters();
            }
        });

        Ok(TaskHandle { rx })
    }

    /// Stop admitting tasks and wait up to `timeout` for in-flight ones.
    /// Returns how many were still running when the wait ended.
    pub async fn shutdown(&self, timeout: Duration) -> usize {
        self.inner.closed.store(true, Ordering::SeqCst);
        let drained = tokio::time::timeout(timeout, async {
            loop {
                let notified = self.inner.idle.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if self.in_flight() == 0 {
                    break;
                }
                notified.await;
            }
        })
        .await;

        let remaining = self.in_flight();
        match drained {
            Ok(()) => tracing::info!("worker pool drained"),
            Err(_) => tracing::warn!(remaining, "shutdown timed out, abandoning tasks"),
        }
        remaining
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

/// Where units of work run
#[derive(Clone)]
pub enum Dispatch {
    /// In the caller's task, one at a time (foreground mode)
    Inline(Arc<dyn ErrorHandler>),
    Pool(WorkerPool),
}

impl Dispatch {
    /// Run `work` according to the dispatch mode. Inline work has finished
    /// by the time this returns.
    pub async fn run<F, O>(&self, context: &str, work: F) -> Result<TaskHandle<O>, PoolError>
    where
        F: Future<Output = O> + Send + 'static,
        O: Send + 'static,
    {
        match self {
            Dispatch::Pool(pool) => pool.try_submit(context, work),
            Dispatch::Inline(errors) => match tokio::spawn(work).await {
                Ok(output) => Ok(TaskHandle::ready(output)),
                Err(e) => {
                    let message = if e.is_panic() {
                        panic_message(e.into_panic())
                    } else {
                        e.to_string()
                    };
                    tracing::error!(context, error = %message, "task panicked");
                    errors.handle(&DepositFailure::new(context, FailureKind::Panicked, message));
                    Ok(TaskHandle::lost())
                }
            },
        }
    }

    /// Wait for pooled work to finish, bounded by `timeout`
    pub async fn finish(&self, timeout: Duration) -> usize {
        match self {
            Dispatch::Pool(pool) => pool.shutdown(timeout).await,
            Dispatch::Inline(_) => 0,
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
