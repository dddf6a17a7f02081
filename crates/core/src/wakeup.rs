// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wake-up messages that trigger processing
//!
//! Delivery is at-least-once; handling the same message twice must be safe.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WakeUpError {
    #[error("empty wake-up message")]
    Empty,
    #[error("unknown wake-up target: {0}")]
    UnknownTarget(String),
    #[error("malformed wake-up message: {0}")]
    Malformed(String),
    #[error("invalid wake-up JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Names the record a wake-up is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum WakeUp {
    Submission(String),
    Deposit(String),
}

impl WakeUp {
    /// Parse a wake-up from either JSON (`{"type":"deposit","id":"42"}`)
    /// or the `deposit:42` shorthand.
    pub fn parse(message: &str) -> Result<Self, WakeUpError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(WakeUpError::Empty);
        }

        let wake_up = if message.starts_with('{') {
            serde_json::from_str(message)?
        } else {
            let (target, id) = message
                .split_once(':')
                .ok_or_else(|| WakeUpError::Malformed(message.to_string()))?;
            let id = id.trim().to_string();
            match target.trim() {
                "submission" => WakeUp::Submission(id),
                "deposit" => WakeUp::Deposit(id),
                other => return Err(WakeUpError::UnknownTarget(other.to_string())),
            }
        };

        if wake_up.id().is_empty() {
            return Err(WakeUpError::Malformed(message.to_string()));
        }
        Ok(wake_up)
    }

    pub fn id(&self) -> &str {
        match self {
            WakeUp::Submission(id) | WakeUp::Deposit(id) => id,
        }
    }
}

impl std::fmt::Display for WakeUp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WakeUp::Submission(id) => write!(f, "submission:{}", id),
            WakeUp::Deposit(id) => write!(f, "deposit:{}", id),
        }
    }
}

#[cfg(test)]
#[path = "wakeup_tests.rs"]
mod tests;
