// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote processing states reported by target systems

use crate::deposit::DepositStatus;

/// State parsed out of a target's state document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedState {
    Archived,
    Withdrawn,
    InProgress,
    Unknown(String),
}

impl ParsedState {
    /// Parse a state term.
    ///
    /// Accepts bare words (`archived`) and state URIs
    /// (`http://dspace.org/state/archived`), in which case the last path
    /// segment is used. Case and `-`/`_` separators are ignored.
    pub fn from_term(term: &str) -> Self {
        let trimmed = term.trim().trim_end_matches('/');
        let last = trimmed
            .rsplit(|c: char| c == '/' || c == '#')
            .next()
            .unwrap_or(trimmed);
        let normalized: String = last
            .chars()
            .filter(|c| *c != '-' && *c != '_' && !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "archived" | "accepted" | "complete" | "completed" => ParsedState::Archived,
            "withdrawn" | "rejected" | "deleted" => ParsedState::Withdrawn,
            "inprogress" | "inreview" | "inworkflow" | "submitted" | "pending" => {
                ParsedState::InProgress
            }
            _ => ParsedState::Unknown(term.to_string()),
        }
    }

    /// The terminal deposit status this state maps to, if any
    pub fn to_deposit_status(&self) -> Option<DepositStatus> {
        match self {
            ParsedState::Archived => Some(DepositStatus::Accepted),
            ParsedState::Withdrawn => Some(DepositStatus::Rejected),
            ParsedState::InProgress | ParsedState::Unknown(_) => None,
        }
    }
}

impl std::fmt::Display for ParsedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParsedState::Archived => f.write_str("archived"),
            ParsedState::Withdrawn => f.write_str("withdrawn"),
            ParsedState::InProgress => f.write_str("in-progress"),
            ParsedState::Unknown(term) => write!(f, "unknown({})", term),
        }
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
