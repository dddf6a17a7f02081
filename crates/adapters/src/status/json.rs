// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::StatementParser;
use ds_core::ParsedState;

/// Parses JSON statements: `{"state": "<term>", ...}`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStatementParser;

impl StatementParser for JsonStatementParser {
    fn accepts(&self, content: &str) -> bool {
        content.trim_start().starts_with('{')
    }

    fn parse(&self, content: &str) -> Result<ParsedState, String> {
        let doc: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        doc.get("state")
            .and_then(serde_json::Value::as_str)
            .map(ParsedState::from_term)
            .ok_or_else(|| "no \"state\" field".to_string())
    }
}
