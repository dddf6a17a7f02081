// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atom statement parsing
//!
//! SWORD statements publish the deposit state as a feed category:
//!
//! ```xml
//! <category scheme="http://purl.org/net/sword/terms/state"
//!           term="http://dspace.org/state/archived" label="State"/>
//! ```
//!
//! Only `category` start tags and their attributes are inspected, so a
//! lightweight scan is enough.

use super::StatementParser;
use crate::transport::SWORD_STATE_SCHEME;
use ds_core::ParsedState;

/// Parses Atom statements by their SWORD state category
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomStatementParser;

impl StatementParser for AtomStatementParser {
    fn accepts(&self, content: &str) -> bool {
        content.trim_start().starts_with('<')
    }

    fn parse(&self, content: &str) -> Result<ParsedState, String> {
        let mut saw_feed = false;
        for tag in start_tags(content) {
            let name = local_name(tag_name(tag));
            if name == "feed" || name == "entry" {
                saw_feed = true;
            }
            if name != "category" {
                continue;
            }
            let attrs = attributes(tag);
            let scheme = attrs.iter().find(|(k, _)| local_name(k) == "scheme");
            let term = attrs.iter().find(|(k, _)| local_name(k) == "term");
            if let (Some((_, scheme)), Some((_, term))) = (scheme, term) {
                if scheme == SWORD_STATE_SCHEME {
                    return Ok(ParsedState::from_term(term));
                }
            }
        }
        if saw_feed {
            Err("no state category".to_string())
        } else {
            Err("not an atom document".to_string())
        }
    }
}

/// Contents of every start (or empty-element) tag, without the angle brackets
fn start_tags(content: &str) -> impl Iterator<Item = &str> {
    content.split('<').skip(1).filter_map(|chunk| {
        let end = chunk.find('>')?;
        let tag = chunk[..end].trim_end_matches('/');
        match tag.chars().next() {
            Some(c) if c.is_alphabetic() || c == '_' => Some(tag),
            _ => None,
        }
    })
}

fn tag_name(tag: &str) -> &str {
    tag.split(|c: char| c.is_whitespace()).next().unwrap_or(tag)
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// `key="value"` / `key='value'` pairs of a tag, entity-decoded
fn attributes(tag: &str) -> Vec<(&str, String)> {
    let mut attrs = Vec::new();
    let mut rest = &tag[tag_name(tag).len()..];
    while let Some(eq) = rest.find('=') {
        let key = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            break;
        };
        let Some(close) = after[1..].find(quote) else {
            break;
        };
        attrs.push((key, unescape(&after[1..1 + close])));
        rest = &after[close + 2..];
    }
    attrs
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "atom_tests.rs"]
mod tests;
