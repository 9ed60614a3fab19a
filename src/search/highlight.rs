// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Highlight templates.

use crate::error::{Error, Result};
use crate::text::Term;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder replaced by the matched text.
pub const PLACEHOLDER: &str = "%s";

/// Pattern wrapped around matched words, e.g. `<i>%s</i>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HighlightTemplate {
    prefix: String,
    suffix: String,
}

impl HighlightTemplate {
    /// Parse a pattern containing exactly one `%s`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let mut parts = pattern.split(PLACEHOLDER);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(suffix), None) => Ok(HighlightTemplate {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
            _ => Err(Error::InvalidHighlightTemplate(pattern.to_string())),
        }
    }

    pub fn wrap(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + text.len() + self.suffix.len());
        self.wrap_into(&mut out, text);
        out
    }

    pub(crate) fn wrap_into(&self, out: &mut String, text: &str) {
        out.push_str(&self.prefix);
        out.push_str(text);
        out.push_str(&self.suffix);
    }

    /// Copy `source`, wrapping the source text of every term `matched` accepts.
    /// `terms` must come from tokenizing `source`.
    pub fn highlight(&self, source: &str, terms: &[Term], matched: impl Fn(&Term) -> bool) -> String {
        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for term in terms.iter().filter(|term| matched(term)) {
            out.push_str(&source[cursor..term.span.start]);
            self.wrap_into(&mut out, &source[term.span.clone()]);
            cursor = term.span.end;
        }
        out.push_str(&source[cursor..]);
        out
    }
}

impl Default for HighlightTemplate {
    fn default() -> Self {
        HighlightTemplate {
            prefix: "<i>".to_string(),
            suffix: "</i>".to_string(),
        }
    }
}

impl fmt::Display for HighlightTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, PLACEHOLDER, self.suffix)
    }
}

impl FromStr for HighlightTemplate {
    type Err = Error;

    fn from_str(pattern: &str) -> Result<Self> {
        HighlightTemplate::parse(pattern)
    }
}

impl TryFrom<String> for HighlightTemplate {
    type Error = Error;

    fn try_from(pattern: String) -> Result<Self> {
        HighlightTemplate::parse(&pattern)
    }
}

impl From<HighlightTemplate> for String {
    fn from(template: HighlightTemplate) -> String {
        template.to_string()
    }
}
