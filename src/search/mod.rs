// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search: from query text to a ranked, highlightable result set.
//!
//! The finder reads postings through `StorageRead`, adds up the weights the
//! indexer stored, rewards phrases, filters and ranks. Nothing here writes.

mod finder;
mod highlight;
pub mod merge;
mod result;

pub use finder::Finder;
pub use highlight::{HighlightTemplate, PLACEHOLDER};
pub use result::{ResultItem, ResultSet};
