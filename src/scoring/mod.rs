// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how search results get their numbers.
//!
//! Field weights are decided at index time and stored in the postings; the
//! finder only adds them up, applies phrase bonuses and sorts.

mod core;
pub mod ranking;

pub use self::core::*;
