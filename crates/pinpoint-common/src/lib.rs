//! Common utilities for pinpoint.
//!
//! This crate provides shared infrastructure used by all pinpoint components:
//! - **Warning System** - colored terminal output for degraded outcomes
//! - **URI helpers** - friendly URI suffixes and `encodeURI`-style escaping

pub mod uri;
pub mod warning;
