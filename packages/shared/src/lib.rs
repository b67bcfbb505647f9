//! Shared utilities for BG Chooser.
//!
//! Logger setup and time helpers used by every BG Chooser binary.

pub mod logger;
pub mod time;
