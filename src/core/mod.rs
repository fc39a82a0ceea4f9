//! Core module - Shared building blocks for both tools
//!
//! This module provides:
//! - The error taxonomy (ToolError)
//! - Result records (matches, entries, move outcomes)
//! - Text/jsonl rendering
//! - Path validation and extension matching
//! - Logging setup

pub mod error;
pub mod logging;
pub mod model;
pub mod paths;
pub mod render;
