//! Backends module - The work each tool performs
//!
//! Provides:
//! - search: literal line search over one file
//! - organize: list/move directory entries by extension

pub mod organize;
pub mod search;
