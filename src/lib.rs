//! filekit - two small file utilities
//!
//! - `lgrep`: print the lines of a file that contain a literal pattern
//! - `forg`: list or move the entries of a directory by extension
//!
//! Both binaries are thin: they parse arguments with [`cli`], then hand a
//! validated config to a backend that writes through a [`core::render::Printer`].

pub mod backends;
pub mod cli;
pub mod core;
