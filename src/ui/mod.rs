//! ui
//!
//! Everything the user reads on stdout.
//!
//! # Modules
//!
//! - [`output`] - Result printing modes and JSON indentation
//! - [`help`] - Application and command help

pub mod help;
pub mod output;
