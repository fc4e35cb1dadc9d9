//! core
//!
//! Types shared by every layer.
//!
//! # Modules
//!
//! - [`errors`] - The uniform error value and its kinds
//! - [`config`] - Server profile store schema and loading

pub mod config;
pub mod errors;
