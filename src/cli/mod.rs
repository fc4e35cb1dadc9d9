//! cli
//!
//! The command-dispatch engine.
//!
//! # Architecture
//!
//! Commands are declared as data ([`command::Command`], [`flag::FlagSpec`])
//! and compiled once into an immutable [`registry::Registry`]. A run then
//! flows through these stages:
//!
//! - [`parse`] binds argv to a command path and a [`bind::BoundContext`]
//! - [`validate`] enforces required flags, option groups and server kinds
//! - [`resolve`] turns `--host` into an HTTP [`crate::http::Client`]
//! - [`dispatch`] invokes the command's [`command::Action`] and reports
//!
//! Nothing in this layer knows about any particular server API.

pub mod bind;
pub mod command;
pub mod common_flags;
pub mod context;
pub mod dispatch;
pub mod flag;
pub mod parse;
pub mod registry;
pub mod resolve;
pub mod token;
pub mod validate;
