//! Shared domain types for the statics site pipeline.
//!
//! This crate contains the Definition Store tree (`ConfigNode`) and its text
//! codec, site definitions and groups, registry records, events, per-save
//! configuration and the error types used across the workspace.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod event;
pub mod launch_site;
pub mod node;
pub mod scene;
pub mod site;
