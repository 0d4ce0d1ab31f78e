//! Infrastructure layer for the statics site pipeline.
//!
//! Contains implementations of the port traits defined in `statics-core`:
//! the tokio filesystem adapter, the `.cfg` catalog loader, an in-memory
//! site registry, and the per-save config loader.

pub mod catalog;
pub mod config;
pub mod filesystem;
pub mod registry;
