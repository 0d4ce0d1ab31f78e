//! Read/write ports onto host-owned state.
//!
//! The live site registry and the built-in definition catalog belong to the
//! host. Implementations live in statics-infra or in the embedding host.

pub mod catalog;
pub mod registry;
