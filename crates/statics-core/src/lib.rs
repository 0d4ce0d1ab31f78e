//! Site pipeline services and port definitions for KerbalStatics.
//!
//! This crate defines the "ports" (host and repository traits) that the
//! infrastructure layer implements. It depends only on `statics-types` --
//! never on `statics-infra` or any filesystem crate.

pub mod event;
pub mod host;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;
