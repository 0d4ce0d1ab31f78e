//! Observability setup for the statics site pipeline.

pub mod tracing_setup;
