//! Business logic services (use cases).
//!
//! Services orchestrate the host ports, the filesystem and the event bus.
//! They depend on traits (ports) -- never on concrete infrastructure
//! implementations.

pub mod aggregator;
pub mod conversion;
pub mod fs;
pub mod orchestrator;
pub mod persistence;
pub mod session;
