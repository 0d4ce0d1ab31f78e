//! Event bus for site pipeline notifications.
//!
//! Provides an `EventBus` that distributes `SiteEvent` messages to all
//! subscribers via a `tokio::sync::broadcast` channel.

pub mod bus;

pub use bus::EventBus;
