//! Collaborators supplied by the host environment.
//!
//! The site builder materializes definitions, markers are the transient
//! world objects a player converts into sites, and commit listeners are
//! third-party hooks that may veto a conversion.

pub mod builder;
pub mod hooks;
pub mod marker;
