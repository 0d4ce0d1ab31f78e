//! Pre- and post-commit hooks around marker conversion.
//!
//! Listeners are notified synchronously. The pre-commit call returns a
//! typed `CommitDecision`; a single `Abort` from any listener vetoes the
//! conversion. There is no shared abort flag, so concurrent conversions
//! cannot consume each other's vetoes.

use std::fmt;
use std::sync::Arc;

use statics_types::site::{Facility, SiteDefinition};

use super::marker::SiteMarker;

/// A listener's answer to a pending conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitDecision {
    Proceed,
    Abort,
}

/// Third-party hook into marker conversion.
pub trait CommitListener: Send + Sync {
    /// Called before anything is written. Return `Abort` to veto.
    fn before_commit(&self, marker: &dyn SiteMarker, facility: Facility) -> CommitDecision;

    /// Called after the site file is written and the marker disposed.
    fn after_commit(
        &self,
        _marker: &dyn SiteMarker,
        _facility: Facility,
        _definition: &SiteDefinition,
    ) {
    }
}

/// Ordered set of registered commit listeners.
#[derive(Clone, Default)]
pub struct CommitHooks {
    listeners: Vec<Arc<dyn CommitListener>>,
}

impl CommitHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Arc<dyn CommitListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Notify every listener; `Abort` if any of them aborted.
    pub fn fire_before(&self, marker: &dyn SiteMarker, facility: Facility) -> CommitDecision {
        let mut decision = CommitDecision::Proceed;
        for listener in &self.listeners {
            if listener.before_commit(marker, facility) == CommitDecision::Abort {
                decision = CommitDecision::Abort;
            }
        }
        decision
    }

    pub fn fire_after(
        &self,
        marker: &dyn SiteMarker,
        facility: Facility,
        definition: &SiteDefinition,
    ) {
        for listener in &self.listeners {
            listener.after_commit(marker, facility, definition);
        }
    }
}

impl fmt::Debug for CommitHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitHooks")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
