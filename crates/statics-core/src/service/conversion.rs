//! Marker conversion: turn a placed marker into a persisted site definition.
//!
//! A conversion either commits (file written, marker disposed, listeners
//! told) or leaves the world untouched. A pre-commit veto and a failed
//! write both keep the marker in place.

use std::path::PathBuf;
use std::sync::Arc;

use statics_types::config::StaticsConfig;
use statics_types::error::ConversionError;
use statics_types::event::SiteEvent;
use statics_types::node::is_storable_value;
use statics_types::site::{Facility, SiteDefinition};

use crate::event::EventBus;
use crate::host::hooks::{CommitDecision, CommitHooks, CommitListener};
use crate::host::marker::SiteMarker;
use crate::service::fs::FileSystem;
use crate::service::persistence::SiteStore;

/// Result of a conversion that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    /// The site file was written and the marker disposed.
    Committed {
        definition: SiteDefinition,
        path: PathBuf,
    },
    /// A pre-commit listener vetoed; nothing changed.
    Aborted,
}

/// Converts markers into site files under the save's launch-site folder.
pub struct ConversionWorkflow<F: FileSystem> {
    store: SiteStore<F>,
    hooks: CommitHooks,
    events: EventBus,
    config: StaticsConfig,
}

impl<F: FileSystem> ConversionWorkflow<F> {
    pub fn new(store: SiteStore<F>, events: EventBus, config: StaticsConfig) -> Self {
        Self {
            store,
            hooks: CommitHooks::new(),
            events,
            config,
        }
    }

    pub fn register_listener(&mut self, listener: Arc<dyn CommitListener>) {
        self.hooks.register(listener);
    }

    pub fn hooks(&self) -> &CommitHooks {
        &self.hooks
    }

    pub fn store(&self) -> &SiteStore<F> {
        &self.store
    }

    /// Convert `marker` into a site of the given facility.
    ///
    /// Returns `Aborted` when any listener vetoes. The written definition
    /// is not materialized now; the next creation pass picks it up.
    #[tracing::instrument(skip_all, fields(facility = %facility))]
    pub async fn convert(
        &self,
        marker: &dyn SiteMarker,
        facility: Facility,
    ) -> Result<ConversionOutcome, ConversionError> {
        if !self.config.allows(facility) {
            return Err(ConversionError::FacilityDisabled(facility));
        }

        let location = marker.location();
        let rotation = marker.rotation();
        let title = marker.site_title().trim().to_string();
        if title.is_empty() {
            return Err(ConversionError::EmptyTitle);
        }
        if !is_storable_value(&title) {
            return Err(ConversionError::UnstorableTitle(title));
        }
        tracing::info!(site = %title, plaque = %marker.plaque_text(), "converting marker");

        if self.hooks.fire_before(marker, facility) == CommitDecision::Abort {
            tracing::info!(site = %title, "conversion aborted by listener");
            self.events.publish(SiteEvent::ConversionAborted {
                site: title,
                facility,
            });
            return Ok(ConversionOutcome::Aborted);
        }

        let definition = SiteDefinition {
            name: title.clone(),
            object_name: title.clone(),
            facility,
            location,
            body: marker.body(),
            rotation,
            splashed: marker.splashed(),
            show_ramp: true,
            bundle_identifier: None,
        };

        let path = self.store.layout().site_file(&title);
        self.store.save_definition(&definition, &path).await?;
        tracing::info!(site = %title, path = %path.display(), "saved site definition");

        marker.dispose();
        self.events.publish(SiteEvent::SiteConverted {
            site: title.clone(),
            facility,
            path: path.display().to_string(),
            message: self.config.created_message(&title),
            duration_secs: self.config.message_duration_secs,
        });

        self.hooks.fire_after(marker, facility, &definition);
        Ok(ConversionOutcome::Committed { definition, path })
    }
}
