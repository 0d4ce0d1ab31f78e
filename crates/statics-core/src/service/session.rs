//! Per-save site pipeline session.
//!
//! `StaticsSession` owns everything the pipeline needs for one save game:
//! the aggregator, the creation orchestrator, the conversion workflow and
//! the event bus they publish on. The host builds one when a save loads,
//! forwards scene notifications, and drops it when the save is left.

use std::sync::Arc;
use std::time::Duration;

use statics_types::config::StaticsConfig;
use statics_types::error::{ConversionError, CreationError};
use statics_types::node::ConfigNode;
use statics_types::scene::Scene;
use statics_types::site::Facility;

use crate::event::EventBus;
use crate::host::builder::SiteBuilder;
use crate::host::hooks::CommitListener;
use crate::host::marker::SiteMarker;
use crate::repository::catalog::DefinitionCatalog;
use crate::repository::registry::SiteRegistry;
use crate::service::aggregator::ConfigAggregator;
use crate::service::conversion::{ConversionOutcome, ConversionWorkflow};
use crate::service::fs::FileSystem;
use crate::service::orchestrator::{CreationOrchestrator, CreationReport};
use crate::service::persistence::{SiteStore, StaticsLayout};

pub struct StaticsSession<C, F, R, B>
where
    C: DefinitionCatalog,
    F: FileSystem + Clone,
    R: SiteRegistry,
    B: SiteBuilder,
{
    config: StaticsConfig,
    layout: StaticsLayout,
    aggregator: ConfigAggregator<C, F>,
    orchestrator: CreationOrchestrator<R, B>,
    conversion: ConversionWorkflow<F>,
    events: EventBus,
}

impl<C, F, R, B> StaticsSession<C, F, R, B>
where
    C: DefinitionCatalog,
    F: FileSystem + Clone,
    R: SiteRegistry,
    B: SiteBuilder,
{
    /// Wire up a session for one save and create its folders.
    ///
    /// Folder creation failures are logged; the session still starts and
    /// aggregation retries the launch-site folder on every pass.
    pub async fn start(
        layout: StaticsLayout,
        config: StaticsConfig,
        catalog: C,
        fs: F,
        registry: R,
        builder: B,
    ) -> Self {
        let events = EventBus::default();
        let store = SiteStore::new(fs, layout.clone());

        tracing::info!(
            save = %layout.save_root().display(),
            statics = %layout.statics_dir().display(),
            launch_sites = %layout.launch_sites_dir().display(),
            "starting statics session"
        );
        if let Err(err) = store.ensure_layout().await {
            tracing::warn!(error = %err, "cannot create statics folders");
        }

        let orchestrator = CreationOrchestrator::new(
            registry,
            builder,
            events.clone(),
            config.default_bundle.clone(),
            Duration::from_millis(config.fixed_timestep_ms),
        );
        let conversion = ConversionWorkflow::new(store.clone(), events.clone(), config.clone());
        let aggregator = ConfigAggregator::new(catalog, store);

        Self {
            config,
            layout,
            aggregator,
            orchestrator,
            conversion,
            events,
        }
    }

    pub fn register_listener(&mut self, listener: Arc<dyn CommitListener>) {
        self.conversion.register_listener(listener);
    }

    /// Run a creation pass if `scene` is one where sites are live.
    ///
    /// Returns `None` for scenes that do not load sites.
    pub async fn on_scene_ready(
        &self,
        scene: Scene,
    ) -> Option<Result<CreationReport, CreationError>> {
        if !scene.loads_sites() {
            tracing::debug!(scene = %scene, "scene does not load sites");
            return None;
        }
        tracing::debug!(scene = %scene, "scene ready, creating sites");
        Some(self.run_creation_pass().await)
    }

    pub async fn collect_definitions(&self) -> Vec<ConfigNode> {
        self.aggregator.collect_definitions().await
    }

    /// Aggregate every definition and create the missing sites.
    pub async fn run_creation_pass(&self) -> Result<CreationReport, CreationError> {
        let definitions = self.collect_definitions().await;
        self.orchestrator.run(&definitions).await
    }

    pub async fn convert(
        &self,
        marker: &dyn SiteMarker,
        facility: Facility,
    ) -> Result<ConversionOutcome, ConversionError> {
        self.conversion.convert(marker, facility).await
    }

    /// Facilities the player may currently convert markers into.
    pub fn available_facilities(&self) -> Vec<Facility> {
        self.config.allowed_facilities()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn registry(&self) -> &R {
        self.orchestrator.registry()
    }

    pub fn layout(&self) -> &StaticsLayout {
        &self.layout
    }

    pub fn config(&self) -> &StaticsConfig {
        &self.config
    }
}
