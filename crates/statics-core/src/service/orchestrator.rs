//! Creation orchestrator: materializes aggregated definitions, one at a time.
//!
//! # Pass flow
//!
//! 1. For each aggregated `KERBALSTATIC` node, in order, resolve its bundle
//!    and expand it into planned sites (direct situations and site groups,
//!    in node order).
//! 2. For each planned site: skip it if the registry already has the name;
//!    otherwise await the builder, apply housekeeping and register it.
//!    Builder failures are logged and the pass moves on.
//! 3. Wait one fixed-timestep tick, then enumerate the registry.
//!
//! Sites are built strictly sequentially. A pass cannot be cancelled once
//! started; a second pass started while one is running is rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;

use statics_types::error::{CreationError, DefinitionError};
use statics_types::event::SiteEvent;
use statics_types::launch_site::{DESERT_AIRFIELD_PREFAB, LaunchSite, SiteSummary};
use statics_types::node::ConfigNode;
use statics_types::site::{
    BUNDLE_FIELD, Facility, LEGACY_BUNDLE_FIELD, SITE_GROUP_NODE, SITUATION_NODE, SiteDefinition,
    SiteGroup,
};

use crate::event::EventBus;
use crate::host::builder::SiteBuilder;
use crate::repository::registry::SiteRegistry;

/// A definition ready to be built, with the bundle its site will use.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSite {
    pub definition: SiteDefinition,
    pub bundle: String,
}

/// A site whose creation failed during a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSite {
    pub site: String,
    pub error: String,
}

/// Outcome of one creation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreationReport {
    /// Sites built and registered, in build order.
    pub created: Vec<String>,
    /// Definitions whose name was already registered.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedSite>,
    /// Definitions that could not be parsed.
    pub rejected: usize,
    /// Registry contents after the pass.
    pub registry: Vec<SiteSummary>,
}

/// Resolve the bundle of a `KERBALSTATIC` node.
pub fn resolve_bundle(node: &ConfigNode, default_bundle: &str) -> String {
    node.get_value(BUNDLE_FIELD)
        .or_else(|| node.get_value(LEGACY_BUNDLE_FIELD))
        .filter(|b| !b.is_empty())
        .unwrap_or(default_bundle)
        .to_string()
}

/// Expand a `KERBALSTATIC` node into planned sites, in node order.
///
/// Each situation parses independently: a bad facility on one entry yields
/// an `Err` for that entry only. A group whose own header is bad yields a
/// single `Err` and none of its children.
pub fn plan_sites(
    node: &ConfigNode,
    default_bundle: &str,
) -> Vec<Result<PlannedSite, DefinitionError>> {
    let tree_bundle = resolve_bundle(node, default_bundle);
    let mut planned = Vec::new();

    for child in node.nodes() {
        match child.name() {
            SITUATION_NODE => planned.push(
                SiteDefinition::from_node(child).map(|definition| plan(definition, &tree_bundle)),
            ),
            SITE_GROUP_NODE => match SiteGroup::header_from_node(child) {
                Ok(group) => {
                    let template = group.template();
                    for situation in child.get_nodes(SITUATION_NODE) {
                        planned.push(
                            SiteDefinition::from_node_over(situation, &template)
                                .map(|definition| plan(definition, &tree_bundle)),
                        );
                    }
                }
                Err(err) => planned.push(Err(err)),
            },
            _ => {}
        }
    }

    planned
}

fn plan(definition: SiteDefinition, tree_bundle: &str) -> PlannedSite {
    let bundle = definition
        .bundle_identifier
        .clone()
        .unwrap_or_else(|| tree_bundle.to_string());
    PlannedSite { definition, bundle }
}

/// Post-creation fixes applied before a site is registered: it needs no
/// discovery, carries its bundle, and runway sites use the desert airfield
/// prefab.
pub fn apply_housekeeping(mut site: LaunchSite, planned: &PlannedSite) -> LaunchSite {
    site.requires_poi_visit = false;
    site.bundle_name = planned.bundle.clone();
    site.facility = planned.definition.facility;
    site.splashed = planned.definition.splashed;
    if planned.definition.facility == Facility::SPH {
        site.prefab_path = Some(DESERT_AIRFIELD_PREFAB.to_string());
    }
    site
}

/// Sequential, skip-on-failure site creation.
pub struct CreationOrchestrator<R: SiteRegistry, B: SiteBuilder> {
    registry: R,
    builder: B,
    events: EventBus,
    default_bundle: String,
    fixed_timestep: Duration,
    running: AtomicBool,
}

/// Clears the running flag when a pass ends, however it ends.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R: SiteRegistry, B: SiteBuilder> CreationOrchestrator<R, B> {
    pub fn new(
        registry: R,
        builder: B,
        events: EventBus,
        default_bundle: impl Into<String>,
        fixed_timestep: Duration,
    ) -> Self {
        Self {
            registry,
            builder,
            events,
            default_bundle: default_bundle.into(),
            fixed_timestep,
            running: AtomicBool::new(false),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Whether a pass is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Run one creation pass over aggregated definition nodes.
    #[tracing::instrument(skip_all, fields(nodes = nodes.len()))]
    pub async fn run(&self, nodes: &[ConfigNode]) -> Result<CreationReport, CreationError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(CreationError::PassInProgress);
        }
        let _guard = PassGuard(&self.running);

        let planned: Vec<_> = nodes
            .iter()
            .flat_map(|node| plan_sites(node, &self.default_bundle))
            .collect();
        tracing::info!(count = planned.len(), "site definitions to process");

        let mut report = CreationReport::default();
        for planned in planned {
            match planned {
                Ok(planned) => self.create_site(planned, &mut report).await,
                Err(err) => {
                    tracing::warn!(error = %err, "rejecting site definition");
                    report.rejected += 1;
                    self.events.publish(SiteEvent::DefinitionRejected {
                        error: err.to_string(),
                    });
                }
            }
        }

        self.settle().await;

        let sites = self.registry.list().await;
        tracing::info!(count = sites.len(), "current list of sites");
        for site in &sites {
            tracing::info!(
                site = %site.name,
                prefab = site.prefab_path.as_deref().unwrap_or("-"),
                spawn_points = ?site.spawn_points,
                "registered site"
            );
        }
        report.registry = sites.iter().map(LaunchSite::summary).collect();

        self.events.publish(SiteEvent::CreationPassCompleted {
            created: report.created.len(),
            skipped: report.skipped.len(),
            failed: report.failed.len(),
        });
        Ok(report)
    }

    async fn create_site(&self, planned: PlannedSite, report: &mut CreationReport) {
        let name = planned.definition.name.clone();

        if self.registry.find(&name).await.is_some() {
            tracing::info!(site = %name, "site already registered, skipping");
            report.skipped.push(name.clone());
            self.events.publish(SiteEvent::SiteSkipped { site: name });
            return;
        }

        let built = match self.builder.build(&planned.definition).await {
            Ok(site) => site,
            Err(err) => {
                self.record_failure(name, err.to_string(), report);
                return;
            }
        };

        let site = apply_housekeeping(built, &planned);
        match self.registry.add(site).await {
            Ok(()) => {
                tracing::info!(site = %name, bundle = %planned.bundle, "created site");
                self.events.publish(SiteEvent::SiteCreated {
                    site: name.clone(),
                    facility: planned.definition.facility,
                    bundle: planned.bundle,
                });
                report.created.push(name);
            }
            Err(err) => self.record_failure(name, err.to_string(), report),
        }
    }

    fn record_failure(&self, site: String, error: String, report: &mut CreationReport) {
        tracing::warn!(site = %site, error = %error, "failed to create site");
        self.events.publish(SiteEvent::SiteBuildFailed {
            site: site.clone(),
            error: error.clone(),
        });
        report.failed.push(FailedSite { site, error });
    }

    /// Let one fixed-timestep tick elapse so built sites finish attaching.
    async fn settle(&self) {
        if self.fixed_timestep.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.fixed_timestep).await;
        }
    }
}
