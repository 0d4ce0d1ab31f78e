//! Site builder trait definition.

use statics_types::error::BuildError;
use statics_types::launch_site::LaunchSite;
use statics_types::site::SiteDefinition;

/// Materializes a definition into a live site.
///
/// Building may take several host frames (models, terrain attachment,
/// network nodes); the returned future resolves once the site exists. The
/// returned record is not yet registered: the caller applies housekeeping
/// and registers it.
pub trait SiteBuilder: Send + Sync {
    fn build(
        &self,
        definition: &SiteDefinition,
    ) -> impl std::future::Future<Output = Result<LaunchSite, BuildError>> + Send;
}
