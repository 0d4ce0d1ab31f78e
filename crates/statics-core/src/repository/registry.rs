//! Site registry trait definition.

use statics_types::error::RegistryError;
use statics_types::launch_site::LaunchSite;

/// The live collection of materialized sites, keyed by site name.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait SiteRegistry: Send + Sync {
    /// Look up a site by its exact name.
    fn find(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Option<LaunchSite>> + Send;

    /// Register a new site. Fails with `Duplicate` if the name is taken.
    fn add(
        &self,
        site: LaunchSite,
    ) -> impl std::future::Future<Output = Result<(), RegistryError>> + Send;

    /// All registered sites in registration order.
    fn list(&self) -> impl std::future::Future<Output = Vec<LaunchSite>> + Send;
}
