//! Repository permissions.

use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::info;

pub struct Authz;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for Authz {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        services.register_resolver("authz");
        services.register_handler("/.api/authz/sync", "permissions sync webhook");
        info!(
            providers = services.auth_providers.len(),
            dsn = deps.db.dsn(),
            "Authz providers wired"
        );
        Ok(())
    }
}
