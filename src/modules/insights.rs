//! Code insights. Disabled unless the site config turns it on.

use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::info;

pub struct Insights;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for Insights {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        if !deps.config.current().insights_enabled {
            info!("Code insights disabled, skipping");
            return Ok(());
        }
        services.register_resolver("insights");
        Ok(())
    }
}
