//! Modules whose only contribution is a GraphQL resolver.

use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::debug;

/// Registers a resolver under its own name, plus an optional HTTP route.
pub struct ResolverModule {
    name: &'static str,
    route: Option<(&'static str, &'static str)>,
}

impl ResolverModule {
    pub fn new(name: &'static str) -> Self {
        Self { name, route: None }
    }

    pub fn with_route(mut self, route: &'static str, description: &'static str) -> Self {
        self.route = Some((route, description));
        self
    }
}

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for ResolverModule {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        _deps: &Dependencies,
    ) -> Result<(), BoxError> {
        services.register_resolver(self.name);
        if let Some((route, description)) = self.route {
            services.register_handler(route, description);
        }
        debug!(resolver = self.name, "Registered resolver");
        Ok(())
    }
}
