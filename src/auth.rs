//! Authentication providers.
//!
//! Runs before the module table: every module may rely on the providers being in
//! place, so this is not itself a module.

use crate::dependencies::Dependencies;
use crate::services::EnterpriseServices;
use tracing::debug;

const BUILTIN_PROVIDER: &str = "builtin";
const SOURCEGRAPH_OPERATOR: &str = "sourcegraph-operator";

/// Installs the authentication providers the site supports.
pub fn init(services: &mut EnterpriseServices, deps: &Dependencies) {
    services.auth_providers.push(BUILTIN_PROVIDER.to_string());
    if deps.config.current().dotcom_mode {
        services
            .auth_providers
            .push(SOURCEGRAPH_OPERATOR.to_string());
    }
    debug!(providers = ?services.auth_providers, "Auth providers installed");
}
