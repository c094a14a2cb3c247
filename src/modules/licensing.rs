//! License enforcement.
//!
//! The key has the form `<plan>:<max users>`. No key means the free plan.

use crate::dependencies::Dependencies;
use crate::services::{EnterpriseServices, LicenseInfo};
use async_trait::async_trait;
use startup_framework::{BoxError, Initializer, StartupContext};
use tracing::info;

const FREE_PLAN: &str = "free";
const FREE_MAX_USERS: u32 = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LicensingError {
    #[error("malformed license key {0:?}, expected <plan>:<max users>")]
    MalformedKey(String),
}

/// Parses a license key into its plan and user limit.
pub fn parse_license_key(key: &str) -> Result<LicenseInfo, LicensingError> {
    let malformed = || LicensingError::MalformedKey(key.to_string());

    let (plan, max_users) = key.split_once(':').ok_or_else(malformed)?;
    if plan.is_empty() {
        return Err(malformed());
    }
    let max_users = max_users.parse::<u32>().map_err(|_| malformed())?;

    Ok(LicenseInfo {
        plan: plan.to_string(),
        max_users,
    })
}

pub struct Licensing;

#[async_trait]
impl Initializer<EnterpriseServices, Dependencies> for Licensing {
    async fn init(
        &self,
        _ctx: &StartupContext,
        services: &mut EnterpriseServices,
        deps: &Dependencies,
    ) -> Result<(), BoxError> {
        let license = match deps.config.current().license_key {
            Some(key) => parse_license_key(&key)?,
            None => LicenseInfo {
                plan: FREE_PLAN.to_string(),
                max_users: FREE_MAX_USERS,
            },
        };
        info!(plan = %license.plan, max_users = license.max_users, "License loaded");

        services.register_resolver("licensing");
        services.license = Some(license);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_license_key() {
        assert_eq!(
            parse_license_key("enterprise:250"),
            Ok(LicenseInfo {
                plan: "enterprise".to_string(),
                max_users: 250
            })
        );
        for bad in ["enterprise", ":10", "business:many", "business:-1"] {
            assert_eq!(
                parse_license_key(bad),
                Err(LicensingError::MalformedKey(bad.to_string()))
            );
        }
    }
}
