//! # Frontend Lifecycle
//!
//! [`FrontendSystem::boot`] turns a [`Config`] into a running set of enterprise
//! services:
//!
//! 1. Build the startup [`Dependencies`] (database handle, code intelligence storage,
//!    site config channel, observation context)
//! 2. Install the auth providers
//! 3. Run the module table, executor last
//! 4. Freeze the populated registry behind an `Arc`
//!
//! Any module failure aborts the boot and is returned to the caller. Exiting the
//! process is left to `main`.

use crate::auth;
use crate::config::{Config, SiteConfig};
use crate::dependencies::{CodeIntelServices, Database, Dependencies, WatchableConfig};
use crate::modules::{self, EnterpriseModules};
use crate::services::EnterpriseServices;
use prometheus::Registry;
use startup_framework::orchestrator::{self, StartupReport};
use startup_framework::{InstrumentationError, ObservationContext, StartupContext, StartupError};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Logs a boot failure that has not been logged yet.
///
/// Module failures are logged by the orchestrator inside the failing module's span,
/// so only table construction and instrumentation errors are logged here.
pub fn log_startup_failure(err: &StartupError) {
    if !matches!(err, StartupError::Initialization { .. }) {
        error!(module = err.module().unwrap_or("-"), error = %err, "failed to start");
    }
}

/// A booted frontend.
pub struct FrontendSystem {
    /// The registry, read-only once startup is over.
    pub services: Arc<EnterpriseServices>,
    pub dependencies: Dependencies,
    pub report: StartupReport,
    config_tx: watch::Sender<SiteConfig>,
}

impl FrontendSystem {
    /// Boots with the standard module table.
    pub async fn boot(config: &Config) -> Result<Self, StartupError> {
        Self::boot_with(config, modules::enterprise_modules()?).await
    }

    /// Boots with a custom module table.
    pub async fn boot_with(
        config: &Config,
        table: EnterpriseModules,
    ) -> Result<Self, StartupError> {
        let (config_tx, watchable) = WatchableConfig::channel(config.site.clone());
        let dependencies = Dependencies {
            db: Database::new(config.database_url.as_str()),
            codeintel: CodeIntelServices::default(),
            config: watchable,
            observation: ObservationContext::new(Registry::new())
                .scoped(&config.metrics_namespace),
        };
        if config.debug {
            debug!(?config, modules = ?table.names().collect::<Vec<_>>(), "Boot configuration");
        }

        let mut services = EnterpriseServices::default();
        auth::init(&mut services, &dependencies);

        let ctx = StartupContext::new("enterprise");
        let report = orchestrator::run(&ctx, &mut services, &dependencies, table).await?;
        info!(
            resolvers = services.resolvers.len(),
            handlers = services.handlers.len(),
            queues = services.executor_queues.len(),
            "Enterprise services ready"
        );

        Ok(Self {
            services: Arc::new(services),
            dependencies,
            report,
            config_tx,
        })
    }

    /// Publishes a new site configuration to every subscriber.
    pub fn update_site_config(&self, site: SiteConfig) {
        self.config_tx.send_replace(site);
        debug!("Site configuration updated");
    }

    /// The process metrics in Prometheus text format.
    pub fn render_metrics(&self) -> Result<String, InstrumentationError> {
        self.dependencies.observation.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn error_lines(&self) -> usize {
            String::from_utf8_lossy(&self.0.lock().unwrap())
                .lines()
                .filter(|line| line.contains("ERROR"))
                .count()
        }
    }

    fn capture() -> (Captured, tracing::subscriber::DefaultGuard) {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        (captured, tracing::subscriber::set_default(subscriber))
    }

    fn config(site: &str) -> Config {
        Config::from_lookup(|key| (key == "SITE_CONFIG").then(|| site.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_module_failure_is_logged_once() {
        let (captured, _guard) = capture();

        let err = FrontendSystem::boot(&config(r#"{"licenseKey":"broken"}"#))
            .await
            .err()
            .unwrap();
        log_startup_failure(&err);

        assert_eq!(err.module(), Some("licensing"));
        assert_eq!(captured.error_lines(), 1);
    }

    #[test]
    fn test_table_error_is_logged_by_host() {
        let (captured, _guard) = capture();

        let err = modules::enterprise_modules()
            .and_then(|table| table.with("authz", crate::modules::authz::Authz))
            .err()
            .unwrap();
        log_startup_failure(&err);

        assert!(matches!(err, StartupError::DuplicateModule(_)));
        assert_eq!(captured.error_lines(), 1);
    }
}
