use frontend_bootstrap::lifecycle::log_startup_failure;
use frontend_bootstrap::{Config, FrontendSystem};
use startup_framework::tracing::setup_tracing;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    setup_tracing(&config.log_level);

    info!("Starting frontend");

    let system = match FrontendSystem::boot(&config).await {
        Ok(system) => system,
        Err(e) => {
            log_startup_failure(&e);
            std::process::exit(1);
        }
    };

    info!(
        modules = system.report.modules.len(),
        elapsed_ms = system.report.total().as_millis() as u64,
        "Frontend started"
    );

    if let Some(proxy) = &system.services.executor_proxy {
        let bucket = &system.dependencies.codeintel.upload_bucket;
        match proxy.files.exists(bucket, "index.scip").await {
            Ok(found) => debug!(found, "Probed upload store"),
            Err(e) => error!(error = %e, "Upload store probe failed"),
        }
    }

    match system.render_metrics() {
        Ok(metrics) => debug!("\n{metrics}"),
        Err(e) => error!(error = %e, "failed to render metrics"),
    }
}
