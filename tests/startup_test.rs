use frontend_bootstrap::modules::executor::{Executor, ExecutorError};
use frontend_bootstrap::modules::licensing::LicensingError;
use frontend_bootstrap::modules::{codeintel, FINAL_MODULE};
use frontend_bootstrap::{Config, FrontendSystem, SiteConfig};
use startup_framework::{ModuleTable, StartupError};
use std::collections::HashMap;

fn config(pairs: &[(&str, &str)]) -> Config {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| map.get(key).cloned()).expect("valid test config")
}

fn source_of<E: std::error::Error + 'static>(err: &StartupError) -> &E {
    match err {
        StartupError::Initialization { source, .. } => source
            .downcast_ref::<E>()
            .expect("unexpected initialization error type"),
        other => panic!("unexpected error: {other}"),
    }
}

// --- Boot ---

#[tokio::test]
async fn test_default_table_boots() {
    let config = config(&[(
        "SITE_CONFIG",
        r#"{"licenseKey":"enterprise:250","insightsEnabled":true,"executorMaxQueueSize":5}"#,
    )]);
    let system = FrontendSystem::boot(&config).await.unwrap();

    let names = system.report.names();
    assert_eq!(names.len(), 12);
    assert_eq!(names.last(), Some(&FINAL_MODULE));

    let services = &system.services;
    assert_eq!(services.resolvers.len(), 11);
    assert_eq!(services.auth_providers, vec!["builtin".to_string()]);
    assert_eq!(services.license.as_ref().map(|l| l.max_users), Some(250));
    assert!(services
        .executor_queues
        .values()
        .all(|q| q.max_queue_size == 5));

    let proxy = services.executor_proxy.as_ref().expect("executor ran");
    assert_eq!(proxy.queues, vec!["batches", "codeintel"]);
    assert_eq!(
        proxy.operations.get("Dequeue").map(|op| op.name()),
        Some("frontend.executorqueue.Dequeue")
    );
}

#[tokio::test]
async fn test_disabled_insights_registers_nothing() {
    let system = FrontendSystem::boot(&config(&[("METRICS_NAMESPACE", "dev")]))
        .await
        .unwrap();

    assert!(system.report.names().contains(&"insights"));
    assert!(!system.services.resolvers.contains("insights"));
    let license = system.services.license.as_ref().unwrap();
    assert_eq!(license.plan, "free");

    let proxy = system.services.executor_proxy.as_ref().unwrap();
    assert_eq!(proxy.operations.metrics().prefix(), "dev_executorqueue");
}

#[tokio::test]
async fn test_dotcom_mode_adds_operator_auth() {
    let system = FrontendSystem::boot(&config(&[("SITE_CONFIG", r#"{"dotcomMode":true}"#)]))
        .await
        .unwrap();
    assert_eq!(
        system.services.auth_providers,
        vec!["builtin".to_string(), "sourcegraph-operator".to_string()]
    );
}

// --- Failures ---

#[tokio::test]
async fn test_malformed_license_aborts_before_executor() {
    let config = config(&[("SITE_CONFIG", r#"{"licenseKey":"enterprise"}"#)]);
    let err = FrontendSystem::boot(&config).await.err().expect("boot fails");

    assert_eq!(err.module(), Some("licensing"));
    assert_eq!(
        source_of::<LicensingError>(&err),
        &LicensingError::MalformedKey("enterprise".to_string())
    );
}

#[tokio::test]
async fn test_executor_requires_registered_queues() {
    let table = ModuleTable::new(FINAL_MODULE, Executor)
        .with("codeintel", codeintel::CodeIntel)
        .unwrap();

    let err = FrontendSystem::boot_with(&config(&[]), table)
        .await
        .err()
        .expect("boot fails");

    assert_eq!(err.module(), Some(FINAL_MODULE));
    assert_eq!(
        source_of::<ExecutorError>(&err),
        &ExecutorError::MissingQueue("batches")
    );
}

// --- Runtime ---

#[tokio::test]
async fn test_executor_file_access_is_instrumented() {
    let system = FrontendSystem::boot(&config(&[])).await.unwrap();
    let bucket = system.dependencies.codeintel.upload_bucket.clone();
    system
        .dependencies
        .codeintel
        .upload_store
        .put(&bucket, "1/index.scip", b"scip".to_vec())
        .await;

    let files = &system.services.executor_proxy.as_ref().unwrap().files;
    assert!(files.exists(&bucket, "1/index.scip").await.unwrap());
    assert_eq!(files.get(&bucket, "1/index.scip").await.unwrap(), b"scip");
    assert!(files.get(&bucket, "2/index.scip").await.is_err());

    let metrics = system.render_metrics().unwrap();
    assert!(metrics.contains("apiworker_apiclient_files_total{op=\"Exists\"} 1"));
    assert!(metrics.contains("apiworker_apiclient_files_total{op=\"Get\"} 2"));
    assert!(metrics.contains("apiworker_apiclient_files_errors_total{op=\"Get\"} 1"));
}

#[tokio::test]
async fn test_site_config_updates_reach_subscribers() {
    let system = FrontendSystem::boot(&config(&[])).await.unwrap();
    let mut updates = system.dependencies.config.subscribe();

    system.update_site_config(SiteConfig {
        insights_enabled: true,
        ..SiteConfig::default()
    });

    updates.changed().await.unwrap();
    assert!(updates.borrow().insights_enabled);
    assert!(system.dependencies.config.current().insights_enabled);
}
