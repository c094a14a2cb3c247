//! # Startup Errors
//!
//! Both error kinds defined here are startup-only. Once the orchestration pass has
//! completed and every operation handle has been built, none of them can occur again,
//! so the only sensible reaction is to stop the process (see the host's `main`).

/// Error type returned by module initializers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort the startup pass.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// A module initializer returned an error. Carries the failing module's name.
    #[error("failed to initialize module {module}: {source}")]
    Initialization {
        module: String,
        #[source]
        source: BoxError,
    },
    /// Two modules were registered under the same name.
    #[error("module registered twice: {0}")]
    DuplicateModule(String),
    #[error(transparent)]
    Instrumentation(#[from] InstrumentationError),
}

impl StartupError {
    /// Name of the module that caused the failure, if any.
    pub fn module(&self) -> Option<&str> {
        match self {
            StartupError::Initialization { module, .. } => Some(module),
            StartupError::DuplicateModule(module) => Some(module),
            StartupError::Instrumentation(_) => None,
        }
    }
}

/// Invalid or duplicate instrumentation setup.
#[derive(Debug, thiserror::Error)]
pub enum InstrumentationError {
    #[error("metric family already registered: {0}")]
    AlreadyRegistered(String),
    #[error("operation {operation} declared twice for component {component}")]
    DuplicateOperation {
        component: String,
        operation: String,
    },
    #[error("invalid operation name {0:?}")]
    InvalidOperation(String),
    /// Operation handles carry exactly one label value, their own name.
    #[error("component {component} needs exactly one metric label, got {labels:?}")]
    InvalidLabels {
        component: String,
        labels: Vec<String>,
    },
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
