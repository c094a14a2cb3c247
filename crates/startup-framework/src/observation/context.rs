use super::operation::{Op, Operation};
use crate::error::InstrumentationError;
use prometheus::{Encoder, Registry, TextEncoder};

/// Where instrumentation is registered.
///
/// Carries the metrics registry explicitly instead of relying on a process-wide
/// default, so independent instances (one per test, say) never collide. The
/// `namespace` is prepended to every operation and metric built from this context.
#[derive(Clone)]
pub struct ObservationContext {
    registry: Registry,
    namespace: String,
}

impl ObservationContext {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            namespace: String::new(),
        }
    }

    /// A context sharing this registry, with `namespace` appended to the current one.
    pub fn scoped(&self, namespace: &str) -> Self {
        Self {
            registry: self.registry.clone(),
            namespace: join(&[self.namespace.as_str(), namespace], "."),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `"<namespace>.<component>.<operation>"`, skipping empty parts.
    pub fn operation_name(&self, component: &str, operation: &str) -> String {
        join(&[self.namespace.as_str(), component, operation], ".")
    }

    /// Metric prefix for a component: namespace and component joined by `_`.
    pub fn metric_prefix(&self, component: &str) -> String {
        join(&[self.namespace.as_str(), component], "_").replace(['.', '-'], "_")
    }

    pub fn operation(&self, op: Op) -> Operation {
        Operation::new(op)
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, InstrumentationError> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl std::fmt::Debug for ObservationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservationContext")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl Default for ObservationContext {
    fn default() -> Self {
        Self::new(Registry::new())
    }
}

fn join(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_names() {
        let ctx = ObservationContext::default().scoped("apiworker").scoped("apiclient");
        assert_eq!(ctx.namespace(), "apiworker.apiclient");
        assert_eq!(
            ctx.operation_name("files", "Exists"),
            "apiworker.apiclient.files.Exists"
        );
        assert_eq!(ctx.metric_prefix("files"), "apiworker_apiclient_files");
    }

    #[test]
    fn test_unscoped_names_skip_empty_namespace() {
        let ctx = ObservationContext::default();
        assert_eq!(ctx.operation_name("files", "Get"), "files.Get");
        assert_eq!(ctx.metric_prefix("code-intel"), "code_intel");
    }
}
