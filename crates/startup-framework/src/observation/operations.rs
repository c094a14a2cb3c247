//! The instrumentation factory: one metric family per component, one handle per operation.

use super::context::ObservationContext;
use super::metrics::{RedMetrics, RedMetricsOptions};
use super::operation::{Op, Operation};
use crate::error::InstrumentationError;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// The operations of one client component.
#[derive(Clone, Debug)]
pub struct OperationSet {
    component: String,
    operations: Vec<String>,
    options: RedMetricsOptions,
}

impl OperationSet {
    pub fn new<I, S>(component: impl Into<String>, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            component: component.into(),
            operations: operations.into_iter().map(Into::into).collect(),
            options: RedMetricsOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RedMetricsOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the names, registers the component's metric family, and builds the
    /// handles.
    ///
    /// # Errors
    ///
    /// - [`InstrumentationError::InvalidOperation`] for an empty name or one containing `.`
    /// - [`InstrumentationError::DuplicateOperation`] when a name repeats
    /// - [`InstrumentationError::InvalidLabels`] unless the options declare exactly one
    ///   label
    /// - [`InstrumentationError::AlreadyRegistered`] when the component was already built
    ///   against the same registry
    pub fn build(&self, ctx: &ObservationContext) -> Result<Operations, InstrumentationError> {
        if self.options.labels.len() != 1 {
            return Err(InstrumentationError::InvalidLabels {
                component: self.component.clone(),
                labels: self.options.labels.clone(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.operations {
            if name.is_empty() || name.contains('.') {
                return Err(InstrumentationError::InvalidOperation(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(InstrumentationError::DuplicateOperation {
                    component: self.component.clone(),
                    operation: name.clone(),
                });
            }
        }

        let metrics = Arc::new(RedMetrics::new(
            ctx.registry(),
            &ctx.metric_prefix(&self.component),
            self.options.clone(),
        )?);

        let ops = self
            .operations
            .iter()
            .map(|name| {
                let op = ctx.operation(Op {
                    name: ctx.operation_name(&self.component, name),
                    metric_label_values: vec![name.clone()],
                    metrics: Some(metrics.clone()),
                });
                (name.clone(), op)
            })
            .collect();

        debug!(
            component = %self.component,
            prefix = %metrics.prefix(),
            operations = ?self.operations,
            "Built operations"
        );

        Ok(Operations {
            component: self.component.clone(),
            metrics,
            ops,
        })
    }
}

/// Shorthand for `OperationSet::new(component, names).build(ctx)`.
pub fn build_operations(
    ctx: &ObservationContext,
    component: &str,
    names: &[&str],
) -> Result<Operations, InstrumentationError> {
    OperationSet::new(component, names.iter().copied()).build(ctx)
}

/// The handles built for one component, in declaration order.
#[derive(Clone, Debug)]
pub struct Operations {
    component: String,
    metrics: Arc<RedMetrics>,
    ops: Vec<(String, Operation)>,
}

impl Operations {
    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn get(&self, name: &str) -> Option<&Operation> {
        self.ops.iter().find(|(n, _)| n == name).map(|(_, op)| op)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.ops.iter().map(|(n, op)| (n.as_str(), op))
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The family shared by every handle.
    pub fn metrics(&self) -> &Arc<RedMetrics> {
        &self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ObservationContext {
        ObservationContext::default().scoped("apiworker.apiclient")
    }

    #[test]
    fn test_handles_share_one_family() {
        let ops = build_operations(&ctx(), "files", &["Exists", "Get"]).unwrap();

        let exists = ops.get("Exists").unwrap();
        let get = ops.get("Get").unwrap();
        assert_eq!(exists.name(), "apiworker.apiclient.files.Exists");
        assert_eq!(get.name(), "apiworker.apiclient.files.Get");
        assert_eq!(exists.label_values(), ["Exists".to_string()]);
        assert!(Arc::ptr_eq(exists.metrics().unwrap(), get.metrics().unwrap()));
        assert_eq!(ops.iter().map(|(n, _)| n).collect::<Vec<_>>(), vec!["Exists", "Get"]);
    }

    #[test]
    fn test_duplicate_operation_rejected_before_registration() {
        let ctx = ctx();
        let err = build_operations(&ctx, "files", &["Get", "Get"]).unwrap_err();
        assert!(matches!(err, InstrumentationError::DuplicateOperation { ref operation, .. } if operation == "Get"));

        // Nothing was registered, so a corrected set still builds.
        assert!(build_operations(&ctx, "files", &["Get"]).is_ok());
    }

    #[test]
    fn test_invalid_operation_names() {
        assert!(matches!(
            build_operations(&ctx(), "files", &[""]),
            Err(InstrumentationError::InvalidOperation(_))
        ));
        assert!(matches!(
            build_operations(&ctx(), "files", &["Get.All"]),
            Err(InstrumentationError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_label_count_other_than_one_is_rejected() {
        let ctx = ctx();
        for labels in [vec!["op", "status"], vec![]] {
            let err = OperationSet::new("files", ["Exists", "Get"])
                .with_options(RedMetricsOptions::default().with_labels(labels.clone()))
                .build(&ctx)
                .unwrap_err();
            match err {
                InstrumentationError::InvalidLabels { labels: got, .. } => assert_eq!(got, labels),
                other => panic!("unexpected error: {other}"),
            }
        }

        // Rejected before registration: nothing rendered, and a valid set still builds.
        assert_eq!(ctx.render().unwrap(), "");
        let ops = OperationSet::new("files", ["Exists", "Get"])
            .with_options(RedMetricsOptions::default().with_labels(["method"]))
            .build(&ctx)
            .unwrap();
        for _ in 0..3 {
            ops.get("Exists").unwrap().start().finish(true);
        }
        assert_eq!(ops.metrics().count(&["Exists"]), 3);
        assert_eq!(ops.metrics().errors(&["Exists"]), 3);
    }

    #[test]
    fn test_same_component_twice_is_rejected() {
        let ctx = ctx();
        build_operations(&ctx, "files", &["Exists", "Get"]).unwrap();

        let err = build_operations(&ctx, "files", &["Exists", "Get"]).unwrap_err();
        assert!(matches!(err, InstrumentationError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_separate_registries_do_not_collide() {
        assert!(build_operations(&ctx(), "files", &["Get"]).is_ok());
        assert!(build_operations(&ctx(), "files", &["Get"]).is_ok());
    }
}
