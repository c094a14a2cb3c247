//! # Modules & the Module Table
//!
//! A *module* is an independently developed subsystem that contributes capabilities to
//! a shared registry during startup. Each one is registered under a unique name and
//! exposes a single [`Initializer`].
//!
//! ## The Initializer Contract
//!
//! ```text
//! init(context, &mut registry, &dependencies) -> Result<(), BoxError>
//! ```
//!
//! - `registry` is exclusively borrowed for the duration of the call; the initializer
//!   may add whatever it wants to it.
//! - `dependencies` is shared and read-only.
//! - An initializer must not assume any other module ran before it, unless it is the
//!   table's designated **final** module.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use startup_framework::{BoxError, Initializer, ModuleTable, StartupContext};
//!
//! #[derive(Default)]
//! struct Registry { handlers: Vec<&'static str> }
//! struct Deps;
//!
//! struct Search;
//!
//! #[async_trait]
//! impl Initializer<Registry, Deps> for Search {
//!     async fn init(&self, _: &StartupContext, r: &mut Registry, _: &Deps) -> Result<(), BoxError> {
//!         r.handlers.push("search");
//!         Ok(())
//!     }
//! }
//!
//! struct Proxy;
//!
//! #[async_trait]
//! impl Initializer<Registry, Deps> for Proxy {
//!     async fn init(&self, _: &StartupContext, r: &mut Registry, _: &Deps) -> Result<(), BoxError> {
//!         if r.handlers.is_empty() {
//!             return Err("nothing to proxy".into());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let table: ModuleTable<Registry, Deps> =
//!     ModuleTable::new("proxy", Proxy).with("search", Search).unwrap();
//! assert_eq!(table.names().collect::<Vec<_>>(), vec!["search", "proxy"]);
//! ```

use crate::context::StartupContext;
use crate::error::{BoxError, StartupError};
use async_trait::async_trait;

/// Initialization routine of one module.
#[async_trait]
pub trait Initializer<R, D>: Send + Sync {
    async fn init(
        &self,
        ctx: &StartupContext,
        registry: &mut R,
        deps: &D,
    ) -> Result<(), BoxError>;
}

/// A named initializer.
pub struct ModuleEntry<R, D> {
    pub name: String,
    pub init: Box<dyn Initializer<R, D>>,
}

impl<R, D> ModuleEntry<R, D> {
    pub fn new(name: impl Into<String>, init: impl Initializer<R, D> + 'static) -> Self {
        Self {
            name: name.into(),
            init: Box::new(init),
        }
    }
}

impl<R, D> std::fmt::Debug for ModuleEntry<R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry").field("name", &self.name).finish()
    }
}

/// The static set of modules booted by one orchestration pass.
///
/// Holds any number of regular modules plus exactly one designated final module.
/// Regular modules are kept in registration order, but that order carries no meaning:
/// the only ordering guarantee is that the final module runs after all of them.
pub struct ModuleTable<R, D> {
    entries: Vec<ModuleEntry<R, D>>,
    last: ModuleEntry<R, D>,
}

impl<R, D> ModuleTable<R, D> {
    /// Creates a table with only the designated final module.
    pub fn new(last_name: impl Into<String>, last: impl Initializer<R, D> + 'static) -> Self {
        Self {
            entries: Vec::new(),
            last: ModuleEntry::new(last_name, last),
        }
    }

    /// Registers a regular module.
    ///
    /// # Errors
    ///
    /// [`StartupError::DuplicateModule`] if `name` is already taken, including by the
    /// final module.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        init: impl Initializer<R, D> + 'static,
    ) -> Result<(), StartupError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(StartupError::DuplicateModule(name));
        }
        self.entries.push(ModuleEntry::new(name, init));
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(
        mut self,
        name: impl Into<String>,
        init: impl Initializer<R, D> + 'static,
    ) -> Result<Self, StartupError> {
        self.register(name, init)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.last.name == name || self.entries.iter().any(|e| e.name == name)
    }

    /// All module names, final module last.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .chain(std::iter::once(&self.last))
            .map(|e| e.name.as_str())
    }

    pub fn final_module(&self) -> &str {
        &self.last.name
    }

    /// Number of regular (non-final) modules.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn into_parts(self) -> (Vec<ModuleEntry<R, D>>, ModuleEntry<R, D>) {
        (self.entries, self.last)
    }
}

impl<R, D> std::fmt::Debug for ModuleTable<R, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleTable")
            .field("entries", &self.entries)
            .field("last", &self.last)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{CallLog, RecordingInitializer};

    fn noop(log: &CallLog, name: &str) -> RecordingInitializer<Vec<String>> {
        RecordingInitializer::new(name, log.clone())
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let log = CallLog::default();
        let mut table: ModuleTable<Vec<String>, ()> = ModuleTable::new("executor", noop(&log, "executor"));
        table.register("authz", noop(&log, "authz")).unwrap();

        let err = table.register("authz", noop(&log, "authz")).unwrap_err();
        assert!(matches!(err, StartupError::DuplicateModule(ref name) if name == "authz"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_register_rejects_final_module_name() {
        let log = CallLog::default();
        let table: ModuleTable<Vec<String>, ()> = ModuleTable::new("executor", noop(&log, "executor"));

        let result = table.with("executor", noop(&log, "executor"));
        assert!(matches!(result, Err(StartupError::DuplicateModule(_))));
    }

    #[test]
    fn test_names_lists_final_module_last() {
        let log = CallLog::default();
        let table: ModuleTable<Vec<String>, ()> = ModuleTable::new("executor", noop(&log, "executor"))
            .with("batches", noop(&log, "batches"))
            .unwrap()
            .with("codeintel", noop(&log, "codeintel"))
            .unwrap();

        assert_eq!(
            table.names().collect::<Vec<_>>(),
            vec!["batches", "codeintel", "executor"]
        );
        assert_eq!(table.final_module(), "executor");
        assert!(table.contains("codeintel"));
        assert!(!table.is_empty());
    }
}
