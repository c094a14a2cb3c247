//! # Frontend Bootstrap
//!
//! Boots the enterprise frontend out of independently developed modules, using
//! [`startup_framework`] for the orchestration and instrumentation.
//!
//! - **[config]**: environment and site configuration
//! - **[dependencies]**: the read-only bundle every module receives
//! - **[services]**: the registry the modules populate
//! - **[modules]**: the modules themselves and the table that wires them
//! - **[clients]**: instrumented API clients handed to modules
//! - **[lifecycle]**: [`FrontendSystem`], which performs the boot
//!
//! ## Testing
//!
//! Tests build their own [`Config`] with [`Config::from_lookup`] and boot a
//! [`FrontendSystem`] directly. Each boot owns its own metrics registry, so tests do
//! not interfere with each other.

pub mod auth;
pub mod clients;
pub mod config;
pub mod dependencies;
pub mod lifecycle;
pub mod modules;
pub mod services;

pub use config::{Config, SiteConfig};
pub use lifecycle::FrontendSystem;
