//! Registry data sources and resources for the Spectro Cloud Palette provider
//!
//! - [`api`] - Palette REST client
//! - [`registry`] - Registry resolution by name or UID, plus create/update/delete
//! - [`schema`] - Configuration document, schema and diagnostics contract
//! - [`provider`] - Lifecycle callbacks and field mappers
//! - [`config`] - Persistent user configuration

pub mod api;
pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod schema;

pub use error::{Error, Result};
