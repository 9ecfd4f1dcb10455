//! Palette API interaction module
//!
//! This module provides the core functionality for talking to the Spectro
//! Cloud Palette control plane: authentication, HTTP transport, the client
//! with its URL builders, and the request/response entities.
//!
//! # Module Structure
//!
//! - [`auth`] - API key or username/password credentials
//! - [`client`] - Main Palette client for making API requests
//! - [`http`] - HTTP utilities for REST API calls
//! - [`models`] - Registry and cluster configuration entities
//!
//! # Example
//!
//! ```ignore
//! use spectro_registry::api::{auth::Credentials, client::PaletteClient};
//!
//! async fn example() -> spectro_registry::Result<()> {
//!     let client = PaletteClient::new("api.spectrocloud.com", Credentials::from_env()?, None)?;
//!     let registries = client.get(&client.registries_url("pack")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod models;
