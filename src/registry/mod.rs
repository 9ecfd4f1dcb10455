//! Registry resolution layer
//!
//! Palette exposes four registry families: pack registries, Helm
//! registries, and OCI registries (ECR or basic). This module unifies them
//! behind [`Registry`] and resolves them by name or UID.
//!
//! # Architecture
//!
//! - [`lookup`] - Name scans over listings and UID fetches
//! - [`crud`] - Create, update and delete calls
//!
//! Name lookups always list and scan: the API has no filter-by-name for
//! these kinds, and results are never cached. When several registries share
//! a name, the first one in listing order is returned; the API does not
//! promise a stable order, so neither does this.
//!
//! # Example
//!
//! ```ignore
//! use spectro_registry::registry::{resolve, RegistryKind};
//!
//! async fn pack_uid(client: &PaletteClient) -> spectro_registry::Result<String> {
//!     let registry = resolve(client, RegistryKind::Pack, "Public Repo").await?;
//!     Ok(registry.uid().to_string())
//! }
//! ```

mod crud;
mod lookup;

use crate::api::models::{
    BasicOciRegistry, EcrRegistry, HasMetadata, HelmRegistry, ObjectMeta, OciRegistry,
    PackRegistry,
};
use std::fmt;
use std::str::FromStr;

pub use crud::{create_oci_ecr_registry, delete_registry, update_ecr_registry};
pub use lookup::{
    find_by_name, get_basic_oci_registry, get_helm_registry_by_name, get_oci_registry,
    get_oci_registry_by_name, get_pack_registry_by_name, get_registry_common_by_name,
    list_helm_registries, list_oci_registries, list_pack_registries, resolve,
};

/// Registry family, which also decides how a registry is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    Pack,
    Helm,
    Oci,
    Ecr,
    BasicOci,
}

impl RegistryKind {
    pub const ALL: [RegistryKind; 5] = [
        RegistryKind::Pack,
        RegistryKind::Helm,
        RegistryKind::Oci,
        RegistryKind::Ecr,
        RegistryKind::BasicOci,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryKind::Pack => "pack",
            RegistryKind::Helm => "helm",
            RegistryKind::Oci => "oci",
            RegistryKind::Ecr => "ecr",
            RegistryKind::BasicOci => "basic",
        }
    }

    /// Whether `resolve` treats the key as a name (otherwise it is a UID)
    pub fn resolves_by_name(&self) -> bool {
        matches!(self, RegistryKind::Pack | RegistryKind::Helm | RegistryKind::Oci)
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistryKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegistryKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::validation(format!("unknown registry kind '{}'", s)))
    }
}

/// A resolved registry of any family
#[derive(Debug, Clone, PartialEq)]
pub enum Registry {
    Pack(PackRegistry),
    Helm(HelmRegistry),
    Oci(OciRegistry),
    Ecr(EcrRegistry),
    BasicOci(BasicOciRegistry),
}

impl Registry {
    pub fn kind(&self) -> RegistryKind {
        match self {
            Registry::Pack(_) => RegistryKind::Pack,
            Registry::Helm(_) => RegistryKind::Helm,
            Registry::Oci(_) => RegistryKind::Oci,
            Registry::Ecr(_) => RegistryKind::Ecr,
            Registry::BasicOci(_) => RegistryKind::BasicOci,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Registry::Pack(r) => &r.spec.endpoint,
            Registry::Helm(r) => &r.spec.endpoint,
            Registry::Oci(r) => &r.spec.endpoint,
            Registry::Ecr(r) => &r.spec.endpoint,
            Registry::BasicOci(r) => &r.spec.endpoint,
        }
    }
}

impl HasMetadata for Registry {
    fn metadata(&self) -> &ObjectMeta {
        match self {
            Registry::Pack(r) => r.metadata(),
            Registry::Helm(r) => r.metadata(),
            Registry::Oci(r) => r.metadata(),
            Registry::Ecr(r) => r.metadata(),
            Registry::BasicOci(r) => r.metadata(),
        }
    }
}
