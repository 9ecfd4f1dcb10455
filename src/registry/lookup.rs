//! Registry Lookup
//!
//! Resolves registries by name (list + linear scan) or by UID (direct get).

use super::{Registry, RegistryKind};
use crate::api::client::PaletteClient;
use crate::api::models::{
    BasicOciRegistry, EcrRegistry, HasMetadata, HelmRegistry, ListResponse, OciRegistry,
    PackRegistry,
};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// First item whose metadata name equals `name` exactly, in listing order
pub fn find_by_name<T: HasMetadata>(items: Vec<T>, name: &str) -> Option<T> {
    items.into_iter().find(|item| item.name() == name)
}

async fn list<T: DeserializeOwned>(client: &PaletteClient, path: &str) -> Result<Vec<T>> {
    let url = client.registries_url(path);
    let response: ListResponse<T> = client.get_as(&url).await?;
    Ok(response.items)
}

pub async fn list_pack_registries(client: &PaletteClient) -> Result<Vec<PackRegistry>> {
    list(client, "pack").await
}

pub async fn list_helm_registries(client: &PaletteClient) -> Result<Vec<HelmRegistry>> {
    list(client, "helm").await
}

/// The OCI summary covers both ECR and basic OCI registries
pub async fn list_oci_registries(client: &PaletteClient) -> Result<Vec<OciRegistry>> {
    list(client, "oci/summary").await
}

pub async fn get_pack_registry_by_name(client: &PaletteClient, name: &str) -> Result<PackRegistry> {
    let registries = list_pack_registries(client).await?;
    find_by_name(registries, name).ok_or_else(|| Error::not_found(name))
}

pub async fn get_helm_registry_by_name(client: &PaletteClient, name: &str) -> Result<HelmRegistry> {
    let registries = list_helm_registries(client).await?;
    find_by_name(registries, name).ok_or_else(|| Error::not_found(name))
}

pub async fn get_oci_registry_by_name(client: &PaletteClient, name: &str) -> Result<OciRegistry> {
    let registries = list_oci_registries(client).await?;
    find_by_name(registries, name).ok_or_else(|| Error::not_found(name))
}

/// Fetch an ECR registry by UID; a missing registry surfaces as the API's 404
pub async fn get_oci_registry(client: &PaletteClient, uid: &str) -> Result<EcrRegistry> {
    client.get_as(&client.oci_registry_url(uid, "ecr")).await
}

pub async fn get_basic_oci_registry(client: &PaletteClient, uid: &str) -> Result<BasicOciRegistry> {
    client.get_as(&client.oci_registry_url(uid, "basic")).await
}

/// Resolve a registry of the given kind
///
/// Pack, Helm and OCI registries are looked up by name; ECR and basic OCI
/// registries by UID.
pub async fn resolve(client: &PaletteClient, kind: RegistryKind, key: &str) -> Result<Registry> {
    tracing::debug!("resolve registry: kind={}, key={}", kind, key);

    Ok(match kind {
        RegistryKind::Pack => Registry::Pack(get_pack_registry_by_name(client, key).await?),
        RegistryKind::Helm => Registry::Helm(get_helm_registry_by_name(client, key).await?),
        RegistryKind::Oci => Registry::Oci(get_oci_registry_by_name(client, key).await?),
        RegistryKind::Ecr => Registry::Ecr(get_oci_registry(client, key).await?),
        RegistryKind::BasicOci => Registry::BasicOci(get_basic_oci_registry(client, key).await?),
    })
}

/// Look a registry up by name across pack, Helm and OCI registries
///
/// Listings are fetched and scanned in that fixed order and a later one is
/// only fetched on a miss, so a pack registry shadows a Helm or OCI registry
/// of the same name and a listing that isn't needed can't fail the lookup.
pub async fn get_registry_common_by_name(client: &PaletteClient, name: &str) -> Result<Registry> {
    if let Some(found) = find_by_name(list_pack_registries(client).await?, name) {
        return Ok(Registry::Pack(found));
    }
    if let Some(found) = find_by_name(list_helm_registries(client).await?, name) {
        return Ok(Registry::Helm(found));
    }
    if let Some(found) = find_by_name(list_oci_registries(client).await?, name) {
        return Ok(Registry::Oci(found));
    }

    Err(Error::not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ObjectMeta;

    fn pack(name: &str, uid: &str) -> PackRegistry {
        PackRegistry {
            metadata: ObjectMeta {
                name: name.to_string(),
                uid: uid.to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_find_by_name_exact_match() {
        let items = vec![pack("public", "u1"), pack("private", "u2")];
        assert_eq!(find_by_name(items, "private").unwrap().uid(), "u2");
    }

    #[test]
    fn test_find_by_name_is_case_sensitive() {
        let items = vec![pack("Public", "u1")];
        assert!(find_by_name(items, "public").is_none());
    }

    #[test]
    fn test_find_by_name_first_duplicate_wins() {
        let items = vec![pack("dup", "first"), pack("dup", "second")];
        assert_eq!(find_by_name(items, "dup").unwrap().uid(), "first");
    }

    #[test]
    fn test_find_by_name_empty_list() {
        assert!(find_by_name(Vec::<PackRegistry>::new(), "any").is_none());
    }
}
