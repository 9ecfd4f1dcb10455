//! Registry create, update and delete calls

use crate::api::client::PaletteClient;
use crate::api::models::{EcrRegistry, Uid};
use crate::error::Result;

/// Create an ECR registry and return the UID the server assigned
pub async fn create_oci_ecr_registry(client: &PaletteClient, registry: &EcrRegistry) -> Result<String> {
    tracing::info!("create ECR registry: name={}", registry.metadata.name);

    let url = client.registries_url("oci/ecr");
    let created: Uid = client.post_as(&url, registry).await?;
    Ok(created.uid)
}

/// Replace an ECR registry; the whole entity is sent
pub async fn update_ecr_registry(client: &PaletteClient, uid: &str, registry: &EcrRegistry) -> Result<()> {
    tracing::info!("update ECR registry: uid={}", uid);
    client
        .put_entity(&client.oci_registry_url(uid, "ecr"), registry)
        .await
}

/// Delete any OCI-family registry through the basic OCI endpoint
pub async fn delete_registry(client: &PaletteClient, uid: &str) -> Result<()> {
    tracing::info!("delete registry: uid={}", uid);
    client.delete(&client.oci_registry_url(uid, "basic")).await?;
    Ok(())
}
