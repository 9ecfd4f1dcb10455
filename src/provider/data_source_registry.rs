//! `spectrocloud_registry` data source

use crate::api::client::PaletteClient;
use crate::api::models::HasMetadata;
use crate::registry;
use crate::schema::{Attribute, AttributeType, Diagnostics, Resource, ResourceData};

pub fn data_source_registry() -> Resource {
    Resource::new("Look up a pack, Helm or OCI registry by name.")
        .with_attribute(
            "id",
            Attribute::optional(AttributeType::String).also_computed(),
        )
        .with_attribute(
            "name",
            Attribute::required(AttributeType::String).force_new(),
        )
}

/// Resolve the registry named in the document and record its UID and name
pub async fn data_source_registry_read(client: &PaletteClient, d: &mut ResourceData) -> Diagnostics {
    let Some(name) = d.get_ok("name").and_then(|v| v.as_str()).map(String::from) else {
        return Diagnostics::new();
    };

    tracing::info!("read registry data source: name={}", name);

    match registry::get_registry_common_by_name(client, &name).await {
        Ok(found) => {
            d.set_id(found.uid());
            d.set("name", found.name());
            Diagnostics::new()
        }
        Err(e) => Diagnostics::from_err(&e),
    }
}
