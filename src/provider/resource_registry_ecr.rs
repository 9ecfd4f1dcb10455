//! `spectrocloud_registry_oci` resource (ECR flavor)

use super::str_of;
use crate::api::client::PaletteClient;
use crate::api::models::{AwsCredentials, AwsStsCredentials, EcrRegistry, EcrRegistrySpec, ObjectMeta};
use crate::error::{Error, Result};
use crate::registry;
use crate::schema::{Attribute, AttributeType, Diagnostics, Resource, ResourceData};

const DEFAULT_PROVIDER_TYPE: &str = "helm";
const PROVIDER_TYPES: &[&str] = &["helm", "pack", "zarf"];

pub fn resource_registry_ecr() -> Resource {
    Resource::new("Manage an Amazon ECR registry in Palette.")
        .with_attribute("name", Attribute::required(AttributeType::String).force_new())
        .with_attribute(
            "type",
            Attribute::optional(AttributeType::String)
                .force_new()
                .describe("Registry type; only `ecr` is supported."),
        )
        .with_attribute("is_private", Attribute::required(AttributeType::Bool))
        .with_attribute("endpoint", Attribute::required(AttributeType::String))
        .with_attribute(
            "provider_type",
            Attribute::optional(AttributeType::String)
                .also_computed()
                .describe("One of `helm`, `pack` or `zarf`. Defaults to `helm`."),
        )
        .with_attribute("base_content_path", Attribute::optional(AttributeType::String))
        .with_attribute(
            "credentials",
            Attribute::required(AttributeType::List)
                .sensitive()
                .describe("Single block: credential_type (`sts` or `secret`), access_key, secret_key, arn, external_id."),
        )
}

/// Build the ECR entity from the document
pub fn to_registry_ecr(d: &ResourceData) -> Result<EcrRegistry> {
    let registry_type = d.get_str("type");
    if !registry_type.is_empty() && registry_type != "ecr" {
        return Err(Error::validation(format!(
            "registry type '{}' is not supported, expected 'ecr'",
            registry_type
        )));
    }

    let provider_type = match d.get_str("provider_type") {
        "" => DEFAULT_PROVIDER_TYPE,
        p if PROVIDER_TYPES.contains(&p) => p,
        other => {
            return Err(Error::validation(format!(
                "provider_type '{}' must be one of {}",
                other,
                PROVIDER_TYPES.join(", ")
            )))
        }
    };

    Ok(EcrRegistry {
        metadata: ObjectMeta::named(d.get_str("name")),
        spec: EcrRegistrySpec {
            endpoint: d.get_str("endpoint").to_string(),
            is_private: d.get_bool("is_private"),
            provider_type: provider_type.to_string(),
            base_content_path: d.get_str("base_content_path").to_string(),
            credentials: Some(to_aws_credentials(d)?),
        },
    })
}

fn to_aws_credentials(d: &ResourceData) -> Result<AwsCredentials> {
    let Some(creds) = d.get_block("credentials") else {
        return Err(Error::validation("validation credentials: a credentials block is required"));
    };

    match str_of(creds, "credential_type") {
        "sts" => {
            let arn = str_of(creds, "arn");
            if arn.is_empty() {
                return Err(Error::validation("validation credentials: `arn` is required for sts credentials"));
            }
            Ok(AwsCredentials {
                credential_type: "sts".to_string(),
                sts: Some(AwsStsCredentials {
                    arn: arn.to_string(),
                    external_id: str_of(creds, "external_id").to_string(),
                }),
                ..Default::default()
            })
        }
        "secret" => {
            let access_key = str_of(creds, "access_key");
            let secret_key = str_of(creds, "secret_key");
            if access_key.is_empty() || secret_key.is_empty() {
                return Err(Error::validation(
                    "validation credentials: `access_key` and `secret_key` are required for secret credentials",
                ));
            }
            Ok(AwsCredentials {
                credential_type: "secret".to_string(),
                access_key: access_key.to_string(),
                secret_key: secret_key.to_string(),
                sts: None,
            })
        }
        other => Err(Error::validation(format!(
            "validation credentials: credential_type '{}' must be 'sts' or 'secret'",
            other
        ))),
    }
}

fn flatten_registry_ecr(registry: &EcrRegistry, d: &mut ResourceData) {
    d.set("name", registry.metadata.name.as_str());
    d.set("type", "ecr");
    d.set("endpoint", registry.spec.endpoint.as_str());
    d.set("is_private", registry.spec.is_private);
    d.set("provider_type", registry.spec.provider_type.as_str());
    d.set("base_content_path", registry.spec.base_content_path.as_str());
}

pub async fn resource_registry_ecr_create(client: &PaletteClient, d: &mut ResourceData) -> Diagnostics {
    let registry = match to_registry_ecr(d) {
        Ok(r) => r,
        Err(e) => return Diagnostics::from_err(&e),
    };

    match registry::create_oci_ecr_registry(client, &registry).await {
        Ok(uid) => d.set_id(uid),
        Err(e) => return Diagnostics::from_err(&e),
    }

    // The registry exists server-side now; the id must survive a failed read-back.
    match registry::get_oci_registry(client, d.id()).await {
        Ok(registry) => {
            flatten_registry_ecr(&registry, d);
            Diagnostics::new()
        }
        Err(e) => {
            tracing::warn!("ECR registry {} created but reading it back failed: {}", d.id(), e);
            Diagnostics::from_err(&e)
        }
    }
}

/// Refresh the document from the API; a registry deleted out of band clears the id
pub async fn resource_registry_ecr_read(client: &PaletteClient, d: &mut ResourceData) -> Diagnostics {
    let uid = d.id().to_string();

    match registry::get_oci_registry(client, &uid).await {
        Ok(registry) => {
            flatten_registry_ecr(&registry, d);
            Diagnostics::new()
        }
        Err(e) if e.status() == Some(404) => {
            tracing::warn!("ECR registry {} no longer exists, removing from state", uid);
            d.set_id("");
            Diagnostics::new()
        }
        Err(e) => Diagnostics::from_err(&e),
    }
}

pub async fn resource_registry_ecr_update(client: &PaletteClient, d: &mut ResourceData) -> Diagnostics {
    let registry = match to_registry_ecr(d) {
        Ok(r) => r,
        Err(e) => return Diagnostics::from_err(&e),
    };

    if let Err(e) = registry::update_ecr_registry(client, d.id(), &registry).await {
        return Diagnostics::from_err(&e);
    }

    resource_registry_ecr_read(client, d).await
}

pub async fn resource_registry_ecr_delete(client: &PaletteClient, d: &mut ResourceData) -> Diagnostics {
    match registry::delete_registry(client, d.id()).await {
        Ok(()) => {
            d.set_id("");
            Diagnostics::new()
        }
        Err(e) => Diagnostics::from_err(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> ResourceData {
        ResourceData::from_value(value).unwrap()
    }

    #[test]
    fn test_sts_registry_entity() {
        let registry = to_registry_ecr(&doc(json!({
            "name": "ecr-charts",
            "type": "ecr",
            "endpoint": "123456789.dkr.ecr.us-east-1.amazonaws.com",
            "is_private": true,
            "credentials": [{"credential_type": "sts", "arn": "arn:aws:iam::123456789:role/palette", "external_id": "x-1"}]
        })))
        .unwrap();

        assert_eq!(registry.metadata.name, "ecr-charts");
        assert_eq!(registry.spec.provider_type, "helm");
        assert!(registry.spec.is_private);
        let creds = registry.spec.credentials.unwrap();
        assert_eq!(creds.credential_type, "sts");
        assert_eq!(creds.sts.unwrap().external_id, "x-1");
        assert!(creds.access_key.is_empty());
    }

    #[test]
    fn test_secret_credentials_need_both_keys() {
        let err = to_registry_ecr(&doc(json!({
            "name": "ecr",
            "endpoint": "e",
            "credentials": [{"credential_type": "secret", "access_key": "AKIA"}]
        })))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_missing_credentials_block() {
        let err = to_registry_ecr(&doc(json!({"name": "ecr", "endpoint": "e"}))).unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn test_unknown_type_and_provider_rejected() {
        let creds = json!([{"credential_type": "secret", "access_key": "a", "secret_key": "s"}]);
        assert!(to_registry_ecr(&doc(json!({"name": "r", "type": "basic", "credentials": creds}))).is_err());
        assert!(to_registry_ecr(&doc(json!({"name": "r", "provider_type": "docker", "credentials": creds}))).is_err());
        assert_eq!(
            to_registry_ecr(&doc(json!({"name": "r", "provider_type": "zarf", "credentials": creds})))
                .unwrap()
                .spec
                .provider_type,
            "zarf"
        );
    }

    #[test]
    fn test_flatten_writes_computed_fields() {
        let registry = EcrRegistry {
            metadata: ObjectMeta::named("ecr"),
            spec: EcrRegistrySpec {
                endpoint: "e".to_string(),
                is_private: true,
                provider_type: "pack".to_string(),
                ..Default::default()
            },
        };
        let mut d = ResourceData::default();
        flatten_registry_ecr(&registry, &mut d);
        assert_eq!(d.get_str("provider_type"), "pack");
        assert!(d.get_bool("is_private"));
        assert_eq!(d.get_str("base_content_path"), "");
    }

    #[test]
    fn test_flatten_clears_stale_base_content_path() {
        let registry = EcrRegistry {
            metadata: ObjectMeta::named("ecr"),
            ..Default::default()
        };
        let mut d = doc(json!({"base_content_path": "charts/old"}));
        flatten_registry_ecr(&registry, &mut d);
        assert_eq!(d.get_str("base_content_path"), "");
    }
}
