//! Palette v1 API entities
//!
//! Only the fields the provider reads or writes are modeled; unknown fields
//! in responses are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Object metadata carried by every Palette entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Anything with object metadata can be matched by name or UID
pub trait HasMetadata {
    fn metadata(&self) -> &ObjectMeta;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn uid(&self) -> &str {
        &self.metadata().uid
    }
}

macro_rules! impl_has_metadata {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HasMetadata for $ty {
                fn metadata(&self) -> &ObjectMeta {
                    &self.metadata
                }
            }
        )*
    };
}

/// Envelope of every list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Body of create responses
#[derive(Debug, Clone, Deserialize)]
pub struct Uid {
    pub uid: String,
}

// =============================================================================
// Registries
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRegistrySpec {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackRegistry {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PackRegistrySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmRegistrySpec {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HelmRegistry {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: HelmRegistrySpec,
}

/// Spec of an entry in the OCI registries summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciRegistrySpec {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default)]
    pub registry_type: String,
    #[serde(default)]
    pub is_private: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OciRegistry {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: OciRegistrySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsStsCredentials {
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub external_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    /// `secret` or `sts`
    #[serde(default)]
    pub credential_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub access_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sts: Option<AwsStsCredentials>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcrRegistrySpec {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_content_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<AwsCredentials>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcrRegistry {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: EcrRegistrySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicOciAuth {
    /// `basic` or `noAuth`
    #[serde(default, rename = "type")]
    pub auth_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicOciRegistrySpec {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub provider_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_content_path: String,
    #[serde(default)]
    pub auth: BasicOciAuth,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicOciRegistry {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: BasicOciRegistrySpec,
}

impl_has_metadata!(
    PackRegistry,
    HelmRegistry,
    OciRegistry,
    EcrRegistry,
    BasicOciRegistry,
);

// =============================================================================
// Cluster configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsPatchConfig {
    #[serde(default)]
    pub patch_on_boot: bool,
    #[serde(default)]
    pub schedule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_demand_patch_after: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineManagementConfig {
    #[serde(default)]
    pub os_patch_config: OsPatchConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAllocation {
    #[serde(default)]
    pub cpu_cores: f64,
    #[serde(default, rename = "memoryMiB")]
    pub memory_mib: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNamespaceSpec {
    #[serde(default)]
    pub is_regex: bool,
    #[serde(default)]
    pub resource_allocation: ResourceAllocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterNamespace {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ClusterNamespaceSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RbacRoleRef {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RbacSubject {
    #[serde(default, rename = "type")]
    pub subject_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RbacBinding {
    /// `RoleBinding` or `ClusterRoleBinding`
    #[serde(default, rename = "type")]
    pub binding_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(default)]
    pub role: RbacRoleRef,
    #[serde(default)]
    pub subjects: Vec<RbacSubject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterRbacSpec {
    #[serde(default)]
    pub bindings: Vec<RbacBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterRbac {
    #[serde(default)]
    pub spec: ClusterRbacSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterResources {
    #[serde(default)]
    pub namespaces: Vec<ClusterNamespace>,
    #[serde(default)]
    pub rbacs: Vec<ClusterRbac>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfig {
    #[serde(default)]
    pub external_traffic_policy: String,
    #[serde(default)]
    pub load_balancer_source_ranges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostClusterEndpointConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ingress_host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_config: Option<LoadBalancerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostClusterEndpoint {
    /// `Ingress` or `LoadBalancer`
    #[serde(default, rename = "type")]
    pub endpoint_type: String,
    #[serde(default)]
    pub config: HostClusterEndpointConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostClusterConfig {
    #[serde(default)]
    pub is_host_cluster: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_endpoint: Option<HostClusterEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLocation {
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub region_code: String,
    #[serde(default)]
    pub region_name: String,
    #[serde(default)]
    pub geo_loc: GeoLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfigEntity {
    #[serde(default)]
    pub cluster_meta_attribute: String,
    #[serde(default)]
    pub machine_management_config: MachineManagementConfig,
    #[serde(default)]
    pub resources: ClusterResources,
    #[serde(default)]
    pub host_cluster_config: HostClusterConfig,
    #[serde(default)]
    pub location: ClusterLocation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MachinePoolDisk {
    #[serde(default, rename = "sizeGB")]
    pub size_gb: i64,
    #[serde(default, rename = "type")]
    pub disk_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_tolerates_missing_items() {
        let list: ListResponse<PackRegistry> = serde_json::from_value(json!({})).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_ecr_registry_wire_names() {
        let registry = EcrRegistry {
            metadata: ObjectMeta::named("ecr-1"),
            spec: EcrRegistrySpec {
                endpoint: "123.dkr.ecr.us-east-1.amazonaws.com".to_string(),
                is_private: true,
                provider_type: "helm".to_string(),
                base_content_path: String::new(),
                credentials: Some(AwsCredentials {
                    credential_type: "sts".to_string(),
                    sts: Some(AwsStsCredentials {
                        arn: "arn:aws:iam::123:role/r".to_string(),
                        external_id: "ext".to_string(),
                    }),
                    ..Default::default()
                }),
            },
        };

        let value = serde_json::to_value(&registry).unwrap();
        assert_eq!(value["metadata"]["name"], "ecr-1");
        assert!(value["metadata"].get("uid").is_none());
        assert_eq!(value["spec"]["isPrivate"], true);
        assert_eq!(value["spec"]["providerType"], "helm");
        assert_eq!(value["spec"]["credentials"]["credentialType"], "sts");
        assert_eq!(value["spec"]["credentials"]["sts"]["externalId"], "ext");
        assert!(value["spec"]["credentials"].get("accessKey").is_none());
    }

    #[test]
    fn test_has_metadata_accessors() {
        let registry: OciRegistry = serde_json::from_value(json!({
            "metadata": {"name": "oci-1", "uid": "u-1"},
            "spec": {"endpoint": "e", "registryType": "ecr"}
        }))
        .unwrap();
        assert_eq!(registry.name(), "oci-1");
        assert_eq!(registry.uid(), "u-1");
        assert_eq!(registry.spec.registry_type, "ecr");
    }
}
