//! Cluster configuration mappers
//!
//! Build the cluster config entity sent with every cluster create/update.
//! Each sub-mapper reads its own attributes and falls back to the zero
//! value, so none of them can fail.

use super::{f64_of, str_of};
use crate::api::models::{
    ClusterConfigEntity, ClusterLocation, ClusterNamespace, ClusterNamespaceSpec, ClusterRbac,
    ClusterRbacSpec, ClusterResources, GeoLocation, HostClusterConfig, HostClusterEndpoint,
    HostClusterEndpointConfig, LoadBalancerConfig, MachineManagementConfig, ObjectMeta,
    OsPatchConfig, RbacBinding, RbacRoleRef, RbacSubject, ResourceAllocation,
};
use crate::schema::ResourceData;
use serde_json::{Map, Value};

pub fn to_cluster_config(d: &ResourceData) -> ClusterConfigEntity {
    ClusterConfigEntity {
        cluster_meta_attribute: to_cluster_meta_attribute(d),
        machine_management_config: to_machine_management_config(d),
        resources: to_cluster_resource_config(d),
        host_cluster_config: to_cluster_host_configs(d),
        location: to_cluster_location_configs(d),
    }
}

pub fn to_cluster_meta_attribute(d: &ResourceData) -> String {
    d.get_ok("cluster_meta_attribute")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn to_machine_management_config(d: &ResourceData) -> MachineManagementConfig {
    MachineManagementConfig {
        os_patch_config: to_os_patch_config(d),
    }
}

pub fn to_os_patch_config(d: &ResourceData) -> OsPatchConfig {
    OsPatchConfig {
        patch_on_boot: d.get_bool("os_patch_on_boot"),
        schedule: d.get_str("os_patch_schedule").to_string(),
        on_demand_patch_after: d
            .get_ok("os_patch_after")
            .and_then(Value::as_str)
            .map(String::from),
    }
}

pub fn to_cluster_resource_config(d: &ResourceData) -> ClusterResources {
    ClusterResources {
        namespaces: to_cluster_namespaces(d),
        rbacs: to_cluster_rbacs(d),
    }
}

/// `namespaces` blocks with their resource quota
pub fn to_cluster_namespaces(d: &ResourceData) -> Vec<ClusterNamespace> {
    d.get_list("namespaces")
        .iter()
        .filter_map(Value::as_object)
        .map(to_cluster_namespace)
        .collect()
}

fn to_cluster_namespace(ns: &Map<String, Value>) -> ClusterNamespace {
    let allocation = ns
        .get("resource_allocation")
        .and_then(Value::as_object)
        .map(|quota| ResourceAllocation {
            cpu_cores: f64_of(quota, "cpu_cores"),
            memory_mib: f64_of(quota, "memory_MiB"),
        })
        .unwrap_or_default();

    ClusterNamespace {
        metadata: ObjectMeta::named(str_of(ns, "name")),
        spec: ClusterNamespaceSpec {
            is_regex: false,
            resource_allocation: allocation,
        },
    }
}

/// `cluster_rbac_binding` blocks, one RBAC entity per binding
pub fn to_cluster_rbacs(d: &ResourceData) -> Vec<ClusterRbac> {
    d.get_list("cluster_rbac_binding")
        .iter()
        .filter_map(Value::as_object)
        .map(|binding| ClusterRbac {
            spec: ClusterRbacSpec {
                bindings: vec![to_rbac_binding(binding)],
            },
        })
        .collect()
}

fn to_rbac_binding(binding: &Map<String, Value>) -> RbacBinding {
    let role = binding
        .get("role")
        .and_then(Value::as_object)
        .map(|role| RbacRoleRef {
            kind: str_of(role, "kind").to_string(),
            name: str_of(role, "name").to_string(),
        })
        .unwrap_or_default();

    let subjects = binding
        .get("subjects")
        .and_then(Value::as_array)
        .map(|subjects| {
            subjects
                .iter()
                .filter_map(Value::as_object)
                .map(|s| RbacSubject {
                    subject_type: str_of(s, "type").to_string(),
                    name: str_of(s, "name").to_string(),
                    namespace: str_of(s, "namespace").to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    RbacBinding {
        binding_type: str_of(binding, "type").to_string(),
        namespace: str_of(binding, "namespace").to_string(),
        role,
        subjects,
    }
}

/// `host_config` block; its presence marks the cluster as a host cluster
pub fn to_cluster_host_configs(d: &ResourceData) -> HostClusterConfig {
    let Some(host) = d.get_block("host_config") else {
        return HostClusterConfig::default();
    };

    let endpoint_type = str_of(host, "host_endpoint_type");
    let load_balancer_config = (endpoint_type == "LoadBalancer").then(|| LoadBalancerConfig {
        external_traffic_policy: str_of(host, "external_traffic_policy").to_string(),
        load_balancer_source_ranges: str_of(host, "load_balancer_source_ranges")
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect(),
    });

    HostClusterConfig {
        is_host_cluster: true,
        cluster_endpoint: Some(HostClusterEndpoint {
            endpoint_type: endpoint_type.to_string(),
            config: HostClusterEndpointConfig {
                ingress_host: str_of(host, "ingress_host").to_string(),
                load_balancer_config,
            },
        }),
    }
}

/// `location_config` block
pub fn to_cluster_location_configs(d: &ResourceData) -> ClusterLocation {
    let Some(location) = d.get_block("location_config") else {
        return ClusterLocation::default();
    };

    ClusterLocation {
        country_code: str_of(location, "country_code").to_string(),
        country_name: str_of(location, "country_name").to_string(),
        region_code: str_of(location, "region_code").to_string(),
        region_name: str_of(location, "region_name").to_string(),
        geo_loc: GeoLocation {
            latitude: f64_of(location, "latitude"),
            longitude: f64_of(location, "longitude"),
        },
    }
}
