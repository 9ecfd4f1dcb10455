//! Provider handlers
//!
//! Lifecycle callbacks for the registry data source and the ECR registry
//! resource, and the field mappers shared with cluster resources.
//!
//! Every callback takes the client and the resource's document and answers
//! with diagnostics; errors never escape as `Err`.

pub mod cluster_config;
pub mod data_source_registry;
pub mod labels;
pub mod machine_pool;
pub mod resource_registry_ecr;

use serde_json::{Map, Value};

pub use cluster_config::to_cluster_config;
pub use data_source_registry::{data_source_registry, data_source_registry_read};
pub use labels::{flatten_tags, to_additional_labels};
pub use machine_pool::{
    flatten_control_plane_and_repave_interval, to_machine_pool_disk, to_ntp_servers, to_ssh_keys,
    validation_node_repave_interval_for_control_plane, DiskDefaults,
};
pub use resource_registry_ecr::{
    resource_registry_ecr, resource_registry_ecr_create, resource_registry_ecr_delete,
    resource_registry_ecr_read, resource_registry_ecr_update,
};

pub(crate) fn str_of<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn bool_of(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or_default()
}

/// Integral floats such as `60.0` count as integers
pub(crate) fn i64_of(map: &Map<String, Value>, key: &str) -> i64 {
    match map.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    }
}

/// Numbers may arrive as strings from map-typed attributes
pub(crate) fn f64_of(map: &Map<String, Value>, key: &str) -> f64 {
    match map.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_helpers_accept_strings() {
        let map = json!({"a": "1.5", "b": 2, "c": " 7 ", "d": "x"});
        let map = map.as_object().unwrap();
        assert_eq!(f64_of(map, "a"), 1.5);
        assert_eq!(f64_of(map, "b"), 2.0);
        assert_eq!(i64_of(map, "c"), 7);
        assert_eq!(i64_of(map, "d"), 0);
        assert_eq!(str_of(map, "missing"), "");
    }

    #[test]
    fn test_i64_accepts_integral_floats() {
        let map = json!({"whole": 60.0, "fraction": 60.5});
        let map = map.as_object().unwrap();
        assert_eq!(i64_of(map, "whole"), 60);
        assert_eq!(i64_of(map, "fraction"), 0);
    }
}
