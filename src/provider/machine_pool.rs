//! Machine pool and cloud config mappers

use super::{bool_of, i64_of, str_of};
use crate::api::models::MachinePoolDisk;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_DISK_TYPE: &str = "Standard_LRS";
pub const DEFAULT_DISK_SIZE_GB: i64 = 60;

/// Disk settings used when a machine pool leaves them out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskDefaults {
    #[serde(default = "default_disk_type")]
    pub disk_type: String,
    #[serde(default = "default_disk_size")]
    pub size_gb: i64,
}

fn default_disk_type() -> String {
    DEFAULT_DISK_TYPE.to_string()
}

fn default_disk_size() -> i64 {
    DEFAULT_DISK_SIZE_GB
}

impl Default for DiskDefaults {
    fn default() -> Self {
        Self {
            disk_type: default_disk_type(),
            size_gb: default_disk_size(),
        }
    }
}

/// SSH keys from a cloud config; exactly one of `ssh_key` and `ssh_keys` must be set
pub fn to_ssh_keys(cloud_config: &Map<String, Value>) -> Result<Vec<String>> {
    let ssh_key = str_of(cloud_config, "ssh_key");
    let ssh_keys: Vec<&str> = cloud_config
        .get("ssh_keys")
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    match (ssh_key.is_empty(), ssh_keys.is_empty()) {
        (false, true) => Ok(vec![ssh_key.trim().to_string()]),
        (true, false) => Ok(ssh_keys.iter().map(|k| k.trim().to_string()).collect()),
        _ => Err(Error::validation(
            "validation ssh_key: Kindly specify any one attribute ssh_key or ssh_keys",
        )),
    }
}

/// `ntp_servers` set, empty when absent
pub fn to_ntp_servers(cloud_config: &Map<String, Value>) -> Vec<String> {
    cloud_config
        .get("ntp_servers")
        .and_then(Value::as_array)
        .map(|servers| {
            servers
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Write `control_plane` and, for worker pools only, `node_repave_interval`
pub fn flatten_control_plane_and_repave_interval(
    is_control_plane: Option<bool>,
    oi: &mut Map<String, Value>,
    node_repave_interval: i32,
) {
    if let Some(is_control_plane) = is_control_plane {
        oi.insert("control_plane".to_string(), Value::Bool(is_control_plane));
        if !is_control_plane {
            oi.insert(
                "node_repave_interval".to_string(),
                Value::from(node_repave_interval),
            );
        }
    }
}

/// A control plane pool must not carry a repave interval
pub fn validation_node_repave_interval_for_control_plane(node_repave_interval: i64) -> Result<()> {
    if node_repave_interval != 0 {
        return Err(Error::validation(format!(
            "Validation error: The `node_repave_interval` attribute is not applicable for the control plane. Attempted value: {}.",
            node_repave_interval
        )));
    }
    Ok(())
}

/// Repave interval to send for a machine pool
pub fn to_node_repave_interval(pool: &Map<String, Value>) -> Result<i32> {
    let interval = i64_of(pool, "node_repave_interval");

    if bool_of(pool, "control_plane") {
        validation_node_repave_interval_for_control_plane(interval)?;
        return Ok(0);
    }

    i32::try_from(interval).map_err(|_| {
        Error::validation(format!(
            "node_repave_interval {} is out of range",
            interval
        ))
    })
}

/// Disk of a machine pool, filling gaps from `defaults`
pub fn to_machine_pool_disk(pool: &Map<String, Value>, defaults: &DiskDefaults) -> MachinePoolDisk {
    let disk = pool
        .get("disk")
        .and_then(Value::as_array)
        .and_then(|d| d.first())
        .and_then(Value::as_object);

    let Some(disk) = disk else {
        return MachinePoolDisk {
            size_gb: defaults.size_gb,
            disk_type: defaults.disk_type.clone(),
        };
    };

    let size_gb = match i64_of(disk, "size_gb") {
        0 => defaults.size_gb,
        size => size,
    };
    let disk_type = match str_of(disk, "type") {
        "" => defaults.disk_type.clone(),
        t => t.to_string(),
    };

    MachinePoolDisk { size_gb, disk_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_ssh_key_single() {
        let keys = to_ssh_keys(&map(json!({"ssh_key": "a"}))).unwrap();
        assert_eq!(keys, vec!["a"]);
    }

    #[test]
    fn test_ssh_keys_plural_trimmed() {
        let keys = to_ssh_keys(&map(json!({"ssh_key": "", "ssh_keys": [" b", "c \n"]}))).unwrap();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_ssh_keys_both_empty() {
        let err = to_ssh_keys(&map(json!({"ssh_key": "", "ssh_keys": []}))).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("ssh_key or ssh_keys"));
    }

    #[test]
    fn test_ssh_keys_both_set() {
        let err = to_ssh_keys(&map(json!({"ssh_key": "a", "ssh_keys": ["b"]}))).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_ntp_servers() {
        assert_eq!(
            to_ntp_servers(&map(json!({"ntp_servers": ["ntp1.example.com", "ntp2.example.com"]}))),
            vec!["ntp1.example.com", "ntp2.example.com"]
        );
        assert!(to_ntp_servers(&map(json!({}))).is_empty());
    }

    #[test]
    fn test_flatten_control_plane_omits_repave() {
        let mut oi = Map::new();
        flatten_control_plane_and_repave_interval(Some(true), &mut oi, 5);
        assert_eq!(Value::Object(oi), json!({"control_plane": true}));
    }

    #[test]
    fn test_flatten_worker_keeps_repave() {
        let mut oi = Map::new();
        flatten_control_plane_and_repave_interval(Some(false), &mut oi, 5);
        assert_eq!(
            Value::Object(oi),
            json!({"control_plane": false, "node_repave_interval": 5})
        );
    }

    #[test]
    fn test_flatten_without_flag_writes_nothing() {
        let mut oi = Map::new();
        flatten_control_plane_and_repave_interval(None, &mut oi, 5);
        assert!(oi.is_empty());
    }

    #[test]
    fn test_repave_validation() {
        assert!(validation_node_repave_interval_for_control_plane(0).is_ok());
        let err = validation_node_repave_interval_for_control_plane(7).unwrap_err();
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains("node_repave_interval"));
    }

    #[test]
    fn test_pool_repave_interval() {
        assert_eq!(to_node_repave_interval(&map(json!({"node_repave_interval": 90}))).unwrap(), 90);
        assert_eq!(
            to_node_repave_interval(&map(json!({"control_plane": true}))).unwrap(),
            0
        );
        assert!(to_node_repave_interval(&map(json!({"control_plane": true, "node_repave_interval": 30}))).is_err());
    }

    #[test]
    fn test_disk_defaults_applied() {
        let defaults = DiskDefaults::default();
        let disk = to_machine_pool_disk(&map(json!({})), &defaults);
        assert_eq!(disk.size_gb, 60);
        assert_eq!(disk.disk_type, "Standard_LRS");

        let custom = DiskDefaults {
            disk_type: "Premium_LRS".to_string(),
            size_gb: 120,
        };
        let disk = to_machine_pool_disk(&map(json!({"disk": [{"size_gb": 0}]})), &custom);
        assert_eq!(disk.size_gb, 120);
        assert_eq!(disk.disk_type, "Premium_LRS");
    }

    #[test]
    fn test_disk_explicit_values() {
        let disk = to_machine_pool_disk(
            &map(json!({"disk": [{"size_gb": 200, "type": "StandardSSD_LRS"}]})),
            &DiskDefaults::default(),
        );
        assert_eq!(disk.size_gb, 200);
        assert_eq!(disk.disk_type, "StandardSSD_LRS");
    }
}
