//! Tag <-> label mapping

use crate::schema::ResourceData;
use serde_json::Value;
use std::collections::BTreeMap;

/// Label value stored for a tag written without a value
pub const TAG_SENTINEL: &str = "spectro__tag";

/// Turn the `tags` set (`"key:value"` or bare `"key"`) into labels
///
/// The value is the text between the first and the second colon, so
/// `"a:b:c"` yields `a -> b`.
pub fn to_additional_labels(d: &ResourceData) -> BTreeMap<String, String> {
    d.get_list("tags")
        .iter()
        .filter_map(Value::as_str)
        .map(tag_to_label)
        .collect()
}

fn tag_to_label(tag: &str) -> (String, String) {
    let mut parts = tag.split(':');
    match (parts.next(), parts.next()) {
        (Some(key), Some(value)) => (key.to_string(), value.to_string()),
        _ => (tag.to_string(), TAG_SENTINEL.to_string()),
    }
}

/// Inverse of [`to_additional_labels`], for writing labels back as tags
pub fn flatten_tags(labels: &BTreeMap<String, String>) -> Vec<String> {
    labels
        .iter()
        .map(|(key, value)| {
            if value == TAG_SENTINEL {
                key.clone()
            } else {
                format!("{}:{}", key, value)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tags_with_and_without_values() {
        let d = ResourceData::from_value(json!({"tags": ["env:prod", "critical"]})).unwrap();
        let labels = to_additional_labels(&d);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels["env"], "prod");
        assert_eq!(labels["critical"], "spectro__tag");
    }

    #[test]
    fn test_value_stops_at_second_colon() {
        assert_eq!(tag_to_label("a:b:c"), ("a".to_string(), "b".to_string()));
        assert_eq!(tag_to_label("owner:"), ("owner".to_string(), String::new()));
    }

    #[test]
    fn test_no_tags() {
        let d = ResourceData::default();
        assert!(to_additional_labels(&d).is_empty());
    }

    #[test]
    fn test_flatten_tags() {
        let mut labels = BTreeMap::new();
        labels.insert("env".to_string(), "prod".to_string());
        labels.insert("critical".to_string(), TAG_SENTINEL.to_string());
        assert_eq!(flatten_tags(&labels), vec!["critical", "env:prod"]);
    }
}
