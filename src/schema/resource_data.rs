//! Configuration document handed to lifecycle callbacks

use crate::error::{Error, Result};
use serde_json::{Map, Value};

static NULL: Value = Value::Null;

/// Desired and computed state of one resource instance
///
/// Values are plain JSON; sets and lists are arrays, nested blocks are
/// arrays of objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    id: String,
    values: Map<String, Value>,
}

/// Zero values count as "not set", like an unset attribute
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

impl ResourceData {
    pub fn new(values: Map<String, Value>) -> Self {
        let mut data = Self {
            id: String::new(),
            values,
        };
        if let Some(Value::String(id)) = data.values.remove("id") {
            data.id = id;
        }
        data
    }

    /// Build a document from a JSON object; an `id` key becomes the resource id
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::validation(format!(
                "configuration document must be an object, got {}",
                other
            ))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Set the resource id; an empty id marks the resource as gone
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// The value of `key` if it is set to something other than its zero value
    pub fn get_ok(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !is_zero(v))
    }

    /// The value of `key`, `Null` when absent
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get_str(&self, key: &str) -> &str {
        self.get(key).as_str().unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).as_bool().unwrap_or_default()
    }

    pub fn get_i64(&self, key: &str) -> i64 {
        self.get(key).as_i64().unwrap_or_default()
    }

    pub fn get_list(&self, key: &str) -> &[Value] {
        self.get(key).as_array().map(Vec::as_slice).unwrap_or_default()
    }

    /// First element of a single-item nested block
    pub fn get_block(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get_list(key).first().and_then(Value::as_object)
    }

    /// Full state including the id, as stored by the host
    pub fn to_state(&self) -> Value {
        let mut state = self.values.clone();
        state.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ResourceData {
        ResourceData::from_value(value).unwrap()
    }

    #[test]
    fn test_get_ok_skips_zero_values() {
        let d = doc(json!({"name": "", "count": 0, "enabled": false, "tags": [], "ok": "x"}));
        assert!(d.get_ok("name").is_none());
        assert!(d.get_ok("count").is_none());
        assert!(d.get_ok("enabled").is_none());
        assert!(d.get_ok("tags").is_none());
        assert!(d.get_ok("missing").is_none());
        assert_eq!(d.get_ok("ok"), Some(&json!("x")));
    }

    #[test]
    fn test_id_is_lifted_out_of_values() {
        let d = doc(json!({"id": "u-1", "name": "r"}));
        assert_eq!(d.id(), "u-1");
        assert!(d.get("id").is_null());
        assert_eq!(d.to_state(), json!({"id": "u-1", "name": "r"}));
    }

    #[test]
    fn test_typed_getters_default() {
        let d = doc(json!({"n": 3, "b": true, "s": "v", "l": ["a"]}));
        assert_eq!(d.get_i64("n"), 3);
        assert!(d.get_bool("b"));
        assert_eq!(d.get_str("s"), "v");
        assert_eq!(d.get_list("l").len(), 1);
        assert_eq!(d.get_str("absent"), "");
        assert!(d.get_list("absent").is_empty());
    }

    #[test]
    fn test_set_and_set_id() {
        let mut d = ResourceData::default();
        d.set("name", "ecr");
        d.set_id("u-9");
        assert_eq!(d.get_str("name"), "ecr");
        assert_eq!(d.id(), "u-9");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(ResourceData::from_value(json!([1, 2])).is_err());
        assert_eq!(ResourceData::from_value(Value::Null).unwrap(), ResourceData::default());
    }
}
