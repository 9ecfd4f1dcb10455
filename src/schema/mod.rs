//! Declarative framework contract
//!
//! The host (the CLI, or a plugin server) parses user configuration into a
//! [`ResourceData`] document, validates it against a [`Resource`] schema and
//! invokes a lifecycle callback, which answers with [`Diagnostics`].

mod diag;
mod resource_data;

pub use diag::{Diagnostic, Diagnostics, Severity};
pub use resource_data::{is_zero, ResourceData};

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Int,
    List,
    Set,
    Map,
}

/// One attribute of a resource or data source schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub ty: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    /// Changing the value replaces the remote object
    pub force_new: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Attribute {
    fn new(ty: AttributeType) -> Self {
        Self {
            ty,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            sensitive: false,
            description: String::new(),
        }
    }

    pub fn required(ty: AttributeType) -> Self {
        Self {
            required: true,
            ..Self::new(ty)
        }
    }

    pub fn optional(ty: AttributeType) -> Self {
        Self {
            optional: true,
            ..Self::new(ty)
        }
    }

    pub fn also_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    fn type_matches(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self.ty, value) {
            (_, Value::Null) => true,
            (AttributeType::String, Value::String(_)) => true,
            (AttributeType::Bool, Value::Bool(_)) => true,
            (AttributeType::Int, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (AttributeType::List | AttributeType::Set, Value::Array(_)) => true,
            (AttributeType::Map, Value::Object(_)) => true,
            _ => false,
        }
    }
}

/// Schema of a resource or data source
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resource {
    pub description: String,
    pub schema: BTreeMap<&'static str, Attribute>,
}

impl Resource {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            schema: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.schema.insert(name, attribute);
        self
    }

    /// Check required attributes and value types before a callback runs
    pub fn validate(&self, d: &ResourceData) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for (name, attribute) in &self.schema {
            if attribute.required && d.get_ok(name).is_none() && !d.get(name).is_boolean() {
                diags.push(
                    Diagnostic::error(format!("The argument \"{}\" is required, but no definition was found.", name))
                        .with_attribute(name),
                );
                continue;
            }
            if !attribute.type_matches(d.get(name)) {
                diags.push(
                    Diagnostic::error(format!("Inappropriate value for attribute \"{}\": expected {:?}.", name, attribute.ty))
                        .with_attribute(name),
                );
            }
        }

        diags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Resource {
        Resource::new("test")
            .with_attribute("id", Attribute::optional(AttributeType::String).also_computed())
            .with_attribute("name", Attribute::required(AttributeType::String).force_new())
            .with_attribute("is_private", Attribute::optional(AttributeType::Bool))
    }

    #[test]
    fn test_missing_required_attribute() {
        let d = ResourceData::from_value(json!({})).unwrap();
        let diags = schema().validate(&d);
        assert!(diags.has_error());
        assert_eq!(diags.iter().next().unwrap().attribute.as_deref(), Some("name"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let d = ResourceData::from_value(json!({"name": "r", "is_private": "yes"})).unwrap();
        let diags = schema().validate(&d);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().unwrap().attribute.as_deref(), Some("is_private"));
    }

    #[test]
    fn test_valid_document() {
        let d = ResourceData::from_value(json!({"name": "r", "is_private": true})).unwrap();
        assert!(schema().validate(&d).is_empty());
    }
}
