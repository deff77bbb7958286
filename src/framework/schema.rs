use serde_json::{Map, Value};

use super::Diagnostics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Bool,
    Int64,
    Float64,
    StringSet,
    Int64Set,
    /// Computed list of objects, never sent to the server.
    ObjectList,
}

impl AttributeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int64 => "int64",
            Self::Float64 => "float64",
            Self::StringSet => "set(string)",
            Self::Int64Set => "set(int64)",
            Self::ObjectList => "list(object)",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Int64 => value.is_i64(),
            Self::Float64 => value.is_number(),
            Self::StringSet => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Self::Int64Set => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_i64)),
            Self::ObjectList => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub required: bool,
    /// The server fills the value in when the plan leaves it unknown.
    pub computed: bool,
    /// Reported by the server only; never configurable.
    pub read_only: bool,
    pub requires_replace: bool,
    pub description: &'static str,
    /// Subtypes that accept the attribute; empty means every subtype.
    pub supported_by: &'static [&'static str],
    /// Subtypes that must set the attribute.
    pub required_by: &'static [&'static str],
}

impl Attribute {
    pub const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            computed: false,
            read_only: false,
            requires_replace: false,
            description: "",
            supported_by: &[],
            required_by: &[],
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, AttributeKind::String)
    }

    pub const fn bool(name: &'static str) -> Self {
        Self::new(name, AttributeKind::Bool)
    }

    pub const fn int64(name: &'static str) -> Self {
        Self::new(name, AttributeKind::Int64)
    }

    pub const fn string_set(name: &'static str) -> Self {
        Self::new(name, AttributeKind::StringSet)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub const fn read_only(mut self) -> Self {
        self.computed = true;
        self.read_only = true;
        self
    }

    pub const fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn supported_by(mut self, types: &'static [&'static str]) -> Self {
        self.supported_by = types;
        self
    }

    pub const fn required_by(mut self, types: &'static [&'static str]) -> Self {
        self.required_by = types;
        self
    }

    /// Name of the attribute in the config API.
    pub fn api_path(&self) -> String {
        self.name.replace('_', "-")
    }

    pub fn supports(&self, type_: &str) -> bool {
        self.supported_by.is_empty() || self.supported_by.contains(&type_)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub description: &'static str,
    pub types: &'static [&'static str],
    pub attributes: Vec<Attribute>,
}

impl Schema {
    /// Builds a schema with the attributes every config object carries.
    pub fn new(
        description: &'static str,
        types: &'static [&'static str],
        attributes: impl IntoIterator<Item = Attribute>,
    ) -> Self {
        let mut all = common_attributes();
        all.extend(attributes);
        Self {
            description,
            types,
            attributes: all,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Checks a JSON configuration object against the schema.
    pub fn validate_config(&self, config: &Value, diags: &mut Diagnostics) {
        let Some(object) = config.as_object() else {
            diags.add_error("Invalid configuration", "configuration must be a JSON object");
            return;
        };

        for (key, value) in object {
            match self.attribute(key) {
                None => diags.add_error(
                    "Unsupported attribute",
                    format!("attribute '{key}' is not part of this resource's schema"),
                ),
                Some(attribute) if attribute.read_only && !value.is_null() => {
                    diags.add_error(
                        "Read-only attribute",
                        format!("attribute '{key}' is computed and cannot be configured"),
                    );
                }
                Some(attribute) if !value.is_null() && !attribute.kind.accepts(value) => {
                    diags.add_error(
                        "Invalid attribute value",
                        format!("attribute '{key}' must be a {}", attribute.kind.label()),
                    );
                }
                Some(_) => {}
            }
        }

        for attribute in self.attributes.iter().filter(|a| a.required) {
            if is_absent(object, attribute.name) {
                diags.add_error(
                    "Missing required attribute",
                    format!("attribute '{}' is required", attribute.name),
                );
            }
        }

        let Some(type_) = object.get("type").and_then(Value::as_str) else {
            return;
        };
        if !self.types.contains(&type_) {
            diags.add_error(
                "Invalid resource type",
                format!(
                    "type '{type_}' is not one of: {}",
                    self.types.join(", ")
                ),
            );
            return;
        }
        self.validate_type_attributes(object, type_, diags);
    }

    fn validate_type_attributes(&self, object: &Map<String, Value>, type_: &str, diags: &mut Diagnostics) {
        for attribute in &self.attributes {
            let set = !is_absent(object, attribute.name);
            if set && !attribute.supports(type_) {
                diags.add_error(
                    "Invalid attribute for type",
                    format!(
                        "attribute '{}' is not supported by type '{type_}'",
                        attribute.name
                    ),
                );
            }
            if !set && attribute.required_by.contains(&type_) {
                diags.add_error(
                    "Missing required attribute",
                    format!(
                        "attribute '{}' is required when type is '{type_}'",
                        attribute.name
                    ),
                );
            }
        }
    }
}

fn is_absent(object: &Map<String, Value>, name: &str) -> bool {
    object.get(name).is_none_or(Value::is_null)
}

fn common_attributes() -> Vec<Attribute> {
    vec![
        Attribute::string("id")
            .read_only()
            .describe("Identifier of the object, equal to its name."),
        Attribute::string("name")
            .required()
            .requires_replace()
            .describe("Name of the configuration object."),
        Attribute::string("type")
            .required()
            .requires_replace()
            .describe("Subtype of the configuration object."),
        Attribute::string_set("notifications")
            .read_only()
            .describe("Notifications returned by the config API."),
        Attribute::new("required_actions", AttributeKind::ObjectList)
            .read_only()
            .describe("Actions required before the change takes effect."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TYPES: &[&str] = &["delay-bind", "lock-account"];

    fn schema() -> Schema {
        Schema::new(
            "test",
            TYPES,
            [
                Attribute::string("description"),
                Attribute::string("delay")
                    .supported_by(&["delay-bind"])
                    .required_by(&["delay-bind"]),
                Attribute::bool("allow_blocking_delay").supported_by(&["delay-bind"]),
            ],
        )
    }

    fn errors(config: Value) -> Vec<String> {
        let mut diags = Diagnostics::new();
        schema().validate_config(&config, &mut diags);
        diags.errors().map(|d| d.detail.clone()).collect()
    }

    #[test]
    fn test_valid_config() {
        assert!(errors(json!({"name": "a", "type": "delay-bind", "delay": "1 s"})).is_empty());
        assert!(errors(json!({"name": "a", "type": "lock-account", "delay": null})).is_empty());
    }

    #[test]
    fn test_unknown_attribute() {
        let errs = errors(json!({"name": "a", "type": "lock-account", "color": "red"}));
        assert_eq!(errs, vec!["attribute 'color' is not part of this resource's schema"]);
    }

    #[test]
    fn test_attribute_not_supported_by_type() {
        let errs = errors(json!({"name": "a", "type": "lock-account", "allow_blocking_delay": true}));
        assert_eq!(
            errs,
            vec!["attribute 'allow_blocking_delay' is not supported by type 'lock-account'"]
        );
    }

    #[test]
    fn test_type_requires_attribute() {
        let errs = errors(json!({"name": "a", "type": "delay-bind"}));
        assert_eq!(
            errs,
            vec!["attribute 'delay' is required when type is 'delay-bind'"]
        );
    }

    #[test]
    fn test_missing_name_and_bad_type() {
        let errs = errors(json!({"type": "nope"}));
        assert_eq!(errs.len(), 2);
        assert!(errs[0].contains("'name' is required"));
        assert!(errs[1].contains("type 'nope' is not one of: delay-bind, lock-account"));
    }

    #[test]
    fn test_kind_mismatch_and_read_only() {
        let errs = errors(json!({
            "name": "a",
            "type": "delay-bind",
            "delay": 5,
            "id": "a"
        }));
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().any(|e| e.contains("'delay' must be a string")));
        assert!(errs.iter().any(|e| e.contains("'id' is computed")));
    }

    #[test]
    fn test_api_path_is_kebab_case() {
        let schema = schema();
        let attribute = schema.attribute("allow_blocking_delay").unwrap();
        assert_eq!(attribute.api_path(), "allow-blocking-delay");
    }
}
