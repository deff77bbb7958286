use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ConfigApiError;
use crate::operations::Operation;

pub const SCHEMA_URN_PREFIX: &str = "urn:pingidentity:schemas:configuration:2.0:";

/// URN identifying an object type and subtype, e.g.
/// `urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:delay-bind`.
pub fn schema_urn(object: &str, type_: &str) -> String {
    format!("{SCHEMA_URN_PREFIX}{object}:{type_}")
}

/// Extracts the subtype of `object` from a response's `schemas` array.
pub fn config_type<'a>(body: &'a Value, object: &str) -> Result<&'a str, ConfigApiError> {
    let prefix = format!("{SCHEMA_URN_PREFIX}{object}:");
    let schemas = body
        .get("schemas")
        .and_then(Value::as_array)
        .ok_or_else(|| ConfigApiError::invalid_response("response has no schemas"))?;

    schemas
        .iter()
        .filter_map(Value::as_str)
        .find_map(|urn| urn.strip_prefix(prefix.as_str()))
        .ok_or_else(|| {
            ConfigApiError::invalid_response(format!("response is not a {object} object"))
        })
}

pub fn decode_body<T: DeserializeOwned>(body: Value) -> Result<T, ConfigApiError> {
    serde_json::from_value(body)
        .map_err(|e| ConfigApiError::invalid_response(format!("Failed to parse object: {e}")))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messages {
    #[serde(default)]
    pub notifications: Option<Vec<String>>,
    #[serde(default)]
    pub required_actions: Option<Vec<RequiredAction>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredAction {
    pub property: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub synopsis: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub operations: &'a [Operation],
}

#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
    #[serde(rename = "Resources", default)]
    pub resources: Vec<Value>,
}

impl ListResponse {
    pub fn ids(&self) -> Vec<String> {
        self.resources
            .iter()
            .filter_map(|r| r.get("id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

/// SCIM-style error body returned on failure. Only `detail` is read; the
/// HTTP status of the response is authoritative.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_urn() {
        assert_eq!(
            schema_urn("monitor-provider", "host-system"),
            "urn:pingidentity:schemas:configuration:2.0:monitor-provider:host-system"
        );
    }

    #[test]
    fn test_config_type_finds_subtype() {
        let body = json!({
            "schemas": [
                "urn:pingidentity:schemas:configuration:2.0:failure-lockout-action:lock-account"
            ],
            "id": "Lock"
        });
        assert_eq!(config_type(&body, "failure-lockout-action").unwrap(), "lock-account");
    }

    #[test]
    fn test_config_type_wrong_object() {
        let body = json!({
            "schemas": ["urn:pingidentity:schemas:configuration:2.0:monitor-provider:general"]
        });
        let err = config_type(&body, "failure-lockout-action").unwrap_err();
        assert!(err.to_string().contains("not a failure-lockout-action object"));
    }

    #[test]
    fn test_config_type_missing_schemas() {
        let err = config_type(&json!({"id": "x"}), "monitor-provider").unwrap_err();
        assert!(matches!(err, ConfigApiError::InvalidResponse { .. }));
    }

    #[test]
    fn test_messages_deserialization() {
        let messages: Messages = serde_json::from_value(json!({
            "notifications": ["restart required"],
            "requiredActions": [{
                "property": "enabled",
                "type": "component-restart",
                "synopsis": "Restart the monitor provider"
            }]
        }))
        .unwrap();
        assert_eq!(messages.notifications.unwrap(), vec!["restart required"]);
        let actions = messages.required_actions.unwrap();
        assert_eq!(actions[0].type_, "component-restart");
    }

    #[test]
    fn test_list_response_ids() {
        let list: ListResponse = serde_json::from_value(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:ListResponse"],
            "totalResults": 2,
            "Resources": [{"id": "a"}, {"id": "b"}, {"no-id": true}]
        }))
        .unwrap();
        assert_eq!(list.total_results, 2);
        assert_eq!(list.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_error_response_reads_detail() {
        let error: ErrorResponse = serde_json::from_value(json!({
            "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
            "status": "409",
            "detail": "An entry with that name already exists"
        }))
        .unwrap();
        assert_eq!(error.detail.as_deref(), Some("An entry with that name already exists"));
    }

    #[test]
    fn test_update_request_shape() {
        let ops = vec![Operation::replace("enabled", "false")];
        let json = serde_json::to_value(UpdateRequest { operations: &ops }).unwrap();
        assert_eq!(
            json,
            json!({"operations": [{"op": "replace", "path": "enabled", "value": "false"}]})
        );
    }
}
