//! Failure lockout actions decide what happens to an account after too many
//! failed authentication attempts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::non_empty;
use crate::configapi::ConfigApiError;
use crate::configapi::types::{self, Messages, schema_urn};
use crate::duration;
use crate::framework::{
    Attr, Attribute, BoolAttr, ConfigModel, ConfigResource, Diagnostics, ResourceMeta, Schema,
    StringAttr,
};
use crate::operations::{self, Operation};
use crate::provider::ProductVersion;

const OBJECT_TYPE: &str = "failure-lockout-action";

pub const TYPES: &[&str] = &["delay-bind", "no-operation", "lock-account"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FailureLockoutActionModel {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub description: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub delay: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub allow_blocking_delay: BoolAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub generate_account_status_notification: BoolAttr,
}

impl ConfigModel for FailureLockoutActionModel {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DelayBindResponse {
    pub id: String,
    pub description: Option<String>,
    pub delay: String,
    pub allow_blocking_delay: Option<bool>,
    pub generate_account_status_notification: Option<bool>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoOperationResponse {
    pub id: String,
    pub description: Option<String>,
    pub generate_account_status_notification: Option<bool>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LockAccountResponse {
    pub id: String,
    pub description: Option<String>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

/// A stored failure lockout action, discriminated by its schemas URN.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureLockoutActionResponse {
    DelayBind(DelayBindResponse),
    NoOperation(NoOperationResponse),
    LockAccount(LockAccountResponse),
}

impl FailureLockoutActionResponse {
    pub fn decode(body: Value) -> Result<Self, ConfigApiError> {
        let type_ = types::config_type(&body, OBJECT_TYPE)?.to_string();
        match type_.as_str() {
            "delay-bind" => types::decode_body(body).map(Self::DelayBind),
            "no-operation" => types::decode_body(body).map(Self::NoOperation),
            "lock-account" => types::decode_body(body).map(Self::LockAccount),
            _ => Err(ConfigApiError::UnknownType {
                object: OBJECT_TYPE.to_string(),
                type_,
            }),
        }
    }

    /// Attributes the subtype does not have are null in the model.
    pub fn into_model(self) -> FailureLockoutActionModel {
        match self {
            Self::DelayBind(r) => FailureLockoutActionModel {
                meta: ResourceMeta::from_response(r.id, "delay-bind", r.messages),
                description: Attr::from_option(r.description),
                delay: Attr::Value(r.delay),
                allow_blocking_delay: Attr::from_option(r.allow_blocking_delay),
                generate_account_status_notification: Attr::from_option(
                    r.generate_account_status_notification,
                ),
            },
            Self::NoOperation(r) => FailureLockoutActionModel {
                meta: ResourceMeta::from_response(r.id, "no-operation", r.messages),
                description: Attr::from_option(r.description),
                delay: Attr::Null,
                allow_blocking_delay: Attr::Null,
                generate_account_status_notification: Attr::from_option(
                    r.generate_account_status_notification,
                ),
            },
            Self::LockAccount(r) => FailureLockoutActionModel {
                meta: ResourceMeta::from_response(r.id, "lock-account", r.messages),
                description: Attr::from_option(r.description),
                delay: Attr::Null,
                allow_blocking_delay: Attr::Null,
                generate_account_status_notification: Attr::Null,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddFailureLockoutActionRequest {
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_blocking_delay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_account_status_notification: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FailureLockoutAction;

impl ConfigResource for FailureLockoutAction {
    type Model = FailureLockoutActionModel;

    fn type_name(&self) -> &'static str {
        "failure_lockout_action"
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    fn endpoint(&self) -> &'static str {
        "failure-lockout-actions"
    }

    fn min_version(&self) -> ProductVersion {
        ProductVersion::V9_2
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Manages a Failure Lockout Action.",
            TYPES,
            [
                Attribute::string("description")
                    .describe("A description for this Failure Lockout Action."),
                Attribute::string("delay")
                    .supported_by(&["delay-bind"])
                    .required_by(&["delay-bind"])
                    .describe("The length of time to delay the bind response for accounts with too many failed authentication attempts."),
                Attribute::bool("allow_blocking_delay")
                    .computed()
                    .supported_by(&["delay-bind"])
                    .describe("Whether to delay the bind response by blocking the worker thread when non-blocking delay is unavailable."),
                Attribute::bool("generate_account_status_notification")
                    .computed()
                    .supported_by(&["delay-bind", "no-operation"])
                    .describe("Whether to generate an account status notification when a bind attempt is rejected."),
            ],
        )
    }

    fn add_request(&self, plan: &Self::Model) -> Result<Value, ConfigApiError> {
        let request = AddFailureLockoutActionRequest {
            schemas: vec![schema_urn(OBJECT_TYPE, &plan.meta.type_)],
            id: plan.meta.name.clone(),
            description: non_empty(&plan.description),
            delay: non_empty(&plan.delay),
            allow_blocking_delay: plan.allow_blocking_delay.value().copied(),
            generate_account_status_notification: plan
                .generate_account_status_notification
                .value()
                .copied(),
        };
        Ok(serde_json::to_value(request)?)
    }

    fn decode(&self, body: Value) -> Result<Self::Model, ConfigApiError> {
        FailureLockoutActionResponse::decode(body).map(FailureLockoutActionResponse::into_model)
    }

    fn update_operations(&self, plan: &Self::Model, state: &Self::Model) -> Vec<Operation> {
        let mut ops = Vec::new();
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        operations::add_string_operation_if_necessary(&mut ops, &plan.delay, &state.delay, "delay");
        operations::add_bool_operation_if_necessary(
            &mut ops,
            &plan.allow_blocking_delay,
            &state.allow_blocking_delay,
            "allow-blocking-delay",
        );
        operations::add_bool_operation_if_necessary(
            &mut ops,
            &plan.generate_account_status_notification,
            &state.generate_account_status_notification,
            "generate-account-status-notification",
        );
        ops
    }

    fn reconcile_formatted(
        &self,
        expected: &Self::Model,
        state: &mut Self::Model,
        diags: &mut Diagnostics,
    ) {
        state.description.keep_empty(&expected.description);
        state.delay.keep_empty(&expected.delay);
        duration::reconcile_duration(&expected.delay, &mut state.delay, "delay", diags);
    }
}
