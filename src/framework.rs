//! Plugin-host shaped building blocks the resources are written against.

mod diagnostics;
mod model;
mod schema;
mod value;

pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use model::{ConfigModel, ResourceMeta};
pub use schema::{Attribute, AttributeKind, Schema};
pub use value::{
    Attr, BoolAttr, Float64Attr, Int64Attr, Int64SetAttr, StringAttr, StringSetAttr,
};

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::configapi::ConfigApiError;
use crate::operations::Operation;
use crate::provider::{ProductVersion, ProviderContext};

/// One configuration object type of the config API.
///
/// Implementations only describe the mapping between the Terraform-facing
/// model and the API; the lifecycle around it is generic.
pub trait ConfigResource: Send + Sync {
    type Model: ConfigModel + Serialize + DeserializeOwned + Clone + Send + Sync;

    /// Name without the provider prefix, e.g. `failure_lockout_action`.
    fn type_name(&self) -> &'static str;

    /// Object type as it appears in schema URNs, e.g. `failure-lockout-action`.
    fn object_type(&self) -> &'static str;

    /// Collection path below the config API root.
    fn endpoint(&self) -> &'static str;

    fn plural_type_name(&self) -> String {
        format!("{}s", self.type_name())
    }

    fn min_version(&self) -> ProductVersion {
        ProductVersion::OLDEST
    }

    fn schema(&self) -> Schema;

    fn add_request(&self, plan: &Self::Model) -> Result<Value, ConfigApiError>;

    /// Decodes a stored object into a state model.
    fn decode(&self, body: Value) -> Result<Self::Model, ConfigApiError>;

    fn update_operations(&self, plan: &Self::Model, state: &Self::Model) -> Vec<Operation>;

    /// Carries server-normalized values back to the configured spelling.
    fn reconcile_formatted(
        &self,
        _expected: &Self::Model,
        _state: &mut Self::Model,
        _diags: &mut Diagnostics,
    ) {
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedAction {
    Create,
    Adopt,
    Update,
    Replace,
    NoOp,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Adopt => "adopt existing",
            Self::Update => "update in place",
            Self::Replace => "replace",
            Self::NoOp => "no changes",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedChange {
    pub action: PlannedAction,
    pub operations: Vec<Operation>,
    pub requires_replace: Vec<String>,
}

impl PlannedChange {
    pub fn new(action: PlannedAction) -> Self {
        Self {
            action,
            operations: Vec::new(),
            requires_replace: Vec::new(),
        }
    }
}

/// Object-safe resource lifecycle over JSON plan and state documents.
///
/// Calls returning `Option<Value>` return `None` on failure, with the reason
/// in `diags`. `read` also returns `None` without errors when the object is
/// gone and should be dropped from state.
#[async_trait]
pub trait DynamicResource: Send + Sync {
    fn type_name(&self) -> String;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value, diags: &mut Diagnostics);

    fn modify_plan(
        &self,
        plan: &Value,
        state: Option<&Value>,
        diags: &mut Diagnostics,
    ) -> Option<PlannedChange>;

    async fn create(
        &self,
        ctx: &ProviderContext,
        plan: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value>;

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value>;

    async fn update(
        &self,
        ctx: &ProviderContext,
        plan: &Value,
        state: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value>;

    async fn delete(&self, ctx: &ProviderContext, state: &Value, diags: &mut Diagnostics);

    async fn import_state(
        &self,
        ctx: &ProviderContext,
        id: &str,
        diags: &mut Diagnostics,
    ) -> Option<Value>;
}

#[async_trait]
pub trait DynamicDataSource: Send + Sync {
    fn type_name(&self) -> String;

    fn schema(&self) -> Schema;

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value>;
}
