use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::PROVIDER_TYPE_NAME;
use crate::framework::{
    ConfigModel, ConfigResource, Diagnostics, DynamicResource, PlannedAction, PlannedChange,
    Schema,
};
use crate::operations;
use crate::provider::ProviderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    /// Objects created and deleted by this resource.
    Managed,
    /// Objects the server ships with: adopted on create, left in place on delete.
    Default,
}

/// Drives the generic lifecycle for one [`ConfigResource`].
#[derive(Debug, Clone)]
pub struct ManagedResource<R> {
    resource: R,
    mode: ResourceMode,
}

impl<R: ConfigResource> ManagedResource<R> {
    pub fn new(resource: R) -> Self {
        Self {
            resource,
            mode: ResourceMode::Managed,
        }
    }

    pub fn default_object(resource: R) -> Self {
        Self {
            resource,
            mode: ResourceMode::Default,
        }
    }

    fn check_version(&self, ctx: &ProviderContext, diags: &mut Diagnostics) -> bool {
        let required = self.resource.min_version();
        if ctx.product_version < required {
            diags.add_error(
                "Unsupported product version",
                format!(
                    "{} requires PingDirectory {required} or later, the provider is configured for {}",
                    self.resource.type_name(),
                    ctx.product_version
                ),
            );
            return false;
        }
        true
    }

    /// Decodes a response and maps formatted values back to `expected`'s spelling.
    fn decode_state(
        &self,
        expected: &R::Model,
        body: Value,
        diags: &mut Diagnostics,
    ) -> Option<R::Model> {
        match self.resource.decode(body) {
            Ok(mut state) => {
                self.resource.reconcile_formatted(expected, &mut state, diags);
                Some(state)
            }
            Err(err) => {
                diags.add_error(
                    format!("Failed to decode the {} response", self.resource.type_name()),
                    err.to_string(),
                );
                None
            }
        }
    }

    async fn create_object(
        &self,
        ctx: &ProviderContext,
        plan: &R::Model,
        diags: &mut Diagnostics,
    ) -> Option<R::Model> {
        let body = match self.resource.add_request(plan) {
            Ok(body) => body,
            Err(err) => {
                diags.add_error("Failed to build the add request", err.to_string());
                return None;
            }
        };

        tracing::info!(
            resource = self.resource.type_name(),
            name = %plan.meta().name,
            type_ = %plan.meta().type_,
            "creating configuration object"
        );
        match ctx.client.add(self.resource.endpoint(), &body).await {
            Ok(response) => self.decode_state(plan, response, diags),
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while creating the {}", self.resource.type_name()),
                    &err,
                );
                None
            }
        }
    }

    async fn adopt_object(
        &self,
        ctx: &ProviderContext,
        plan: &R::Model,
        diags: &mut Diagnostics,
    ) -> Option<R::Model> {
        let name = &plan.meta().name;
        tracing::info!(
            resource = self.resource.type_name(),
            %name,
            "adopting existing configuration object"
        );
        let existing = match ctx.client.get(self.resource.endpoint(), name).await {
            Ok(body) => match self.resource.decode(body) {
                Ok(model) => model,
                Err(err) => {
                    diags.add_error(
                        format!("Failed to decode the {} response", self.resource.type_name()),
                        err.to_string(),
                    );
                    return None;
                }
            },
            Err(err) => {
                diags.report_http_error(
                    format!(
                        "An error occurred while reading the existing {}",
                        self.resource.type_name()
                    ),
                    &err,
                );
                return None;
            }
        };

        if existing.meta().type_ != plan.meta().type_ {
            diags.add_error(
                "Type mismatch",
                format!(
                    "existing object '{name}' has type '{}', not '{}'",
                    existing.meta().type_,
                    plan.meta().type_
                ),
            );
            return None;
        }

        self.apply_operations(ctx, plan, existing, diags).await
    }

    /// Sends the operations reconciling `state` toward `plan`, if any.
    async fn apply_operations(
        &self,
        ctx: &ProviderContext,
        plan: &R::Model,
        mut state: R::Model,
        diags: &mut Diagnostics,
    ) -> Option<R::Model> {
        let name = &plan.meta().name;
        let ops = self.resource.update_operations(plan, &state);
        operations::log_update_operations(name, &ops);

        if ops.is_empty() {
            self.resource.reconcile_formatted(plan, &mut state, diags);
            return Some(state);
        }

        match ctx.client.update(self.resource.endpoint(), name, &ops).await {
            Ok(response) => self.decode_state(plan, response, diags),
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while updating the {}", self.resource.type_name()),
                    &err,
                );
                None
            }
        }
    }
}

fn parse_model<M: DeserializeOwned>(value: &Value, what: &str, diags: &mut Diagnostics) -> Option<M> {
    match serde_json::from_value(value.clone()) {
        Ok(model) => Some(model),
        Err(err) => {
            diags.add_error(format!("Invalid {what}"), err.to_string());
            None
        }
    }
}

fn to_value<M: Serialize>(model: &M, diags: &mut Diagnostics) -> Option<Value> {
    match serde_json::to_value(model) {
        Ok(value) => Some(value),
        Err(err) => {
            diags.add_error("Failed to encode state", err.to_string());
            None
        }
    }
}

#[async_trait]
impl<R> DynamicResource for ManagedResource<R>
where
    R: ConfigResource + 'static,
{
    fn type_name(&self) -> String {
        match self.mode {
            ResourceMode::Managed => format!("{PROVIDER_TYPE_NAME}_{}", self.resource.type_name()),
            ResourceMode::Default => {
                format!("{PROVIDER_TYPE_NAME}_default_{}", self.resource.type_name())
            }
        }
    }

    fn schema(&self) -> Schema {
        self.resource.schema()
    }

    fn validate(&self, config: &Value, diags: &mut Diagnostics) {
        self.resource.schema().validate_config(config, diags);
    }

    fn modify_plan(
        &self,
        plan: &Value,
        state: Option<&Value>,
        diags: &mut Diagnostics,
    ) -> Option<PlannedChange> {
        self.validate(plan, diags);
        if diags.has_error() {
            return None;
        }
        let plan: R::Model = parse_model(plan, "plan", diags)?;

        let Some(state) = state else {
            return Some(PlannedChange::new(match self.mode {
                ResourceMode::Managed => PlannedAction::Create,
                ResourceMode::Default => PlannedAction::Adopt,
            }));
        };
        let state: R::Model = parse_model(state, "state", diags)?;

        let mut requires_replace = Vec::new();
        if plan.meta().name != state.meta().name {
            requires_replace.push("name".to_string());
        }
        if plan.meta().type_ != state.meta().type_ {
            requires_replace.push("type".to_string());
        }
        if !requires_replace.is_empty() {
            return Some(PlannedChange {
                action: PlannedAction::Replace,
                operations: Vec::new(),
                requires_replace,
            });
        }

        let operations = self.resource.update_operations(&plan, &state);
        let action = if operations.is_empty() {
            PlannedAction::NoOp
        } else {
            PlannedAction::Update
        };
        Some(PlannedChange {
            action,
            operations,
            requires_replace,
        })
    }

    async fn create(
        &self,
        ctx: &ProviderContext,
        plan: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        let plan: R::Model = parse_model(plan, "plan", diags)?;
        if !self.check_version(ctx, diags) {
            return None;
        }
        let state = match self.mode {
            ResourceMode::Managed => self.create_object(ctx, &plan, diags).await?,
            ResourceMode::Default => self.adopt_object(ctx, &plan, diags).await?,
        };
        to_value(&state, diags)
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        state: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        let state: R::Model = parse_model(state, "state", diags)?;
        let name = &state.meta().name;

        match ctx.client.get(self.resource.endpoint(), name).await {
            Ok(body) => {
                // Drift found on read is expected; only keep equivalent spellings.
                let mut drift = Diagnostics::new();
                let refreshed = self.decode_state(&state, body, &mut drift);
                for error in drift.errors() {
                    diags.add_error(error.summary.clone(), error.detail.clone());
                }
                to_value(&refreshed?, diags)
            }
            Err(err) if err.is_not_found() => {
                diags.report_http_error_as_warning(
                    format!(
                        "The {} '{name}' no longer exists and will be removed from state",
                        self.resource.type_name()
                    ),
                    &err,
                );
                None
            }
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while reading the {}", self.resource.type_name()),
                    &err,
                );
                None
            }
        }
    }

    async fn update(
        &self,
        ctx: &ProviderContext,
        plan: &Value,
        state: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        let plan: R::Model = parse_model(plan, "plan", diags)?;
        let state: R::Model = parse_model(state, "state", diags)?;
        if !self.check_version(ctx, diags) {
            return None;
        }
        let updated = self.apply_operations(ctx, &plan, state, diags).await?;
        to_value(&updated, diags)
    }

    async fn delete(&self, ctx: &ProviderContext, state: &Value, diags: &mut Diagnostics) {
        let Some(state) = parse_model::<R::Model>(state, "state", diags) else {
            return;
        };
        let name = &state.meta().name;

        if self.mode == ResourceMode::Default {
            tracing::info!(
                resource = self.resource.type_name(),
                %name,
                "default configuration object stays on the server; removing it from state only"
            );
            return;
        }

        match ctx.client.delete(self.resource.endpoint(), name).await {
            Ok(()) => {
                tracing::info!(resource = self.resource.type_name(), %name, "deleted configuration object");
            }
            Err(err) if err.is_not_found() => {
                tracing::warn!(resource = self.resource.type_name(), %name, "object was already deleted");
            }
            Err(err) => diags.report_http_error(
                format!("An error occurred while deleting the {}", self.resource.type_name()),
                &err,
            ),
        }
    }

    async fn import_state(
        &self,
        ctx: &ProviderContext,
        id: &str,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        if !self.check_version(ctx, diags) {
            return None;
        }
        match ctx.client.get(self.resource.endpoint(), id).await {
            Ok(body) => match self.resource.decode(body) {
                Ok(state) => to_value(&state, diags),
                Err(err) => {
                    diags.add_error(
                        format!("Failed to decode the {} response", self.resource.type_name()),
                        err.to_string(),
                    );
                    None
                }
            },
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while importing the {}", self.resource.type_name()),
                    &err,
                );
                None
            }
        }
    }
}
