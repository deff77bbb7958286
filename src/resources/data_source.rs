use async_trait::async_trait;
use serde_json::{Value, json};

use super::PROVIDER_TYPE_NAME;
use crate::framework::{
    Attribute, AttributeKind, ConfigResource, Diagnostics, DynamicDataSource, Schema,
};
use crate::provider::ProviderContext;

fn string_setting<'a>(config: &'a Value, key: &str) -> Option<&'a str> {
    config.get(key).and_then(Value::as_str)
}

/// Reads a single object by name.
#[derive(Debug, Clone)]
pub struct ObjectDataSource<R>(pub R);

#[async_trait]
impl<R> DynamicDataSource for ObjectDataSource<R>
where
    R: ConfigResource + 'static,
{
    fn type_name(&self) -> String {
        format!("{PROVIDER_TYPE_NAME}_{}", self.0.type_name())
    }

    fn schema(&self) -> Schema {
        let mut schema = self.0.schema();
        for attribute in &mut schema.attributes {
            let is_name = attribute.name == "name";
            attribute.required = is_name;
            attribute.computed = !is_name;
            attribute.required_by = &[];
            attribute.requires_replace = false;
        }
        schema
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        let Some(name) = string_setting(config, "name") else {
            diags.add_error("Missing required attribute", "attribute 'name' is required");
            return None;
        };

        let body = match ctx.client.get(self.0.endpoint(), name).await {
            Ok(body) => body,
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while reading the {}", self.0.type_name()),
                    &err,
                );
                return None;
            }
        };

        match self.0.decode(body).map(|model| serde_json::to_value(&model)) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(err)) => {
                diags.add_error("Failed to encode data source result", err.to_string());
                None
            }
            Err(err) => {
                diags.add_error(
                    format!("Failed to decode the {} response", self.0.type_name()),
                    err.to_string(),
                );
                None
            }
        }
    }
}

/// Lists the ids of every object of a type, optionally filtered.
#[derive(Debug, Clone)]
pub struct ListDataSource<R>(pub R);

#[async_trait]
impl<R> DynamicDataSource for ListDataSource<R>
where
    R: ConfigResource + 'static,
{
    fn type_name(&self) -> String {
        format!("{PROVIDER_TYPE_NAME}_{}", self.0.plural_type_name())
    }

    fn schema(&self) -> Schema {
        Schema {
            description: "Lists configuration object ids.",
            types: &[],
            attributes: vec![
                Attribute::string("filter")
                    .describe("SCIM filter narrowing the returned objects."),
                Attribute::new("ids", AttributeKind::StringSet)
                    .read_only()
                    .describe("Ids of the matching objects."),
            ],
        }
    }

    async fn read(
        &self,
        ctx: &ProviderContext,
        config: &Value,
        diags: &mut Diagnostics,
    ) -> Option<Value> {
        let filter = string_setting(config, "filter");
        match ctx.client.list(self.0.endpoint(), filter).await {
            Ok(list) => {
                tracing::debug!(
                    resource = self.0.type_name(),
                    total = list.total_results,
                    "listed configuration objects"
                );
                Some(json!({
                    "filter": filter,
                    "ids": list.ids(),
                }))
            }
            Err(err) => {
                diags.report_http_error(
                    format!("An error occurred while listing {}", self.0.plural_type_name()),
                    &err,
                );
                None
            }
        }
    }
}
