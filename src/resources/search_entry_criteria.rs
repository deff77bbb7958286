use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::non_empty;
use crate::configapi::ConfigApiError;
use crate::configapi::types::{self, Messages, schema_urn};
use crate::framework::{
    Attr, Attribute, ConfigModel, ConfigResource, Diagnostics, ResourceMeta, Schema, StringAttr,
    StringSetAttr,
};
use crate::operations::{self, Operation};

const OBJECT_TYPE: &str = "search-entry-criteria";

pub const TYPES: &[&str] = &["simple", "aggregate", "third-party"];

const SIMPLE: &[&str] = &["simple"];
const AGGREGATE: &[&str] = &["aggregate"];
const THIRD_PARTY: &[&str] = &["third-party"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEntryCriteriaModel {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub description: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub request_criteria: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub all_included_entry_control: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub any_included_entry_control: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub not_all_included_entry_control: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub none_included_entry_control: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub included_entry_base_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub excluded_entry_base_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub all_included_entry_filter: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub any_included_entry_filter: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub not_all_included_entry_filter: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub none_included_entry_filter: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub all_included_entry_group_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub any_included_entry_group_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub not_all_included_entry_group_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub none_included_entry_group_dn: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub all_included_entry_criteria: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub any_included_entry_criteria: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub not_all_included_entry_criteria: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub none_included_entry_criteria: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub extension_class: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub extension_argument: StringSetAttr,
}

impl ConfigModel for SearchEntryCriteriaModel {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SimpleResponse {
    pub id: String,
    pub description: Option<String>,
    pub request_criteria: Option<String>,
    pub all_included_entry_control: Option<Vec<String>>,
    pub any_included_entry_control: Option<Vec<String>>,
    pub not_all_included_entry_control: Option<Vec<String>>,
    pub none_included_entry_control: Option<Vec<String>>,
    pub included_entry_base_dn: Option<Vec<String>>,
    pub excluded_entry_base_dn: Option<Vec<String>>,
    pub all_included_entry_filter: Option<Vec<String>>,
    pub any_included_entry_filter: Option<Vec<String>>,
    pub not_all_included_entry_filter: Option<Vec<String>>,
    pub none_included_entry_filter: Option<Vec<String>>,
    pub all_included_entry_group_dn: Option<Vec<String>>,
    pub any_included_entry_group_dn: Option<Vec<String>>,
    pub not_all_included_entry_group_dn: Option<Vec<String>>,
    pub none_included_entry_group_dn: Option<Vec<String>>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AggregateResponse {
    pub id: String,
    pub description: Option<String>,
    pub all_included_entry_criteria: Option<Vec<String>>,
    pub any_included_entry_criteria: Option<Vec<String>>,
    pub not_all_included_entry_criteria: Option<Vec<String>>,
    pub none_included_entry_criteria: Option<Vec<String>>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThirdPartyResponse {
    pub id: String,
    pub description: Option<String>,
    pub extension_class: String,
    pub extension_argument: Option<Vec<String>>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEntryCriteriaResponse {
    Simple(Box<SimpleResponse>),
    Aggregate(AggregateResponse),
    ThirdParty(ThirdPartyResponse),
}

impl SearchEntryCriteriaResponse {
    pub fn decode(body: Value) -> Result<Self, ConfigApiError> {
        let type_ = types::config_type(&body, OBJECT_TYPE)?.to_string();
        match type_.as_str() {
            "simple" => types::decode_body(body).map(|r| Self::Simple(Box::new(r))),
            "aggregate" => types::decode_body(body).map(Self::Aggregate),
            "third-party" => types::decode_body(body).map(Self::ThirdParty),
            _ => Err(ConfigApiError::UnknownType {
                object: OBJECT_TYPE.to_string(),
                type_,
            }),
        }
    }

    pub fn into_model(self) -> SearchEntryCriteriaModel {
        let null = SearchEntryCriteriaModel::nulls();
        match self {
            Self::Simple(r) => {
                let r = *r;
                SearchEntryCriteriaModel {
                    meta: ResourceMeta::from_response(r.id, "simple", r.messages),
                    description: Attr::from_option(r.description),
                    request_criteria: Attr::from_option(r.request_criteria),
                    all_included_entry_control: Attr::from_vec(r.all_included_entry_control),
                    any_included_entry_control: Attr::from_vec(r.any_included_entry_control),
                    not_all_included_entry_control: Attr::from_vec(
                        r.not_all_included_entry_control,
                    ),
                    none_included_entry_control: Attr::from_vec(r.none_included_entry_control),
                    included_entry_base_dn: Attr::from_vec(r.included_entry_base_dn),
                    excluded_entry_base_dn: Attr::from_vec(r.excluded_entry_base_dn),
                    all_included_entry_filter: Attr::from_vec(r.all_included_entry_filter),
                    any_included_entry_filter: Attr::from_vec(r.any_included_entry_filter),
                    not_all_included_entry_filter: Attr::from_vec(r.not_all_included_entry_filter),
                    none_included_entry_filter: Attr::from_vec(r.none_included_entry_filter),
                    all_included_entry_group_dn: Attr::from_vec(r.all_included_entry_group_dn),
                    any_included_entry_group_dn: Attr::from_vec(r.any_included_entry_group_dn),
                    not_all_included_entry_group_dn: Attr::from_vec(
                        r.not_all_included_entry_group_dn,
                    ),
                    none_included_entry_group_dn: Attr::from_vec(r.none_included_entry_group_dn),
                    ..null
                }
            }
            Self::Aggregate(r) => SearchEntryCriteriaModel {
                meta: ResourceMeta::from_response(r.id, "aggregate", r.messages),
                description: Attr::from_option(r.description),
                all_included_entry_criteria: Attr::from_vec(r.all_included_entry_criteria),
                any_included_entry_criteria: Attr::from_vec(r.any_included_entry_criteria),
                not_all_included_entry_criteria: Attr::from_vec(r.not_all_included_entry_criteria),
                none_included_entry_criteria: Attr::from_vec(r.none_included_entry_criteria),
                ..null
            },
            Self::ThirdParty(r) => SearchEntryCriteriaModel {
                meta: ResourceMeta::from_response(r.id, "third-party", r.messages),
                description: Attr::from_option(r.description),
                extension_class: Attr::Value(r.extension_class),
                extension_argument: Attr::from_vec(r.extension_argument),
                ..null
            },
        }
    }
}

impl SearchEntryCriteriaModel {
    fn nulls() -> Self {
        Self {
            meta: ResourceMeta::default(),
            description: Attr::Null,
            request_criteria: Attr::Null,
            all_included_entry_control: Attr::Null,
            any_included_entry_control: Attr::Null,
            not_all_included_entry_control: Attr::Null,
            none_included_entry_control: Attr::Null,
            included_entry_base_dn: Attr::Null,
            excluded_entry_base_dn: Attr::Null,
            all_included_entry_filter: Attr::Null,
            any_included_entry_filter: Attr::Null,
            not_all_included_entry_filter: Attr::Null,
            none_included_entry_filter: Attr::Null,
            all_included_entry_group_dn: Attr::Null,
            any_included_entry_group_dn: Attr::Null,
            not_all_included_entry_group_dn: Attr::Null,
            none_included_entry_group_dn: Attr::Null,
            all_included_entry_criteria: Attr::Null,
            any_included_entry_criteria: Attr::Null,
            not_all_included_entry_criteria: Attr::Null,
            none_included_entry_criteria: Attr::Null,
            extension_class: Attr::Null,
            extension_argument: Attr::Null,
        }
    }

    /// The string-set attributes paired with their API paths.
    fn sets(&self) -> [(&StringSetAttr, &'static str); 19] {
        [
            (&self.all_included_entry_control, "all-included-entry-control"),
            (&self.any_included_entry_control, "any-included-entry-control"),
            (&self.not_all_included_entry_control, "not-all-included-entry-control"),
            (&self.none_included_entry_control, "none-included-entry-control"),
            (&self.included_entry_base_dn, "included-entry-base-dn"),
            (&self.excluded_entry_base_dn, "excluded-entry-base-dn"),
            (&self.all_included_entry_filter, "all-included-entry-filter"),
            (&self.any_included_entry_filter, "any-included-entry-filter"),
            (&self.not_all_included_entry_filter, "not-all-included-entry-filter"),
            (&self.none_included_entry_filter, "none-included-entry-filter"),
            (&self.all_included_entry_group_dn, "all-included-entry-group-dn"),
            (&self.any_included_entry_group_dn, "any-included-entry-group-dn"),
            (&self.not_all_included_entry_group_dn, "not-all-included-entry-group-dn"),
            (&self.none_included_entry_group_dn, "none-included-entry-group-dn"),
            (&self.all_included_entry_criteria, "all-included-entry-criteria"),
            (&self.any_included_entry_criteria, "any-included-entry-criteria"),
            (&self.not_all_included_entry_criteria, "not-all-included-entry-criteria"),
            (&self.none_included_entry_criteria, "none-included-entry-criteria"),
            (&self.extension_argument, "extension-argument"),
        ]
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddSearchEntryCriteriaRequest {
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_included_entry_control: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_included_entry_control: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_all_included_entry_control: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none_included_entry_control: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_entry_base_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_entry_base_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_included_entry_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_included_entry_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_all_included_entry_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none_included_entry_filter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_included_entry_group_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_included_entry_group_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_all_included_entry_group_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none_included_entry_group_dn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_included_entry_criteria: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_included_entry_criteria: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_all_included_entry_criteria: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub none_included_entry_criteria: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_argument: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEntryCriteria;

impl ConfigResource for SearchEntryCriteria {
    type Model = SearchEntryCriteriaModel;

    fn type_name(&self) -> &'static str {
        "search_entry_criteria"
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    fn endpoint(&self) -> &'static str {
        "search-entry-criteria"
    }

    fn plural_type_name(&self) -> String {
        "search_entry_criteria_list".to_string()
    }

    fn schema(&self) -> Schema {
        let set = |name| Attribute::string_set(name).computed().supported_by(SIMPLE);
        let aggregate = |name| Attribute::string_set(name).computed().supported_by(AGGREGATE);
        Schema::new(
            "Manages a Search Entry Criteria.",
            TYPES,
            [
                Attribute::string("description")
                    .describe("A description for this Search Entry Criteria."),
                Attribute::string("request_criteria")
                    .supported_by(SIMPLE)
                    .describe("Request criteria that must match the search request that returned the entry."),
                set("all_included_entry_control")
                    .describe("Controls that must all be included in the entry."),
                set("any_included_entry_control")
                    .describe("Controls of which at least one must be included in the entry."),
                set("not_all_included_entry_control")
                    .describe("Controls of which at least one must be missing from the entry."),
                set("none_included_entry_control")
                    .describe("Controls that must all be missing from the entry."),
                set("included_entry_base_dn")
                    .describe("Base DNs below which matching entries must reside."),
                set("excluded_entry_base_dn")
                    .describe("Base DNs below which matching entries must not reside."),
                set("all_included_entry_filter")
                    .describe("Filters that must all match the entry."),
                set("any_included_entry_filter")
                    .describe("Filters of which at least one must match the entry."),
                set("not_all_included_entry_filter")
                    .describe("Filters of which at least one must not match the entry."),
                set("none_included_entry_filter")
                    .describe("Filters that must all not match the entry."),
                set("all_included_entry_group_dn")
                    .describe("Groups the entry must be a member of."),
                set("any_included_entry_group_dn")
                    .describe("Groups of which the entry must be a member of at least one."),
                set("not_all_included_entry_group_dn")
                    .describe("Groups of which the entry must not be a member of at least one."),
                set("none_included_entry_group_dn")
                    .describe("Groups the entry must not be a member of."),
                aggregate("all_included_entry_criteria")
                    .describe("Search entry criteria that must all match the entry."),
                aggregate("any_included_entry_criteria")
                    .describe("Search entry criteria of which at least one must match the entry."),
                aggregate("not_all_included_entry_criteria")
                    .describe("Search entry criteria of which at least one must not match the entry."),
                aggregate("none_included_entry_criteria")
                    .describe("Search entry criteria that must all not match the entry."),
                Attribute::string("extension_class")
                    .supported_by(THIRD_PARTY)
                    .required_by(THIRD_PARTY)
                    .describe("Fully-qualified Java class of the third-party Search Entry Criteria."),
                Attribute::string_set("extension_argument")
                    .supported_by(THIRD_PARTY)
                    .describe("Arguments given to the third-party Search Entry Criteria, as name=value."),
            ],
        )
    }

    fn add_request(&self, plan: &Self::Model) -> Result<Value, ConfigApiError> {
        let request = AddSearchEntryCriteriaRequest {
            schemas: vec![schema_urn(OBJECT_TYPE, &plan.meta.type_)],
            id: plan.meta.name.clone(),
            description: non_empty(&plan.description),
            request_criteria: non_empty(&plan.request_criteria),
            all_included_entry_control: plan.all_included_entry_control.to_vec(),
            any_included_entry_control: plan.any_included_entry_control.to_vec(),
            not_all_included_entry_control: plan.not_all_included_entry_control.to_vec(),
            none_included_entry_control: plan.none_included_entry_control.to_vec(),
            included_entry_base_dn: plan.included_entry_base_dn.to_vec(),
            excluded_entry_base_dn: plan.excluded_entry_base_dn.to_vec(),
            all_included_entry_filter: plan.all_included_entry_filter.to_vec(),
            any_included_entry_filter: plan.any_included_entry_filter.to_vec(),
            not_all_included_entry_filter: plan.not_all_included_entry_filter.to_vec(),
            none_included_entry_filter: plan.none_included_entry_filter.to_vec(),
            all_included_entry_group_dn: plan.all_included_entry_group_dn.to_vec(),
            any_included_entry_group_dn: plan.any_included_entry_group_dn.to_vec(),
            not_all_included_entry_group_dn: plan.not_all_included_entry_group_dn.to_vec(),
            none_included_entry_group_dn: plan.none_included_entry_group_dn.to_vec(),
            all_included_entry_criteria: plan.all_included_entry_criteria.to_vec(),
            any_included_entry_criteria: plan.any_included_entry_criteria.to_vec(),
            not_all_included_entry_criteria: plan.not_all_included_entry_criteria.to_vec(),
            none_included_entry_criteria: plan.none_included_entry_criteria.to_vec(),
            extension_class: non_empty(&plan.extension_class),
            extension_argument: plan.extension_argument.to_vec(),
        };
        Ok(serde_json::to_value(request)?)
    }

    fn decode(&self, body: Value) -> Result<Self::Model, ConfigApiError> {
        SearchEntryCriteriaResponse::decode(body).map(SearchEntryCriteriaResponse::into_model)
    }

    fn update_operations(&self, plan: &Self::Model, state: &Self::Model) -> Vec<Operation> {
        let mut ops = Vec::new();
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.request_criteria,
            &state.request_criteria,
            "request-criteria",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.extension_class,
            &state.extension_class,
            "extension-class",
        );
        for ((planned, path), (current, _)) in plan.sets().into_iter().zip(state.sets()) {
            operations::add_string_set_operations_if_necessary(&mut ops, planned, current, path);
        }
        ops
    }

    fn reconcile_formatted(
        &self,
        expected: &Self::Model,
        state: &mut Self::Model,
        _diags: &mut Diagnostics,
    ) {
        state.description.keep_empty(&expected.description);
        state.request_criteria.keep_empty(&expected.request_criteria);
        state.extension_class.keep_empty(&expected.extension_class);
    }
}
