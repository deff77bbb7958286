use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::non_empty;
use crate::configapi::ConfigApiError;
use crate::configapi::types::{self, Messages, schema_urn};
use crate::duration;
use crate::framework::{
    Attr, Attribute, BoolAttr, ConfigModel, ConfigResource, Diagnostics, Int64Attr, ResourceMeta,
    Schema, StringAttr, StringSetAttr,
};
use crate::operations::{self, Operation};

const OBJECT_TYPE: &str = "monitor-provider";

pub const TYPES: &[&str] = &[
    "memory-usage",
    "stack-trace",
    "host-system",
    "disk-space-usage",
    "third-party",
];

const HOST_SYSTEM: &[&str] = &["host-system"];
const DISK_SPACE_USAGE: &[&str] = &["disk-space-usage"];
const THIRD_PARTY: &[&str] = &["third-party"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitorProviderModel {
    #[serde(flatten)]
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub description: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub enabled: BoolAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub disk_devices: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub network_devices: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub system_utilization_monitor_log_directory: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub low_space_warning_size_threshold: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub low_space_warning_percent_threshold: Int64Attr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub low_space_error_size_threshold: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub low_space_error_percent_threshold: Int64Attr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub out_of_space_error_size_threshold: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub out_of_space_error_percent_threshold: Int64Attr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub alert_frequency: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub extension_class: StringAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub extension_argument: StringSetAttr,
}

impl ConfigModel for MonitorProviderModel {
    fn meta(&self) -> &ResourceMeta {
        &self.meta
    }
}

/// Shape shared by the subtypes that only carry `description` and `enabled`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BasicMonitorProviderResponse {
    pub id: String,
    pub description: Option<String>,
    pub enabled: bool,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HostSystemResponse {
    pub id: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub disk_devices: Option<Vec<String>>,
    pub network_devices: Option<Vec<String>>,
    pub system_utilization_monitor_log_directory: String,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiskSpaceUsageResponse {
    pub id: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub low_space_warning_size_threshold: Option<String>,
    pub low_space_warning_percent_threshold: Option<i64>,
    pub low_space_error_size_threshold: Option<String>,
    pub low_space_error_percent_threshold: Option<i64>,
    pub out_of_space_error_size_threshold: Option<String>,
    pub out_of_space_error_percent_threshold: Option<i64>,
    pub alert_frequency: Option<String>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThirdPartyResponse {
    pub id: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub extension_class: String,
    pub extension_argument: Option<Vec<String>>,
    #[serde(rename = "urn:pingidentity:schemas:configuration:messages:2.0", default)]
    pub messages: Option<Messages>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorProviderResponse {
    MemoryUsage(BasicMonitorProviderResponse),
    StackTrace(BasicMonitorProviderResponse),
    HostSystem(HostSystemResponse),
    DiskSpaceUsage(DiskSpaceUsageResponse),
    ThirdParty(ThirdPartyResponse),
}

impl MonitorProviderResponse {
    pub fn decode(body: Value) -> Result<Self, ConfigApiError> {
        let type_ = types::config_type(&body, OBJECT_TYPE)?.to_string();
        match type_.as_str() {
            "memory-usage" => types::decode_body(body).map(Self::MemoryUsage),
            "stack-trace" => types::decode_body(body).map(Self::StackTrace),
            "host-system" => types::decode_body(body).map(Self::HostSystem),
            "disk-space-usage" => types::decode_body(body).map(Self::DiskSpaceUsage),
            "third-party" => types::decode_body(body).map(Self::ThirdParty),
            _ => Err(ConfigApiError::UnknownType {
                object: OBJECT_TYPE.to_string(),
                type_,
            }),
        }
    }

    pub fn into_model(self) -> MonitorProviderModel {
        let null = MonitorProviderModel::nulls();
        match self {
            Self::MemoryUsage(r) => basic_model(r, "memory-usage", null),
            Self::StackTrace(r) => basic_model(r, "stack-trace", null),
            Self::HostSystem(r) => MonitorProviderModel {
                meta: ResourceMeta::from_response(r.id, "host-system", r.messages),
                description: Attr::from_option(r.description),
                enabled: Attr::Value(r.enabled),
                disk_devices: Attr::from_vec(r.disk_devices),
                network_devices: Attr::from_vec(r.network_devices),
                system_utilization_monitor_log_directory: Attr::Value(
                    r.system_utilization_monitor_log_directory,
                ),
                ..null
            },
            Self::DiskSpaceUsage(r) => MonitorProviderModel {
                meta: ResourceMeta::from_response(r.id, "disk-space-usage", r.messages),
                description: Attr::from_option(r.description),
                enabled: Attr::Value(r.enabled),
                low_space_warning_size_threshold: Attr::from_option(
                    r.low_space_warning_size_threshold,
                ),
                low_space_warning_percent_threshold: Attr::from_option(
                    r.low_space_warning_percent_threshold,
                ),
                low_space_error_size_threshold: Attr::from_option(r.low_space_error_size_threshold),
                low_space_error_percent_threshold: Attr::from_option(
                    r.low_space_error_percent_threshold,
                ),
                out_of_space_error_size_threshold: Attr::from_option(
                    r.out_of_space_error_size_threshold,
                ),
                out_of_space_error_percent_threshold: Attr::from_option(
                    r.out_of_space_error_percent_threshold,
                ),
                alert_frequency: Attr::from_option(r.alert_frequency),
                ..null
            },
            Self::ThirdParty(r) => MonitorProviderModel {
                meta: ResourceMeta::from_response(r.id, "third-party", r.messages),
                description: Attr::from_option(r.description),
                enabled: Attr::Value(r.enabled),
                extension_class: Attr::Value(r.extension_class),
                extension_argument: Attr::from_vec(r.extension_argument),
                ..null
            },
        }
    }
}

fn basic_model(
    r: BasicMonitorProviderResponse,
    type_: &str,
    null: MonitorProviderModel,
) -> MonitorProviderModel {
    MonitorProviderModel {
        meta: ResourceMeta::from_response(r.id, type_, r.messages),
        description: Attr::from_option(r.description),
        enabled: Attr::Value(r.enabled),
        ..null
    }
}

impl MonitorProviderModel {
    /// Every attribute null, the starting point for a decoded subtype.
    fn nulls() -> Self {
        Self {
            meta: ResourceMeta::default(),
            description: Attr::Null,
            enabled: Attr::Null,
            disk_devices: Attr::Null,
            network_devices: Attr::Null,
            system_utilization_monitor_log_directory: Attr::Null,
            low_space_warning_size_threshold: Attr::Null,
            low_space_warning_percent_threshold: Attr::Null,
            low_space_error_size_threshold: Attr::Null,
            low_space_error_percent_threshold: Attr::Null,
            out_of_space_error_size_threshold: Attr::Null,
            out_of_space_error_percent_threshold: Attr::Null,
            alert_frequency: Attr::Null,
            extension_class: Attr::Null,
            extension_argument: Attr::Null,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddMonitorProviderRequest {
    pub schemas: Vec<String>,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_devices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_devices: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_utilization_monitor_log_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_space_warning_size_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_space_warning_percent_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_space_error_size_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_space_error_percent_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_space_error_size_threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_space_error_percent_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_argument: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorProvider;

impl ConfigResource for MonitorProvider {
    type Model = MonitorProviderModel;

    fn type_name(&self) -> &'static str {
        "monitor_provider"
    }

    fn object_type(&self) -> &'static str {
        OBJECT_TYPE
    }

    fn endpoint(&self) -> &'static str {
        "monitor-providers"
    }

    fn schema(&self) -> Schema {
        Schema::new(
            "Manages a Monitor Provider.",
            TYPES,
            [
                Attribute::string("description")
                    .describe("A description for this Monitor Provider."),
                Attribute::bool("enabled")
                    .required()
                    .describe("Indicates whether the Monitor Provider is enabled for use."),
                Attribute::string_set("disk_devices")
                    .computed()
                    .supported_by(HOST_SYSTEM)
                    .describe("Disk devices to monitor for I/O activity."),
                Attribute::string_set("network_devices")
                    .computed()
                    .supported_by(HOST_SYSTEM)
                    .describe("Network interfaces to monitor for throughput."),
                Attribute::string("system_utilization_monitor_log_directory")
                    .supported_by(HOST_SYSTEM)
                    .required_by(HOST_SYSTEM)
                    .describe("Directory where system utilization monitor logs are written."),
                Attribute::string("low_space_warning_size_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Free space below which a low space warning is raised."),
                Attribute::int64("low_space_warning_percent_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Percentage of free space below which a low space warning is raised."),
                Attribute::string("low_space_error_size_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Free space below which the server stops accepting writes from most clients."),
                Attribute::int64("low_space_error_percent_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Percentage of free space below which the server stops accepting writes from most clients."),
                Attribute::string("out_of_space_error_size_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Free space below which the server shuts itself down."),
                Attribute::int64("out_of_space_error_percent_threshold")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("Percentage of free space below which the server shuts itself down."),
                Attribute::string("alert_frequency")
                    .computed()
                    .supported_by(DISK_SPACE_USAGE)
                    .describe("How often alerts are repeated while a threshold stays crossed."),
                Attribute::string("extension_class")
                    .supported_by(THIRD_PARTY)
                    .required_by(THIRD_PARTY)
                    .describe("Fully-qualified Java class of the third-party Monitor Provider."),
                Attribute::string_set("extension_argument")
                    .supported_by(THIRD_PARTY)
                    .describe("Arguments given to the third-party Monitor Provider, as name=value."),
            ],
        )
    }

    fn add_request(&self, plan: &Self::Model) -> Result<Value, ConfigApiError> {
        let request = AddMonitorProviderRequest {
            schemas: vec![schema_urn(OBJECT_TYPE, &plan.meta.type_)],
            id: plan.meta.name.clone(),
            description: non_empty(&plan.description),
            enabled: plan.enabled.value().copied(),
            disk_devices: plan.disk_devices.to_vec(),
            network_devices: plan.network_devices.to_vec(),
            system_utilization_monitor_log_directory: non_empty(
                &plan.system_utilization_monitor_log_directory,
            ),
            low_space_warning_size_threshold: non_empty(&plan.low_space_warning_size_threshold),
            low_space_warning_percent_threshold: plan
                .low_space_warning_percent_threshold
                .value()
                .copied(),
            low_space_error_size_threshold: non_empty(&plan.low_space_error_size_threshold),
            low_space_error_percent_threshold: plan
                .low_space_error_percent_threshold
                .value()
                .copied(),
            out_of_space_error_size_threshold: non_empty(&plan.out_of_space_error_size_threshold),
            out_of_space_error_percent_threshold: plan
                .out_of_space_error_percent_threshold
                .value()
                .copied(),
            alert_frequency: non_empty(&plan.alert_frequency),
            extension_class: non_empty(&plan.extension_class),
            extension_argument: plan.extension_argument.to_vec(),
        };
        Ok(serde_json::to_value(request)?)
    }

    fn decode(&self, body: Value) -> Result<Self::Model, ConfigApiError> {
        MonitorProviderResponse::decode(body).map(MonitorProviderResponse::into_model)
    }

    fn update_operations(&self, plan: &Self::Model, state: &Self::Model) -> Vec<Operation> {
        let mut ops = Vec::new();
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.description,
            &state.description,
            "description",
        );
        operations::add_bool_operation_if_necessary(
            &mut ops,
            &plan.enabled,
            &state.enabled,
            "enabled",
        );
        operations::add_string_set_operations_if_necessary(
            &mut ops,
            &plan.disk_devices,
            &state.disk_devices,
            "disk-devices",
        );
        operations::add_string_set_operations_if_necessary(
            &mut ops,
            &plan.network_devices,
            &state.network_devices,
            "network-devices",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.system_utilization_monitor_log_directory,
            &state.system_utilization_monitor_log_directory,
            "system-utilization-monitor-log-directory",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.low_space_warning_size_threshold,
            &state.low_space_warning_size_threshold,
            "low-space-warning-size-threshold",
        );
        operations::add_int64_operation_if_necessary(
            &mut ops,
            &plan.low_space_warning_percent_threshold,
            &state.low_space_warning_percent_threshold,
            "low-space-warning-percent-threshold",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.low_space_error_size_threshold,
            &state.low_space_error_size_threshold,
            "low-space-error-size-threshold",
        );
        operations::add_int64_operation_if_necessary(
            &mut ops,
            &plan.low_space_error_percent_threshold,
            &state.low_space_error_percent_threshold,
            "low-space-error-percent-threshold",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.out_of_space_error_size_threshold,
            &state.out_of_space_error_size_threshold,
            "out-of-space-error-size-threshold",
        );
        operations::add_int64_operation_if_necessary(
            &mut ops,
            &plan.out_of_space_error_percent_threshold,
            &state.out_of_space_error_percent_threshold,
            "out-of-space-error-percent-threshold",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.alert_frequency,
            &state.alert_frequency,
            "alert-frequency",
        );
        operations::add_string_operation_if_necessary(
            &mut ops,
            &plan.extension_class,
            &state.extension_class,
            "extension-class",
        );
        operations::add_string_set_operations_if_necessary(
            &mut ops,
            &plan.extension_argument,
            &state.extension_argument,
            "extension-argument",
        );
        ops
    }

    fn reconcile_formatted(
        &self,
        expected: &Self::Model,
        state: &mut Self::Model,
        diags: &mut Diagnostics,
    ) {
        for (actual, planned) in [
            (&mut state.description, &expected.description),
            (
                &mut state.system_utilization_monitor_log_directory,
                &expected.system_utilization_monitor_log_directory,
            ),
            (
                &mut state.low_space_warning_size_threshold,
                &expected.low_space_warning_size_threshold,
            ),
            (
                &mut state.low_space_error_size_threshold,
                &expected.low_space_error_size_threshold,
            ),
            (
                &mut state.out_of_space_error_size_threshold,
                &expected.out_of_space_error_size_threshold,
            ),
            (&mut state.alert_frequency, &expected.alert_frequency),
            (&mut state.extension_class, &expected.extension_class),
        ] {
            actual.keep_empty(planned);
        }
        duration::reconcile_duration(
            &expected.alert_frequency,
            &mut state.alert_frequency,
            "alert_frequency",
            diags,
        );
    }
}
