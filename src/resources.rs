//! Resource and data source registry.
//!
//! Every [`ConfigResource`] is exposed four ways: a managed resource, a
//! `default_` resource adopting a built-in object, a single-object data
//! source and a plural list data source.

mod data_source;
pub mod failure_lockout_action;
mod lifecycle;
pub mod monitor_provider;
pub mod search_entry_criteria;

pub use data_source::{ListDataSource, ObjectDataSource};
pub use failure_lockout_action::FailureLockoutAction;
pub use lifecycle::{ManagedResource, ResourceMode};
pub use monitor_provider::MonitorProvider;
pub use search_entry_criteria::SearchEntryCriteria;

use std::collections::BTreeMap;

use crate::error::{PdconfError, Result};
use crate::framework::{ConfigResource, DynamicDataSource, DynamicResource, StringAttr};

pub const PROVIDER_TYPE_NAME: &str = "pingdirectory";

/// Strings sent in add requests; empty means "not set".
pub(crate) fn non_empty(attr: &StringAttr) -> Option<String> {
    attr.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}

fn register_resource<R>(map: &mut BTreeMap<String, Box<dyn DynamicResource>>, resource: R)
where
    R: ConfigResource + Clone + 'static,
{
    for managed in [
        ManagedResource::new(resource.clone()),
        ManagedResource::default_object(resource),
    ] {
        map.insert(managed.type_name(), Box::new(managed));
    }
}

fn register_data_sources<R>(map: &mut BTreeMap<String, Box<dyn DynamicDataSource>>, resource: R)
where
    R: ConfigResource + Clone + 'static,
{
    let object = ObjectDataSource(resource.clone());
    map.insert(object.type_name(), Box::new(object));
    let list = ListDataSource(resource);
    map.insert(list.type_name(), Box::new(list));
}

/// All resources keyed by their full type name.
pub fn resources() -> BTreeMap<String, Box<dyn DynamicResource>> {
    let mut map = BTreeMap::new();
    register_resource(&mut map, FailureLockoutAction);
    register_resource(&mut map, MonitorProvider);
    register_resource(&mut map, SearchEntryCriteria);
    map
}

/// All data sources keyed by their full type name.
pub fn data_sources() -> BTreeMap<String, Box<dyn DynamicDataSource>> {
    let mut map = BTreeMap::new();
    register_data_sources(&mut map, FailureLockoutAction);
    register_data_sources(&mut map, MonitorProvider);
    register_data_sources(&mut map, SearchEntryCriteria);
    map
}

/// Get a resource by type name.
pub fn get_resource(type_name: &str) -> Result<Box<dyn DynamicResource>> {
    resources()
        .remove(type_name)
        .ok_or_else(|| PdconfError::UnknownResourceType(type_name.to_string()))
}

/// Get a data source by type name.
pub fn get_data_source(type_name: &str) -> Result<Box<dyn DynamicDataSource>> {
    data_sources()
        .remove(type_name)
        .ok_or_else(|| PdconfError::UnknownDataSourceType(type_name.to_string()))
}
