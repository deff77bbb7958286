use serde::{Deserialize, Serialize};

use super::{Attr, StringSetAttr};
use crate::configapi::{Messages, RequiredAction};

/// Attributes shared by every configuration object model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub id: Attr<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub notifications: StringSetAttr,
    #[serde(default, skip_serializing_if = "Attr::is_unknown")]
    pub required_actions: Attr<Vec<RequiredAction>>,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>, type_: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_: type_.into(),
            ..Self::default()
        }
    }

    pub fn from_response(id: String, type_: &str, messages: Option<Messages>) -> Self {
        let messages = messages.unwrap_or_default();
        Self {
            id: Attr::Value(id.clone()),
            name: id,
            type_: type_.to_string(),
            notifications: Attr::from_vec(messages.notifications),
            required_actions: Attr::Value(messages.required_actions.unwrap_or_default()),
        }
    }
}

pub trait ConfigModel {
    fn meta(&self) -> &ResourceMeta;
}
