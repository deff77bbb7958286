use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A plan or state attribute value.
///
/// `Unknown` means the value was not given and the remote value wins. `Null`
/// means the value was explicitly cleared. In JSON an absent key deserializes
/// to `Unknown` (via `#[serde(default)]`) and `null` to `Null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attr<T> {
    #[default]
    Unknown,
    Null,
    Value(T),
}

pub type StringAttr = Attr<String>;
pub type BoolAttr = Attr<bool>;
pub type Int64Attr = Attr<i64>;
pub type Float64Attr = Attr<f64>;
pub type StringSetAttr = Attr<BTreeSet<String>>;
pub type Int64SetAttr = Attr<BTreeSet<i64>>;

impl<T> Attr<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Attr::Unknown)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Attr::Null)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Attr::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Attr::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Unknown or null values both collapse to `None`.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Attr::Value(v),
            None => Attr::Null,
        }
    }

    /// Replaces an unknown value with `other`; known values are kept.
    pub fn or_else(self, other: Attr<T>) -> Attr<T> {
        match self {
            Attr::Unknown => other,
            known => known,
        }
    }
}

impl Attr<String> {
    pub fn as_str(&self) -> Option<&str> {
        self.value().map(String::as_str)
    }

    /// Empty strings are never sent, so the server reports them as absent.
    /// Keeps `""` in state when that is what `expected` holds.
    pub fn keep_empty(&mut self, expected: &StringAttr) {
        if self.is_null() && expected.as_str() == Some("") {
            *self = expected.clone();
        }
    }
}

impl<T: Ord> Attr<BTreeSet<T>> {
    /// Server responses omit empty multi-valued attributes; state keeps them as empty sets.
    pub fn from_vec(values: Option<Vec<T>>) -> Self {
        Attr::Value(values.unwrap_or_default().into_iter().collect())
    }

    pub fn to_vec(&self) -> Option<Vec<T>>
    where
        T: Clone,
    {
        self.value()
            .filter(|set| !set.is_empty())
            .map(|set| set.iter().cloned().collect())
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Attr::Value(value)
    }
}

impl<T: Serialize> Serialize for Attr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Attr::Value(v) => serializer.serialize_some(v),
            Attr::Unknown | Attr::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Attr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Attr::from_option)
    }
}
