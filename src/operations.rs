//! Plan/state diffing into PATCH operations.
//!
//! Every `add_*_if_necessary` function compares one planned attribute with its
//! last-known state and appends whatever operations bring the remote object in
//! line. Paths are the API's kebab-case attribute names and are fixed at
//! compile time, so a malformed path panics instead of producing an error.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::framework::Attr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Add,
    Remove,
    Replace,
}

/// A single instruction in a PATCH batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub op: OpType,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Operation {
    pub fn add(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: OpType::Add,
            path: path.into(),
            value: Some(value.into()),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: OpType::Remove,
            path: path.into(),
            value: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: OpType::Replace,
            path: path.into(),
            value: Some(value.into()),
        }
    }
}

impl fmt::Display for OpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} {} = {:?}", self.op, self.path, value),
            None => write!(f, "{} {}", self.op, self.path),
        }
    }
}

/// Values that can travel in an operation's `value` field.
trait OperationValue: PartialEq {
    fn canonical(&self) -> String;

    /// Values that mean "clear this attribute" even though they are set.
    fn clears(&self) -> bool {
        false
    }
}

impl OperationValue for bool {
    fn canonical(&self) -> String {
        self.to_string()
    }
}

impl OperationValue for i64 {
    fn canonical(&self) -> String {
        self.to_string()
    }
}

impl OperationValue for f64 {
    // Display prints the shortest decimal that round-trips.
    fn canonical(&self) -> String {
        self.to_string()
    }
}

impl OperationValue for String {
    fn canonical(&self) -> String {
        self.clone()
    }

    fn clears(&self) -> bool {
        self.is_empty()
    }
}

pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// # Panics
///
/// Panics if `path` is empty or contains anything other than lowercase ASCII
/// letters, digits and hyphens.
pub fn validate_path(path: &str) {
    assert!(
        is_valid_path(path),
        "invalid operation path {path:?}: only lowercase letters, digits and hyphens are allowed"
    );
}

fn add_scalar_operation<T: OperationValue>(
    ops: &mut Vec<Operation>,
    plan: &Attr<T>,
    state: &Attr<T>,
    path: &str,
) {
    if plan.is_unknown() {
        return;
    }
    validate_path(path);
    if plan == state {
        return;
    }
    match plan {
        Attr::Value(value) if !value.clears() => {
            ops.push(Operation::replace(path, value.canonical()));
        }
        _ => ops.push(Operation::remove(path)),
    }
}

fn add_set_operations<T: OperationValue + Ord>(
    ops: &mut Vec<Operation>,
    plan: &Attr<BTreeSet<T>>,
    state: &Attr<BTreeSet<T>>,
    path: &str,
) {
    if plan.is_unknown() {
        return;
    }
    validate_path(path);
    if plan == state {
        return;
    }

    let empty = BTreeSet::new();
    let planned = plan.value().unwrap_or(&empty);
    let current = state.value().unwrap_or(&empty);

    for value in planned.difference(current) {
        ops.push(Operation::add(path, value.canonical()));
    }
    for value in current.difference(planned) {
        ops.push(Operation::remove(format!(
            "[{path} eq \"{}\"]",
            value.canonical()
        )));
    }
}

pub fn add_bool_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<bool>,
    state: &Attr<bool>,
    path: &str,
) {
    add_scalar_operation(ops, plan, state, path);
}

pub fn add_int64_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<i64>,
    state: &Attr<i64>,
    path: &str,
) {
    add_scalar_operation(ops, plan, state, path);
}

pub fn add_float64_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<f64>,
    state: &Attr<f64>,
    path: &str,
) {
    add_scalar_operation(ops, plan, state, path);
}

/// An empty planned string removes the attribute, same as null.
pub fn add_string_operation_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<String>,
    state: &Attr<String>,
    path: &str,
) {
    add_scalar_operation(ops, plan, state, path);
}

pub fn add_string_set_operations_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<BTreeSet<String>>,
    state: &Attr<BTreeSet<String>>,
    path: &str,
) {
    add_set_operations(ops, plan, state, path);
}

pub fn add_int64_set_operations_if_necessary(
    ops: &mut Vec<Operation>,
    plan: &Attr<BTreeSet<i64>>,
    state: &Attr<BTreeSet<i64>>,
    path: &str,
) {
    add_set_operations(ops, plan, state, path);
}

pub fn log_update_operations(object: &str, ops: &[Operation]) {
    if ops.is_empty() {
        tracing::debug!(object, "no update operations");
        return;
    }
    for op in ops {
        tracing::debug!(
            object,
            op = %op.op,
            path = %op.path,
            value = op.value.as_deref().unwrap_or(""),
            "update operation"
        );
    }
}
