use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::error::HostError;
use crate::runner::ds::function_object::FunctionAdapter;
use crate::runner::ds::value::HostValue;

#[derive(Default)]
struct Members {
    order: Vec<String>,
    values: HashMap<String, HostValue>,
}

/// A plain data object: named members, no call or construct behaviour.
///
/// Members keep insertion order when enumerated. Functions stored as members
/// are ordinary `HostValue::Object` values, so a data object can act as a
/// namespace of host functions (`console.log`, `Json.encode`).
pub struct DataObject {
    class_name: String,
    members: RwLock<Members>,
}

impl DataObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        DataObject {
            class_name: class_name.into(),
            members: RwLock::new(Members::default()),
        }
    }

    pub fn with_member(self, name: impl Into<String>, value: HostValue) -> Self {
        let name: String = name.into();
        self.set_member(&name, value);
        self
    }

    /// Add a function member backed by `operation`.
    pub fn with_function<F>(self, name: &str, operation: F) -> Self
    where
        F: Fn(HostValue, Vec<HostValue>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    {
        let function = FunctionAdapter::new(name, operation).into_value();
        self.with_member(name, function)
    }

    pub fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_ref(self) -> CapabilityRef {
        Arc::new(self)
    }

    pub fn into_value(self) -> HostValue {
        HostValue::Object(self.into_ref())
    }
}

impl fmt::Debug for DataObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataObject({}, {:?})", self.class_name, self.member_names())
    }
}

impl CapabilityObject for DataObject {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn get_member(&self, name: &str) -> Option<HostValue> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .get(name)
            .cloned()
    }

    fn set_member(&self, name: &str, value: HostValue) {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.values.insert(name.to_string(), value).is_none() {
            members.order.push(name.to_string());
        }
    }

    fn has_member(&self, name: &str) -> bool {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values
            .contains_key(name)
    }

    fn remove_member(&self, name: &str) {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        if members.values.remove(name).is_some() {
            members.order.retain(|n| n != name);
        }
    }

    fn member_names(&self) -> Vec<String> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .order
            .clone()
    }

    fn values(&self) -> Vec<HostValue> {
        let members = self.members.read().unwrap_or_else(PoisonError::into_inner);
        members
            .order
            .iter()
            .filter_map(|n| members.values.get(n).cloned())
            .collect()
    }
}
