use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::value::HostValue;

lazy_static! {
    pub static ref ARRAY_LENGTH_PROP: String = "length".to_string();
}

/// Largest length a slot write may grow an array to. Writes past it are
/// ignored.
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Array-shaped data: indexed slots plus a read-only `length` member.
pub struct ArrayObject {
    elements: RwLock<Vec<HostValue>>,
}

impl ArrayObject {
    pub fn new() -> Self {
        ArrayObject::from_values(Vec::new())
    }

    pub fn from_values(values: Vec<HostValue>) -> Self {
        ArrayObject {
            elements: RwLock::new(values),
        }
    }

    pub fn len(&self) -> usize {
        self.elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&self, value: HostValue) {
        self.elements
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(value);
    }

    pub fn into_ref(self) -> CapabilityRef {
        Arc::new(self)
    }

    pub fn into_value(self) -> HostValue {
        HostValue::Object(self.into_ref())
    }
}

impl Default for ArrayObject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ArrayObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayObject({:?})", self.values())
    }
}

impl CapabilityObject for ArrayObject {
    fn class_name(&self) -> &str {
        "Array"
    }

    fn display(&self) -> String {
        self.values()
            .iter()
            .map(|v| if v.is_nullish() { String::new() } else { v.to_string() })
            .collect::<Vec<_>>()
            .join(",")
    }

    fn is_array(&self) -> bool {
        true
    }

    fn get_member(&self, name: &str) -> Option<HostValue> {
        if name == ARRAY_LENGTH_PROP.as_str() {
            Some(HostValue::integer(self.len() as i64))
        } else {
            name.parse::<usize>().ok().and_then(|i| self.get_slot(i))
        }
    }

    fn has_member(&self, name: &str) -> bool {
        name == ARRAY_LENGTH_PROP.as_str()
            || name.parse::<usize>().map(|i| self.has_slot(i)).unwrap_or(false)
    }

    fn set_member(&self, name: &str, value: HostValue) {
        if let Ok(i) = name.parse::<usize>() {
            self.set_slot(i, value);
        }
    }

    fn get_slot(&self, index: usize) -> Option<HostValue> {
        self.elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    /// Writing past the end pads the gap with `undefined`, up to
    /// [`MAX_ARRAY_LENGTH`] elements.
    fn set_slot(&self, index: usize, value: HostValue) {
        let mut elements = self.elements.write().unwrap_or_else(PoisonError::into_inner);
        if index >= elements.len() {
            match index.checked_add(1) {
                Some(len) if len <= MAX_ARRAY_LENGTH => elements.resize(len, HostValue::Undefined),
                _ => return,
            }
        }
        elements[index] = value;
    }

    fn has_slot(&self, index: usize) -> bool {
        index < self.len()
    }

    fn member_names(&self) -> Vec<String> {
        (0..self.len()).map(|i| i.to_string()).collect()
    }

    fn values(&self) -> Vec<HostValue> {
        self.elements
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
