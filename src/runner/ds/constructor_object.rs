use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::error::{BridgeError, HostError};
use crate::runner::ds::value::HostValue;

/// Signature of a host operation that builds a new `T` from script arguments.
pub type HostCtor<T> = dyn Fn(Vec<HostValue>) -> Result<T, HostError> + Send + Sync;

/// Exposes construction of a host type `T` to scripts (`new Name(...)`).
///
/// Instance checks compare the concrete Rust type of a value against `T`,
/// so only values this constructor (or another constructor of the same `T`)
/// produced are instances.
pub struct ConstructorAdapter<T> {
    name: String,
    operation: Arc<HostCtor<T>>,
}

impl<T: CapabilityObject> ConstructorAdapter<T> {
    pub fn new<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(Vec<HostValue>) -> Result<T, HostError> + Send + Sync + 'static,
    {
        ConstructorAdapter {
            name: name.into(),
            operation: Arc::new(operation),
        }
    }

    pub fn from_shared(name: impl Into<String>, operation: Arc<HostCtor<T>>) -> Self {
        ConstructorAdapter {
            name: name.into(),
            operation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_ref(self) -> CapabilityRef {
        Arc::new(self)
    }

    pub fn into_value(self) -> HostValue {
        HostValue::Object(self.into_ref())
    }
}

impl<T> Clone for ConstructorAdapter<T> {
    fn clone(&self) -> Self {
        ConstructorAdapter {
            name: self.name.clone(),
            operation: self.operation.clone(),
        }
    }
}

impl<T> fmt::Debug for ConstructorAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConstructorAdapter({})", self.name)
    }
}

impl<T: CapabilityObject> CapabilityObject for ConstructorAdapter<T> {
    fn class_name(&self) -> &str {
        &self.name
    }

    fn display(&self) -> String {
        format!("function {}() {{ [native code] }}", self.name)
    }

    fn is_constructible(&self) -> bool {
        true
    }

    fn construct(&self, args: Vec<HostValue>) -> Result<CapabilityRef, BridgeError> {
        let instance = (self.operation)(args).map_err(|source| BridgeError::HostOperationFailure {
            operation: format!("new {}", self.name),
            source,
        })?;
        Ok(Arc::new(instance))
    }

    fn is_instance(&self, value: &HostValue) -> bool {
        match value {
            HostValue::Object(o) => (**o).as_any().is::<T>(),
            _ => false,
        }
    }

    fn is_instance_of(&self, class: TypeId) -> bool {
        class == TypeId::of::<T>()
    }
}
