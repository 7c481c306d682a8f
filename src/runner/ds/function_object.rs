use std::fmt;
use std::sync::Arc;

use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::error::{BridgeError, HostError};
use crate::runner::ds::value::HostValue;

/// Signature of a host operation exposed as a script function.
/// Receives the receiver (`this`) and the argument list.
pub type HostFn = dyn Fn(HostValue, Vec<HostValue>) -> Result<HostValue, HostError> + Send + Sync;

/// Exposes a host operation as a strict script function.
///
/// Holds nothing but a shared reference to the operation, so cloning the
/// adapter or building many adapters over one operation is cheap.
#[derive(Clone)]
pub struct FunctionAdapter {
    name: String,
    operation: Arc<HostFn>,
}

impl FunctionAdapter {
    pub fn new<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(HostValue, Vec<HostValue>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    {
        FunctionAdapter {
            name: name.into(),
            operation: Arc::new(operation),
        }
    }

    pub fn from_shared(name: impl Into<String>, operation: Arc<HostFn>) -> Self {
        FunctionAdapter {
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

impl fmt::Debug for FunctionAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FunctionAdapter({})", self.name)
    }
}

impl CapabilityObject for FunctionAdapter {
    fn class_name(&self) -> &str {
        "Function"
    }

    fn display(&self) -> String {
        format!("function {}() {{ [native code] }}", self.name)
    }

    fn is_function(&self) -> bool {
        true
    }

    fn is_strict_function(&self) -> bool {
        true
    }

    fn call(&self, this: HostValue, args: Vec<HostValue>) -> Result<HostValue, BridgeError> {
        (self.operation)(this, args).map_err(|source| BridgeError::HostOperationFailure {
            operation: self.name.clone(),
            source,
        })
    }
}
