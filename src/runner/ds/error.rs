use std::fmt;
use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::runner::plugin::config::ConfigError;

/// Failure raised by a wrapped host operation.
pub type HostError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An ambient resource a component may need at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    BindingsScope,
    ExecutionContext,
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Resource::BindingsScope => write!(f, "bindings scope"),
            Resource::ExecutionContext => write!(f, "execution context"),
        }
    }
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0} is not defined")]
    ComponentNotFound(String),

    #[error("{0} is not available in server mode")]
    ComponentUnavailable(String),

    #[error("{name} requires a {resource} but none was supplied")]
    ComponentMisconfigured { name: String, resource: Resource },

    #[error("{target} does not support {operation}")]
    UnsupportedOperation {
        operation: &'static str,
        target: String,
    },

    #[error("host operation `{operation}` failed: {source}")]
    HostOperationFailure {
        operation: String,
        #[source]
        source: HostError,
    },

    #[error("component {0} is already registered")]
    DuplicateComponent(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BridgeError {
    pub fn unsupported(operation: &'static str, target: impl Into<String>) -> Self {
        BridgeError::UnsupportedOperation {
            operation,
            target: target.into(),
        }
    }

    pub fn host_failure(operation: impl Into<String>, source: impl Into<HostError>) -> Self {
        BridgeError::HostOperationFailure {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// The error class a script sees when this failure crosses the boundary.
    pub fn script_error_kind(&self) -> ScriptErrorKind {
        match self {
            BridgeError::ComponentNotFound(_) => ScriptErrorKind::ReferenceError,
            BridgeError::UnsupportedOperation { .. } => ScriptErrorKind::TypeError,
            _ => ScriptErrorKind::Error,
        }
    }

    pub fn to_script_message(&self) -> String {
        format!("Uncaught {}: {}.", self.script_error_kind(), self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptErrorKind {
    ReferenceError,
    TypeError,
    Error,
}

impl Display for ScriptErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptErrorKind::ReferenceError => write!(f, "reference error"),
            ScriptErrorKind::TypeError => write!(f, "type error"),
            ScriptErrorKind::Error => write!(f, "error"),
        }
    }
}
