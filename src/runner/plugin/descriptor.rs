//! Declarative component metadata.

use std::fmt;
use std::sync::Arc;

use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::constructor_object::{ConstructorAdapter, HostCtor};
use crate::runner::ds::error::{BridgeError, HostError};
use crate::runner::ds::function_object::{FunctionAdapter, HostFn};
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::types::Activation;

/// Builds a live instance of a component.
pub type ComponentFactory =
    dyn Fn(&Activation) -> Result<CapabilityRef, BridgeError> + Send + Sync;

/// Everything the registry needs to know about one component.
///
/// The lifecycle flags are fixed once the descriptor is registered.
/// Defaults: per-activation, no injected resources, available in server mode.
pub struct ComponentDescriptor {
    name: String,
    requires_bindings_scope: bool,
    requires_execution_context: bool,
    is_singleton: bool,
    available_in_server_mode: bool,
    factory: Box<ComponentFactory>,
}

impl ComponentDescriptor {
    /// A per-activation component, available in both modes, needing no
    /// resources. The builder methods below change those defaults.
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&Activation) -> Result<CapabilityRef, BridgeError> + Send + Sync + 'static,
    {
        ComponentDescriptor {
            name: name.into(),
            requires_bindings_scope: false,
            requires_execution_context: false,
            is_singleton: false,
            available_in_server_mode: true,
            factory: Box::new(factory),
        }
    }

    /// A component whose instance is a script function.
    pub fn function<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(HostValue, Vec<HostValue>) -> Result<HostValue, HostError> + Send + Sync + 'static,
    {
        let name = name.into();
        let operation: Arc<HostFn> = Arc::new(operation);
        let fn_name = name.clone();
        ComponentDescriptor::new(name, move |_| {
            Ok(FunctionAdapter::from_shared(fn_name.clone(), operation.clone()).into_ref())
        })
    }

    /// A component whose instance is a constructor of `T`.
    pub fn constructor<T, F>(name: impl Into<String>, operation: F) -> Self
    where
        T: CapabilityObject,
        F: Fn(Vec<HostValue>) -> Result<T, HostError> + Send + Sync + 'static,
    {
        let name = name.into();
        let operation: Arc<HostCtor<T>> = Arc::new(operation);
        let ctor_name = name.clone();
        ComponentDescriptor::new(name, move |_| {
            Ok(ConstructorAdapter::from_shared(ctor_name.clone(), operation.clone()).into_ref())
        })
    }

    /// Build the instance once and share it between activations.
    pub fn singleton(mut self) -> Self {
        self.is_singleton = true;
        self
    }

    /// The factory reads the bindings scope of the activation.
    pub fn requires_bindings_scope(mut self) -> Self {
        self.requires_bindings_scope = true;
        self
    }

    /// The factory reads the execution context of the activation.
    pub fn requires_execution_context(mut self) -> Self {
        self.requires_execution_context = true;
        self
    }

    /// Only usable in one-shot script runs, never inside a long-lived server.
    pub fn one_shot_only(mut self) -> Self {
        self.available_in_server_mode = false;
        self
    }

    /// The name scripts see.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// See [`ComponentDescriptor::requires_bindings_scope`].
    pub fn needs_bindings_scope(&self) -> bool {
        self.requires_bindings_scope
    }

    /// See [`ComponentDescriptor::requires_execution_context`].
    pub fn needs_execution_context(&self) -> bool {
        self.requires_execution_context
    }

    /// See [`ComponentDescriptor::singleton`].
    pub fn is_singleton(&self) -> bool {
        self.is_singleton
    }

    /// False after [`ComponentDescriptor::one_shot_only`].
    pub fn available_in_server_mode(&self) -> bool {
        self.available_in_server_mode
    }

    /// Can the component be resolved in the given mode?
    pub fn is_available(&self, server_mode: bool) -> bool {
        self.available_in_server_mode || !server_mode
    }

    pub(crate) fn build(&self, activation: &Activation) -> Result<CapabilityRef, BridgeError> {
        (self.factory)(activation)
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("requires_bindings_scope", &self.requires_bindings_scope)
            .field("requires_execution_context", &self.requires_execution_context)
            .field("is_singleton", &self.is_singleton)
            .field("available_in_server_mode", &self.available_in_server_mode)
            .finish()
    }
}
