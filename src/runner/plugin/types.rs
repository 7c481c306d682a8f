//! Ambient resources handed to components at construction time.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::runner::ds::error::{BridgeError, Resource};
use crate::runner::ds::value::HostValue;

/// Ambient key-value scope shared by everything evaluated in one script
/// environment.
#[derive(Default)]
pub struct BindingsScope {
    entries: RwLock<HashMap<String, HostValue>>,
}

impl BindingsScope {
    pub fn new() -> Self {
        BindingsScope::default()
    }

    pub fn get(&self, name: &str) -> Option<HostValue> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn put(&self, name: impl Into<String>, value: HostValue) -> Option<HostValue> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value)
    }

    /// Return the value under `name`, inserting `init()` first if absent.
    /// Check and insert happen under one write guard.
    pub fn get_or_insert_with<F>(&self, name: &str, init: F) -> HostValue
    where
        F: FnOnce() -> HostValue,
    {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_insert_with(init)
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn remove(&self, name: &str) -> Option<HostValue> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

/// Per-invocation request/response context.
pub struct ExecutionContext {
    id: String,
    attributes: RwLock<HashMap<String, HostValue>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        ExecutionContext::with_id(Uuid::new_v4().to_hyphenated().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        ExecutionContext {
            id: id.into(),
            attributes: RwLock::new(HashMap::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attribute(&self, name: &str) -> Option<HostValue> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: HostValue) {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value);
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Resources the caller has on hand for one resolution.
#[derive(Clone, Default)]
pub struct Resources {
    pub bindings: Option<Arc<BindingsScope>>,
    pub context: Option<Arc<ExecutionContext>>,
}

impl Resources {
    pub fn new() -> Self {
        Resources::default()
    }

    pub fn with_bindings(mut self, bindings: Arc<BindingsScope>) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn with_context(mut self, context: Arc<ExecutionContext>) -> Self {
        self.context = Some(context);
        self
    }
}

/// What a component factory receives: only the resources its descriptor
/// asked for, plus the process mode.
pub struct Activation {
    component: String,
    bindings: Option<Arc<BindingsScope>>,
    context: Option<Arc<ExecutionContext>>,
    server_mode: bool,
}

impl Activation {
    pub(crate) fn new(
        component: &str,
        bindings: Option<Arc<BindingsScope>>,
        context: Option<Arc<ExecutionContext>>,
        server_mode: bool,
    ) -> Self {
        Activation {
            component: component.to_string(),
            bindings,
            context,
            server_mode,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn server_mode(&self) -> bool {
        self.server_mode
    }

    pub fn bindings(&self) -> Result<&Arc<BindingsScope>, BridgeError> {
        self.bindings
            .as_ref()
            .ok_or_else(|| BridgeError::ComponentMisconfigured {
                name: self.component.clone(),
                resource: Resource::BindingsScope,
            })
    }

    pub fn context(&self) -> Result<&Arc<ExecutionContext>, BridgeError> {
        self.context
            .as_ref()
            .ok_or_else(|| BridgeError::ComponentMisconfigured {
                name: self.component.clone(),
                resource: Resource::ExecutionContext,
            })
    }
}
