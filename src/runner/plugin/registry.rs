//! Component registry: turns a declared name plus the caller's resources
//! into a live capability object, under each component's lifecycle policy.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::runner::ds::atomic_slot::AtomicSlot;
use crate::runner::ds::capability::{CapabilityObject, CapabilityRef};
use crate::runner::ds::error::{BridgeError, Resource};
use crate::runner::plugin::config::BridgeConfig;
use crate::runner::plugin::descriptor::ComponentDescriptor;
use crate::runner::plugin::lifecycle::LifecycleHooks;
use crate::runner::plugin::types::{Activation, Resources};
use crate::runner::std_lib::register_standard_components;

struct ComponentEntry {
    descriptor: ComponentDescriptor,
    instance: AtomicSlot<dyn CapabilityObject>,
}

/// Registry of bridged components.
///
/// Registration needs `&mut self`, resolution only `&self`: once the registry
/// is shared (typically behind an `Arc`) its descriptor set is frozen. The
/// per-component singleton slot is the only state touched after that, and it
/// is lock-free.
///
/// Required resources are checked on every resolution, cached or not. A
/// singleton that requires an execution context captures the context of its
/// first resolution and keeps it; later resolutions get the cached instance
/// unchanged.
pub struct ComponentRegistry {
    config: BridgeConfig,
    entries: HashMap<String, ComponentEntry>,
    order: Vec<String>,
    hooks: LifecycleHooks,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new(config: BridgeConfig) -> Self {
        ComponentRegistry {
            config,
            entries: HashMap::new(),
            order: Vec::new(),
            hooks: LifecycleHooks::new(),
        }
    }

    /// Create a registry holding the standard components named in `config`.
    pub fn with_standard(config: BridgeConfig) -> Result<Self, BridgeError> {
        let names = config.components.standard.clone();
        let mut registry = Self::new(config);
        register_standard_components(&mut registry, &names)?;
        info!(
            components = registry.order.len(),
            server_mode = registry.server_mode(),
            "component registry ready"
        );
        Ok(registry)
    }

    /// Add a component. Names are unique; a second registration under the
    /// same name fails with [`BridgeError::DuplicateComponent`].
    pub fn register(&mut self, descriptor: ComponentDescriptor) -> Result<(), BridgeError> {
        let name = descriptor.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(BridgeError::DuplicateComponent(name));
        }
        debug!(component = %name, ?descriptor, "registering component");
        self.order.push(name.clone());
        self.entries.insert(
            name,
            ComponentEntry {
                descriptor,
                instance: AtomicSlot::new(),
            },
        );
        Ok(())
    }

    /// The instance scripts should see for `name`.
    ///
    /// Fails with `ComponentNotFound` for unknown names, `ComponentUnavailable`
    /// for one-shot components in server mode, and `ComponentMisconfigured`
    /// when `resources` lacks something the descriptor requires. Singletons
    /// are built once and shared; other components are built per call.
    pub fn resolve(&self, name: &str, resources: &Resources) -> Result<CapabilityRef, BridgeError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| BridgeError::ComponentNotFound(name.to_string()))?;
        let descriptor = &entry.descriptor;
        let server_mode = self.server_mode();

        debug!(
            component = name,
            singleton = descriptor.is_singleton(),
            server_mode,
            "resolving component"
        );

        if !descriptor.is_available(server_mode) {
            return Err(BridgeError::ComponentUnavailable(name.to_string()));
        }

        let activation = self.activation(descriptor, resources)?;

        if descriptor.is_singleton() {
            if let Some(instance) = entry.instance.get() {
                return Ok(instance);
            }
            let (instance, installed) = entry
                .instance
                .get_or_try_install_with(|| descriptor.build(&activation))?;
            if installed {
                debug!(component = name, "singleton instance installed");
            } else {
                debug!(component = name, "singleton already installed by another thread");
            }
            Ok(instance)
        } else {
            descriptor.build(&activation)
        }
    }

    /// Hand the factory only the resources its descriptor asks for.
    fn activation(
        &self,
        descriptor: &ComponentDescriptor,
        resources: &Resources,
    ) -> Result<Activation, BridgeError> {
        let bindings = if descriptor.needs_bindings_scope() {
            Some(resources.bindings.clone().ok_or_else(|| {
                BridgeError::ComponentMisconfigured {
                    name: descriptor.name().to_string(),
                    resource: Resource::BindingsScope,
                }
            })?)
        } else {
            None
        };
        let context = if descriptor.needs_execution_context() {
            Some(resources.context.clone().ok_or_else(|| {
                BridgeError::ComponentMisconfigured {
                    name: descriptor.name().to_string(),
                    resource: Resource::ExecutionContext,
                }
            })?)
        } else {
            None
        };
        Ok(Activation::new(
            descriptor.name(),
            bindings,
            context,
            self.server_mode(),
        ))
    }

    /// Is `name` registered, whatever the mode?
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// The descriptor registered under `name`.
    pub fn descriptor(&self, name: &str) -> Option<&ComponentDescriptor> {
        self.entries.get(name).map(|e| &e.descriptor)
    }

    /// Declared names in registration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Is `name` registered and enabled for the current mode?
    pub fn is_available(&self, name: &str) -> bool {
        self.descriptor(name)
            .map(|d| d.is_available(self.server_mode()))
            .unwrap_or(false)
    }

    /// Whether this registry serves a long-lived server.
    pub fn server_mode(&self) -> bool {
        self.config.server_mode()
    }

    /// The configuration the registry was created with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Startup and shutdown hooks.
    pub fn hooks(&self) -> &LifecycleHooks {
        &self.hooks
    }

    /// Hooks, for registering new ones.
    pub fn hooks_mut(&mut self) -> &mut LifecycleHooks {
        &mut self.hooks
    }
}
