//! Component registry and host-binding gateway.
//!
//! Host code declares **components**: named functions, constructors or data
//! objects that scripts can reach as globals. Each component comes with a
//! [`ComponentDescriptor`] stating how it is instantiated:
//!
//! - **singleton** or **per-activation**: shared for the registry's lifetime,
//!   or rebuilt on every resolution;
//! - which ambient resources it needs at construction: the
//!   [`BindingsScope`] of the script environment and/or the per-invocation
//!   [`ExecutionContext`];
//! - whether it may run in **server mode** (a long-lived process serving
//!   many requests) or only in a one-shot script run.
//!
//! ### Resolution Flow
//!
//! When the gateway (or host code) asks the [`ComponentRegistry`] for a name:
//!
//! 1. **Lookup**: unknown names fail with `ComponentNotFound`
//! 2. **Mode check**: components disabled in server mode fail with
//!    `ComponentUnavailable`
//! 3. **Resources**: a missing required resource fails with
//!    `ComponentMisconfigured`
//! 4. **Instance**: singletons come from a lock-free slot, built on first
//!    use; everything else is built fresh
//!
//! The [`HostBindingGateway`] then binds the instance into the engine's
//! [`GlobalNamespace`] under its declared name.
//!
//! ## Example
//!
//! ```
//! use just_bridge::runner::plugin::{BridgeConfig, ComponentDescriptor, ComponentRegistry,
//!     GlobalScope, HostBindingGateway, Resources};
//! use just_bridge::runner::plugin::gateway::invoke;
//! use just_bridge::runner::ds::value::HostValue;
//!
//! let mut registry = ComponentRegistry::new(BridgeConfig::new());
//! registry
//!     .register(ComponentDescriptor::function("double", |_this, args| {
//!         let n = args.first().map(|v| v.to_number()).unwrap_or(0.0);
//!         Ok(HostValue::float(n * 2.0))
//!     }))
//!     .unwrap();
//!
//! let mut scope = GlobalScope::new("global");
//! HostBindingGateway::new(&registry)
//!     .install(&mut scope, &Resources::new())
//!     .unwrap();
//!
//! let double = scope.lookup("double").unwrap();
//! let result = invoke(&double, HostValue::Undefined, vec![HostValue::integer(21)]).unwrap();
//! assert_eq!(result, HostValue::integer(42));
//! ```

pub mod config;
pub mod descriptor;
pub mod gateway;
pub mod lifecycle;
pub mod registry;
pub mod resolver;
pub mod super_global;
pub mod types;

pub use config::BridgeConfig;
pub use descriptor::ComponentDescriptor;
pub use gateway::HostBindingGateway;
pub use lifecycle::LifecycleHooks;
pub use registry::ComponentRegistry;
pub use resolver::GlobalNamespace;
pub use super_global::GlobalScope;
pub use types::{Activation, BindingsScope, ExecutionContext, Resources};
