//! # just-bridge - host capability bridge for the just JavaScript engine
//!
//! Lets host code expose native functions, constructors and stateful
//! services to scripts as ordinary script values:
//! - A uniform capability protocol every bridged value implements
//! - Function and constructor adapters over plain Rust closures
//! - A component registry with singleton / per-activation lifecycles,
//!   resource injection and server-mode gating
//! - A gateway that installs components into the engine's global namespace
//!
//! ## Quick Start
//!
//! ### Exposing a function
//!
//! ```
//! use just_bridge::runner::plugin::{BridgeConfig, ComponentDescriptor, ComponentRegistry, Resources};
//! use just_bridge::runner::plugin::gateway::invoke;
//! use just_bridge::runner::ds::value::HostValue;
//!
//! let mut registry = ComponentRegistry::new(BridgeConfig::new());
//! registry
//!     .register(ComponentDescriptor::function("echo", |_this, args| {
//!         Ok(args.into_iter().next().unwrap_or(HostValue::Undefined))
//!     }))
//!     .unwrap();
//!
//! let echo = registry.resolve("echo", &Resources::new()).unwrap();
//! let out = invoke(&HostValue::Object(echo), HostValue::Undefined, vec!["hi".into()]).unwrap();
//! assert_eq!(out, HostValue::from("hi"));
//! ```
//!
//! ### Sharing state through a singleton
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use just_bridge::runner::plugin::{BridgeConfig, ComponentDescriptor, ComponentRegistry, Resources};
//! use just_bridge::runner::plugin::gateway::invoke_member;
//! use just_bridge::runner::ds::data_object::DataObject;
//! use just_bridge::runner::ds::value::HostValue;
//!
//! let mut registry = ComponentRegistry::new(BridgeConfig::server());
//! registry
//!     .register(
//!         ComponentDescriptor::new("Counter", |_| {
//!             let count = Arc::new(AtomicI64::new(0));
//!             Ok(DataObject::new("Counter")
//!                 .with_function("increment", move |_, _| {
//!                     Ok(HostValue::integer(count.fetch_add(1, Ordering::SeqCst) + 1))
//!                 })
//!                 .into_ref())
//!         })
//!         .singleton(),
//!     )
//!     .unwrap();
//!
//! let a = HostValue::Object(registry.resolve("Counter", &Resources::new()).unwrap());
//! let b = HostValue::Object(registry.resolve("Counter", &Resources::new()).unwrap());
//! assert_eq!(invoke_member(&a, "increment", vec![]).unwrap(), HostValue::integer(1));
//! assert_eq!(invoke_member(&b, "increment", vec![]).unwrap(), HostValue::integer(2));
//! ```
//!
//! ## Architecture
//!
//! - **[`runner::ds`]** - Values, the capability protocol, adapters, atomic slot
//! - **[`runner::plugin`]** - Descriptors, registry, configuration, gateway
//! - **[`runner::std_lib`]** - `console`, `Json`, `sleep`, `sync`, `Lock`, `ReadWriteLock`

#[macro_use]
extern crate lazy_static;

pub mod runner;
