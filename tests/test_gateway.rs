//! Tests for installing components into a global namespace and dispatching
//! script calls through the gateway.

extern crate just_bridge;

use just_bridge::runner::ds::capability::{same_object, CapabilityObject};
use just_bridge::runner::ds::error::BridgeError;
use just_bridge::runner::ds::value::HostValue;
use just_bridge::runner::plugin::gateway::{instantiate, invoke, invoke_member, SkipReason};
use just_bridge::runner::plugin::{
    BindingsScope, BridgeConfig, ComponentDescriptor, ComponentRegistry, ExecutionContext,
    GlobalNamespace, GlobalScope, HostBindingGateway, Resources,
};
use std::sync::Arc;

struct Ticket {
    seat: String,
}

impl CapabilityObject for Ticket {
    fn class_name(&self) -> &str {
        "Ticket"
    }

    fn get_member(&self, name: &str) -> Option<HostValue> {
        match name {
            "seat" => Some(HostValue::String(self.seat.clone())),
            _ => None,
        }
    }
}

fn registry(config: BridgeConfig) -> ComponentRegistry {
    let mut registry = ComponentRegistry::new(config);
    registry
        .register(ComponentDescriptor::function("greet", |_this, args| {
            let who = args.first().cloned().unwrap_or(HostValue::from("world"));
            Ok(HostValue::String(format!("hello {}", who)))
        }))
        .unwrap();
    registry
        .register(
            ComponentDescriptor::constructor("Ticket", |args: Vec<HostValue>| {
                let seat = args.first().map(|v| v.to_string()).unwrap_or_default();
                Ok(Ticket { seat })
            })
            .singleton(),
        )
        .unwrap();
    registry
        .register(
            ComponentDescriptor::function("exit", |_, _| Ok(HostValue::Undefined)).one_shot_only(),
        )
        .unwrap();
    registry
}

fn resources() -> Resources {
    Resources::new()
        .with_bindings(Arc::new(BindingsScope::new()))
        .with_context(Arc::new(ExecutionContext::new()))
}

// ── Installation ─────────────────────────────────────────────────────

#[test]
fn test_install_binds_every_component() {
    let registry = registry(BridgeConfig::new());
    let mut scope = GlobalScope::new("global");
    let report = HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    assert_eq!(report.installed, vec!["greet", "Ticket", "exit"]);
    assert!(report.skipped.is_empty());
    assert_eq!(scope.names(), &["greet", "Ticket", "exit"]);
}

#[test]
fn test_install_skips_unavailable_in_server_mode() {
    let registry = registry(BridgeConfig::server());
    let mut scope = GlobalScope::new("global");
    let report = HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    assert_eq!(report.installed, vec!["greet", "Ticket"]);
    assert_eq!(report.skipped, vec![("exit".to_string(), SkipReason::Unavailable)]);
    assert!(!scope.has_binding("exit"));
    assert!(matches!(scope.lookup("exit"), Err(BridgeError::ComponentNotFound(_))));
}

#[test]
fn test_install_leaves_existing_bindings_alone() {
    let registry = registry(BridgeConfig::new());
    let mut scope = GlobalScope::new("global");
    scope.define_binding("greet", HostValue::from("user defined"));

    let report = HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    assert_eq!(report.skipped, vec![("greet".to_string(), SkipReason::AlreadyBound)]);
    assert_eq!(scope.get_binding("greet"), Some(HostValue::from("user defined")));
}

#[test]
fn test_install_propagates_misconfiguration() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(
            ComponentDescriptor::function("whoami", |_, _| Ok(HostValue::Undefined))
                .requires_execution_context(),
        )
        .unwrap();
    let mut scope = GlobalScope::new("global");
    let err = HostBindingGateway::new(&registry)
        .install(&mut scope, &Resources::new())
        .unwrap_err();
    assert!(matches!(err, BridgeError::ComponentMisconfigured { .. }));
    assert!(scope.is_empty());
}

#[test]
fn test_install_one() {
    let registry = registry(BridgeConfig::new());
    let gateway = HostBindingGateway::new(&registry);
    let mut scope = GlobalScope::new("global");

    assert!(gateway.install_one(&mut scope, "greet", &resources()).unwrap());
    assert!(!gateway.install_one(&mut scope, "greet", &resources()).unwrap());
    assert!(gateway.install_one(&mut scope, "missing", &resources()).is_err());
    assert_eq!(scope.len(), 1);
}

#[test]
fn test_singleton_shared_across_namespaces() {
    let registry = registry(BridgeConfig::server());
    let gateway = HostBindingGateway::new(&registry);
    let mut first = GlobalScope::new("first");
    let mut second = GlobalScope::new("second");
    gateway.install(&mut first, &resources()).unwrap();
    gateway.install(&mut second, &resources()).unwrap();

    let a = first.lookup("Ticket").unwrap();
    let b = second.lookup("Ticket").unwrap();
    assert!(same_object(a.as_object().unwrap(), b.as_object().unwrap()));

    let f = first.lookup("greet").unwrap();
    let g = second.lookup("greet").unwrap();
    assert!(!same_object(f.as_object().unwrap(), g.as_object().unwrap()));
}

// ── Dispatch ─────────────────────────────────────────────────────────

#[test]
fn test_invoke_function() {
    let registry = registry(BridgeConfig::new());
    let mut scope = GlobalScope::new("global");
    HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    let greet = scope.lookup("greet").unwrap();
    let result = invoke(&greet, HostValue::Undefined, vec![HostValue::from("ada")]).unwrap();
    assert_eq!(result, HostValue::from("hello ada"));
}

#[test]
fn test_instantiate_constructor() {
    let registry = registry(BridgeConfig::new());
    let mut scope = GlobalScope::new("global");
    HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    let ctor = scope.lookup("Ticket").unwrap();
    let ticket = instantiate(&ctor, vec![HostValue::from("12A")]).unwrap();
    assert_eq!(ticket.as_object().unwrap().get_member("seat"), Some(HostValue::from("12A")));
    assert!(ctor.as_object().unwrap().is_instance(&ticket));
    assert_eq!(ticket.to_string(), "[object Ticket]");
}

#[test]
fn test_wrong_role_is_type_error() {
    let registry = registry(BridgeConfig::new());
    let mut scope = GlobalScope::new("global");
    HostBindingGateway::new(&registry)
        .install(&mut scope, &resources())
        .unwrap();

    let greet = scope.lookup("greet").unwrap();
    let ctor = scope.lookup("Ticket").unwrap();
    let err = instantiate(&greet, vec![]).unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedOperation { operation: "construct", .. }));
    let err = invoke(&ctor, HostValue::Undefined, vec![]).unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedOperation { operation: "call", .. }));
}

#[test]
fn test_invoke_primitive_is_type_error() {
    let err = invoke(&HostValue::integer(3), HostValue::Undefined, vec![]).unwrap_err();
    assert!(err.to_script_message().starts_with("Uncaught type error: "));
    assert!(instantiate(&HostValue::Null, vec![]).is_err());
}

#[test]
fn test_invoke_member_missing() {
    let registry = registry(BridgeConfig::new());
    let ticket = registry
        .resolve("Ticket", &Resources::new())
        .unwrap()
        .construct(vec![HostValue::from("1B")])
        .unwrap();
    let err = invoke_member(&HostValue::Object(ticket), "refund", vec![]).unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedOperation { operation: "call", .. }));
}
