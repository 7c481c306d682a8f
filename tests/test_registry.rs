//! Tests for component registration, resolution and lifecycle policies.

extern crate just_bridge;

use just_bridge::runner::ds::capability::{same_object, CapabilityRef};
use just_bridge::runner::ds::data_object::DataObject;
use just_bridge::runner::ds::error::{BridgeError, Resource, ScriptErrorKind};
use just_bridge::runner::ds::value::HostValue;
use just_bridge::runner::plugin::gateway::invoke_member;
use just_bridge::runner::plugin::{
    BindingsScope, BridgeConfig, ComponentDescriptor, ComponentRegistry, ExecutionContext, Resources,
};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, RwLock};
use std::thread;

/// A component with one mutable counter behind `increment()`.
fn counter_descriptor(name: &str) -> ComponentDescriptor {
    ComponentDescriptor::new(name, |_| {
        let count = Arc::new(AtomicI64::new(0));
        Ok(DataObject::new("Counter")
            .with_function("increment", move |_, _| {
                Ok(HostValue::integer(count.fetch_add(1, Ordering::SeqCst) + 1))
            })
            .into_ref())
    })
}

/// A component that remembers the last value given to `set`.
fn recorder_descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new("Recorder", |_| {
        let last = Arc::new(RwLock::new(HostValue::Undefined));
        let written = last.clone();
        Ok(DataObject::new("Recorder")
            .with_function("set", move |_, args| {
                *written.write().unwrap() = args.into_iter().next().unwrap_or(HostValue::Undefined);
                Ok(HostValue::Undefined)
            })
            .with_function("get", move |_, _| Ok(last.read().unwrap().clone()))
            .into_ref())
    })
}

fn full_resources() -> Resources {
    Resources::new()
        .with_bindings(Arc::new(BindingsScope::new()))
        .with_context(Arc::new(ExecutionContext::new()))
}

fn increment(counter: &CapabilityRef) -> HostValue {
    invoke_member(&HostValue::Object(counter.clone()), "increment", vec![]).unwrap()
}

// ── Lookup and gating ────────────────────────────────────────────────

#[test]
fn test_resolve_unknown_name() {
    for config in vec![BridgeConfig::new(), BridgeConfig::server()] {
        let registry = ComponentRegistry::new(config);
        let err = registry.resolve("Nope", &Resources::new()).err().unwrap();
        assert!(matches!(err, BridgeError::ComponentNotFound(ref n) if n == "Nope"));
        assert_eq!(err.script_error_kind(), ScriptErrorKind::ReferenceError);
        assert_eq!(err.to_script_message(), "Uncaught reference error: Nope is not defined.");
    }
}

#[test]
fn test_one_shot_component_unavailable_in_server_mode() {
    let mut registry = ComponentRegistry::new(BridgeConfig::server());
    registry
        .register(counter_descriptor("Scratch").one_shot_only())
        .unwrap();
    let err = registry.resolve("Scratch", &Resources::new()).err().unwrap();
    assert!(matches!(err, BridgeError::ComponentUnavailable(ref n) if n == "Scratch"));
    assert!(!registry.is_available("Scratch"));
}

#[test]
fn test_one_shot_component_available_outside_server_mode() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(counter_descriptor("Scratch").one_shot_only())
        .unwrap();
    assert!(registry.is_available("Scratch"));
    assert!(registry.resolve("Scratch", &Resources::new()).is_ok());
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry.register(counter_descriptor("Counter")).unwrap();
    let err = registry.register(counter_descriptor("Counter")).unwrap_err();
    assert!(matches!(err, BridgeError::DuplicateComponent(ref n) if n == "Counter"));
    assert_eq!(registry.names(), &["Counter".to_string()]);
}

#[test]
fn test_names_in_registration_order() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    for name in &["b", "a", "c"] {
        registry.register(counter_descriptor(name)).unwrap();
    }
    assert_eq!(registry.names(), &["b", "a", "c"]);
    assert!(registry.contains("a"));
    assert!(!registry.contains("d"));
}

// ── Resource injection ───────────────────────────────────────────────

#[test]
fn test_missing_execution_context_is_misconfigured() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(
            ComponentDescriptor::new("Request", |a| {
                let id = a.context()?.id().to_string();
                Ok(DataObject::new("Request")
                    .with_member("id", HostValue::String(id))
                    .into_ref())
            })
            .requires_execution_context(),
        )
        .unwrap();

    let resources = Resources::new().with_bindings(Arc::new(BindingsScope::new()));
    let err = registry.resolve("Request", &resources).err().unwrap();
    match err {
        BridgeError::ComponentMisconfigured { name, resource } => {
            assert_eq!(name, "Request");
            assert_eq!(resource, Resource::ExecutionContext);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_missing_bindings_scope_is_misconfigured() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(counter_descriptor("Scoped").requires_bindings_scope())
        .unwrap();
    let err = registry.resolve("Scoped", &Resources::new()).err().unwrap();
    assert!(matches!(
        err,
        BridgeError::ComponentMisconfigured {
            resource: Resource::BindingsScope,
            ..
        }
    ));
}

#[test]
fn test_factory_receives_only_requested_resources() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(ComponentDescriptor::new("Inspector", |a| {
            Ok(DataObject::new("Inspector")
                .with_member("bindings", HostValue::Boolean(a.bindings().is_ok()))
                .with_member("context", HostValue::Boolean(a.context().is_ok()))
                .into_ref())
        }))
        .unwrap();
    let inspector = registry.resolve("Inspector", &full_resources()).unwrap();
    assert_eq!(inspector.get_member("bindings"), Some(HostValue::Boolean(false)));
    assert_eq!(inspector.get_member("context"), Some(HostValue::Boolean(false)));
}

#[test]
fn test_factory_sees_injected_bindings() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(
            ComponentDescriptor::new("Greeting", |a| {
                let who = a.bindings()?.get("user").unwrap_or(HostValue::from("nobody"));
                Ok(DataObject::new("Greeting")
                    .with_member("text", HostValue::String(format!("hello {}", who)))
                    .into_ref())
            })
            .requires_bindings_scope(),
        )
        .unwrap();

    let bindings = Arc::new(BindingsScope::new());
    bindings.put("user", HostValue::from("ada"));
    let resources = Resources::new().with_bindings(bindings);
    let greeting = registry.resolve("Greeting", &resources).unwrap();
    assert_eq!(greeting.get_member("text"), Some(HostValue::from("hello ada")));
}

#[test]
fn test_singleton_pins_first_execution_context() {
    let mut registry = ComponentRegistry::new(BridgeConfig::server());
    registry
        .register(
            ComponentDescriptor::new("Request", |a| {
                let id = a.context()?.id().to_string();
                Ok(DataObject::new("Request")
                    .with_member("id", HostValue::String(id))
                    .into_ref())
            })
            .requires_execution_context()
            .singleton(),
        )
        .unwrap();

    let first = Resources::new().with_context(Arc::new(ExecutionContext::with_id("req-1")));
    let second = Resources::new().with_context(Arc::new(ExecutionContext::with_id("req-2")));
    let a = registry.resolve("Request", &first).unwrap();
    let b = registry.resolve("Request", &second).unwrap();
    assert!(same_object(&a, &b));
    assert_eq!(b.get_member("id"), Some(HostValue::from("req-1")));

    // Still checked once cached.
    assert!(registry.resolve("Request", &Resources::new()).is_err());
}

#[test]
fn test_factory_failure_propagates_and_singleton_retries() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let seen = attempts.clone();
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(
            ComponentDescriptor::new("Flaky", move |_| {
                if seen.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(BridgeError::host_failure("connect", "refused"))
                } else {
                    Ok(DataObject::new("Flaky").into_ref())
                }
            })
            .singleton(),
        )
        .unwrap();

    let err = registry.resolve("Flaky", &Resources::new()).err().unwrap();
    assert!(matches!(err, BridgeError::HostOperationFailure { .. }));
    assert!(registry.resolve("Flaky", &Resources::new()).is_ok());
    assert!(registry.resolve("Flaky", &Resources::new()).is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

// ── Lifecycle policies ───────────────────────────────────────────────

#[test]
fn test_singleton_resolves_to_same_instance() {
    let mut registry = ComponentRegistry::new(BridgeConfig::server());
    registry
        .register(counter_descriptor("Counter").singleton())
        .unwrap();
    let a = registry.resolve("Counter", &Resources::new()).unwrap();
    let b = registry.resolve("Counter", &Resources::new()).unwrap();
    assert!(same_object(&a, &b));
}

#[test]
fn test_singleton_counter_shares_state() {
    let mut registry = ComponentRegistry::new(BridgeConfig::server());
    registry
        .register(counter_descriptor("Counter").singleton())
        .unwrap();

    let first = registry.resolve("Counter", &Resources::new()).unwrap();
    assert_eq!(increment(&first), HostValue::integer(1));
    assert_eq!(increment(&first), HostValue::integer(2));

    let second = registry.resolve("Counter", &Resources::new()).unwrap();
    assert_eq!(increment(&second), HostValue::integer(3));
    assert_eq!(increment(&second), HostValue::integer(4));
}

#[test]
fn test_per_activation_echo_scenario() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry
        .register(ComponentDescriptor::function("Echo", |_, args| {
            Ok(args.into_iter().next().unwrap_or(HostValue::Undefined))
        }))
        .unwrap();

    let a = registry.resolve("Echo", &Resources::new()).unwrap();
    let b = registry.resolve("Echo", &Resources::new()).unwrap();
    assert!(!same_object(&a, &b));
    assert_eq!(a.call(HostValue::Undefined, vec![HostValue::from("a")]).unwrap(), HostValue::from("a"));
    assert_eq!(b.call(HostValue::Undefined, vec![HostValue::from("b")]).unwrap(), HostValue::from("b"));
}

#[test]
fn test_per_activation_instances_are_independently_mutable() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry.register(recorder_descriptor()).unwrap();

    let a = HostValue::Object(registry.resolve("Recorder", &Resources::new()).unwrap());
    let b = HostValue::Object(registry.resolve("Recorder", &Resources::new()).unwrap());
    assert_ne!(a, b);

    invoke_member(&a, "set", vec![HostValue::from("a")]).unwrap();
    invoke_member(&b, "set", vec![HostValue::from("b")]).unwrap();
    assert_eq!(invoke_member(&a, "get", vec![]).unwrap(), HostValue::from("a"));
    assert_eq!(invoke_member(&b, "get", vec![]).unwrap(), HostValue::from("b"));
}

#[test]
fn test_per_activation_counter_starts_fresh() {
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    registry.register(counter_descriptor("Counter")).unwrap();

    let a = registry.resolve("Counter", &Resources::new()).unwrap();
    assert_eq!(increment(&a), HostValue::integer(1));
    assert_eq!(increment(&a), HostValue::integer(2));
    let b = registry.resolve("Counter", &Resources::new()).unwrap();
    assert_eq!(increment(&b), HostValue::integer(1));
}

#[test]
fn test_concurrent_singleton_resolution_yields_one_instance() {
    const THREADS: usize = 16;

    let builds = Arc::new(AtomicUsize::new(0));
    let counted = builds.clone();
    let mut registry = ComponentRegistry::new(BridgeConfig::server());
    registry
        .register(
            ComponentDescriptor::new("Shared", move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                Ok(DataObject::new("Shared").into_ref())
            })
            .singleton(),
        )
        .unwrap();

    let registry = Arc::new(registry);
    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.resolve("Shared", &Resources::new()).unwrap()
            })
        })
        .collect();

    let instances: Vec<CapabilityRef> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for instance in &instances {
        assert!(same_object(instance, &instances[0]));
    }
    assert!(builds.load(Ordering::SeqCst) >= 1);

    let later = registry.resolve("Shared", &Resources::new()).unwrap();
    assert!(same_object(&later, &instances[0]));
}

// ── Standard components and hooks ────────────────────────────────────

#[test]
fn test_with_standard_registers_configured_components() {
    let registry =
        ComponentRegistry::with_standard(BridgeConfig::new().with_standard_components(&["Json", "sleep"]))
            .unwrap();
    assert_eq!(registry.names(), &["Json", "sleep"]);
}

#[test]
fn test_with_standard_all_available_in_server_mode() {
    let registry = ComponentRegistry::with_standard(BridgeConfig::server()).unwrap();
    assert_eq!(registry.names().len(), 6);
    for name in registry.names() {
        assert!(registry.is_available(name), "{} should be available", name);
    }
}

#[test]
fn test_lifecycle_hooks_run_in_order_and_continue_after_failure() {
    let log = Arc::new(std::sync::Mutex::new(Vec::new()));
    let mut registry = ComponentRegistry::new(BridgeConfig::new());
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    registry.hooks_mut().on_startup("first", move || {
        l1.lock().unwrap().push("first");
        Ok(())
    });
    registry.hooks_mut().on_startup("broken", move || {
        l2.lock().unwrap().push("broken");
        Err("no database".into())
    });
    registry.hooks_mut().on_startup("last", move || {
        l3.lock().unwrap().push("last");
        Ok(())
    });

    assert_eq!(registry.hooks().run_startup(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["first", "broken", "last"]);
    assert_eq!(registry.hooks().run_shutdown(), 0);
}
