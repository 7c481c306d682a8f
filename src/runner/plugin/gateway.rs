//! Host-binding gateway: puts resolved components into the engine's global
//! namespace and routes script calls back into them.
//!
//! ```text
//! registry.resolve(name) ──► gateway.install ──► namespace["name"]
//!                                                      │
//!           script: name(args) / new name(args) ◄──────┘
//!                        │
//!            invoke / instantiate ──► CapabilityObject::call / construct
//! ```

use tracing::debug;

use crate::runner::ds::error::BridgeError;
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::registry::ComponentRegistry;
use crate::runner::plugin::resolver::GlobalNamespace;
use crate::runner::plugin::types::Resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The namespace already had a binding with this name.
    AlreadyBound,
    /// The component is disabled in the current process mode.
    Unavailable,
}

#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

pub struct HostBindingGateway<'r> {
    registry: &'r ComponentRegistry,
}

impl<'r> HostBindingGateway<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        HostBindingGateway { registry }
    }

    /// Resolve every registered component and bind it under its declared
    /// name, in registration order.
    ///
    /// Names the namespace already binds are left alone, and components
    /// disabled for the current mode are not installed. Any other resolution
    /// failure aborts the install and is returned.
    pub fn install(
        &self,
        namespace: &mut dyn GlobalNamespace,
        resources: &Resources,
    ) -> Result<InstallReport, BridgeError> {
        let mut report = InstallReport::default();
        for name in self.registry.names() {
            if namespace.has_binding(name) {
                debug!(component = %name, namespace = namespace.name(), "already bound, skipping");
                report.skipped.push((name.clone(), SkipReason::AlreadyBound));
                continue;
            }
            if !self.registry.is_available(name) {
                debug!(component = %name, "unavailable in server mode, skipping");
                report.skipped.push((name.clone(), SkipReason::Unavailable));
                continue;
            }
            let instance = self.registry.resolve(name, resources)?;
            namespace.define_binding(name, HostValue::Object(instance));
            debug!(component = %name, namespace = namespace.name(), "installed");
            report.installed.push(name.clone());
        }
        Ok(report)
    }

    /// Resolve a single component and bind it, replacing nothing.
    pub fn install_one(
        &self,
        namespace: &mut dyn GlobalNamespace,
        name: &str,
        resources: &Resources,
    ) -> Result<bool, BridgeError> {
        if namespace.has_binding(name) {
            return Ok(false);
        }
        let instance = self.registry.resolve(name, resources)?;
        namespace.define_binding(name, HostValue::Object(instance));
        Ok(true)
    }
}

/// `target(args)` with an explicit receiver.
pub fn invoke(target: &HostValue, this: HostValue, args: Vec<HostValue>) -> Result<HostValue, BridgeError> {
    match target {
        HostValue::Object(o) => o.call(this, args),
        other => Err(BridgeError::unsupported("call", other.to_string())),
    }
}

/// `new target(args)`.
pub fn instantiate(target: &HostValue, args: Vec<HostValue>) -> Result<HostValue, BridgeError> {
    match target {
        HostValue::Object(o) => Ok(HostValue::Object(o.construct(args)?)),
        other => Err(BridgeError::unsupported("construct", other.to_string())),
    }
}

/// `target.member(args)`: the receiver is `target` itself.
pub fn invoke_member(
    target: &HostValue,
    member: &str,
    args: Vec<HostValue>,
) -> Result<HostValue, BridgeError> {
    let object = match target {
        HostValue::Object(o) => o,
        other => return Err(BridgeError::unsupported("call", format!("{}.{}", other, member))),
    };
    match object.get_member(member) {
        Some(function) => invoke(&function, target.clone(), args),
        None => Err(BridgeError::unsupported(
            "call",
            format!("{}.{}", object.display(), member),
        )),
    }
}
