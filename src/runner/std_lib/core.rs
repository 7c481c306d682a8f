//! Standard components registration.
//!
//! Every standard component is listed in one static table keyed by its
//! declared name, so configuration can select a subset by name.

use std::collections::HashMap;

use crate::runner::ds::error::BridgeError;
use crate::runner::plugin::descriptor::ComponentDescriptor;
use crate::runner::plugin::registry::ComponentRegistry;

use super::console;
use super::json;
use super::lock;
use super::sleep;
use super::sync;

type DescriptorFn = fn() -> ComponentDescriptor;

/// Declared names of the standard components, in registration order.
pub const STANDARD_COMPONENT_NAMES: [&str; 6] = [
    console::NAME,
    json::NAME,
    sleep::NAME,
    sync::NAME,
    lock::LOCK_NAME,
    lock::READ_WRITE_LOCK_NAME,
];

lazy_static! {
    static ref STANDARD_COMPONENTS: HashMap<&'static str, DescriptorFn> = {
        let mut table: HashMap<&'static str, DescriptorFn> = HashMap::new();
        table.insert(console::NAME, console::descriptor);
        table.insert(json::NAME, json::descriptor);
        table.insert(sleep::NAME, sleep::descriptor);
        table.insert(sync::NAME, sync::descriptor);
        table.insert(lock::LOCK_NAME, lock::lock_descriptor);
        table.insert(lock::READ_WRITE_LOCK_NAME, lock::read_write_lock_descriptor);
        table
    };
}

pub fn is_standard_component(name: &str) -> bool {
    STANDARD_COMPONENTS.contains_key(name)
}

/// A fresh descriptor for the standard component `name`.
pub fn standard_descriptor(name: &str) -> Option<ComponentDescriptor> {
    STANDARD_COMPONENTS.get(name).map(|build| build())
}

/// Register the named standard components with the registry.
pub fn register_standard_components<S: AsRef<str>>(
    registry: &mut ComponentRegistry,
    names: &[S],
) -> Result<(), BridgeError> {
    for name in names {
        let name = name.as_ref();
        let descriptor =
            standard_descriptor(name).ok_or_else(|| BridgeError::ComponentNotFound(name.to_string()))?;
        registry.register(descriptor)?;
    }
    Ok(())
}
