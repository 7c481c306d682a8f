//! Boundary to the script engine's global namespace.
//!
//! The engine implements [`GlobalNamespace`] over whatever holds its global
//! bindings; the gateway only ever talks to the engine through it.

use crate::runner::ds::value::HostValue;

/// The engine's global namespace, as far as the bridge needs it.
pub trait GlobalNamespace {
    /// Is `name` already bound?
    ///
    /// This should be a cheap check and must not materialize anything.
    fn has_binding(&self, name: &str) -> bool;

    /// Bind `value` under `name`, visible to scripts evaluated afterwards.
    fn define_binding(&mut self, name: &str, value: HostValue);

    fn get_binding(&self, name: &str) -> Option<HostValue>;

    /// Human-readable name of the namespace (for logging).
    fn name(&self) -> &str;
}
