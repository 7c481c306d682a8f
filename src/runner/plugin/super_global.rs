//! In-memory global namespace.
//!
//! `GlobalScope` is the simplest [`GlobalNamespace`]: a map from name to
//! value that remembers definition order. The CLI and tests install
//! components into it; an embedding engine would usually implement
//! `GlobalNamespace` over its own global environment record instead.
//!
//! ## Example
//!
//! ```
//! use just_bridge::runner::plugin::resolver::GlobalNamespace;
//! use just_bridge::runner::plugin::super_global::GlobalScope;
//! use just_bridge::runner::ds::value::HostValue;
//!
//! let mut scope = GlobalScope::new("global");
//! scope.define_binding("answer", HostValue::integer(42));
//!
//! assert!(scope.has_binding("answer"));
//! assert_eq!(scope.lookup("answer").unwrap(), HostValue::integer(42));
//! assert!(scope.lookup("question").is_err());
//! ```

use std::collections::HashMap;

use crate::runner::ds::error::BridgeError;
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::resolver::GlobalNamespace;

pub struct GlobalScope {
    name: String,
    bindings: HashMap<String, HostValue>,
    order: Vec<String>,
}

impl GlobalScope {
    pub fn new(name: impl Into<String>) -> Self {
        GlobalScope {
            name: name.into(),
            bindings: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Look a name up the way a script reference would.
    pub fn lookup(&self, name: &str) -> Result<HostValue, BridgeError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::ComponentNotFound(name.to_string()))
    }

    /// Bound names in definition order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl GlobalNamespace for GlobalScope {
    fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    fn define_binding(&mut self, name: &str, value: HostValue) {
        if self.bindings.insert(name.to_string(), value).is_none() {
            self.order.push(name.to_string());
        }
    }

    fn get_binding(&self, name: &str) -> Option<HostValue> {
        self.bindings.get(name).cloned()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
