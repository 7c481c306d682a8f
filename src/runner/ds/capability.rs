//! The protocol every bridged value implements.
//!
//! The engine dispatches into host objects generically, so every method of
//! [`CapabilityObject`] has a total default: flags are `false`, lookups are
//! absent, writes are no-ops, enumerations are empty and numeric coercion is
//! `0`. `call` and `construct` default to [`BridgeError::UnsupportedOperation`]
//! instead of silently returning nothing. Implementors override only what is
//! meaningful for their role.
//!
//! ```
//! use just_bridge::runner::ds::capability::{CapabilityObject, Role, primary_role};
//! use just_bridge::runner::ds::value::HostValue;
//!
//! struct Version;
//!
//! impl CapabilityObject for Version {
//!     fn class_name(&self) -> &str {
//!         "Version"
//!     }
//!
//!     fn get_member(&self, name: &str) -> Option<HostValue> {
//!         match name {
//!             "major" => Some(HostValue::integer(1)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let v = Version;
//! assert_eq!(primary_role(&v), Role::Data);
//! assert!(v.call(HostValue::Undefined, vec![]).is_err());
//! assert_eq!(v.get_member("major"), Some(HostValue::integer(1)));
//! assert_eq!(v.to_number(), 0.0);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::runner::ds::error::BridgeError;
use crate::runner::ds::value::HostValue;

pub type CapabilityRef = Arc<dyn CapabilityObject>;

/// Upcast to `Any`, implemented for every sized `'static` type.
///
/// Call it on a `&dyn CapabilityObject`, never on the `Arc` holding it.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub trait CapabilityObject: AsAny + Send + Sync + 'static {
    fn class_name(&self) -> &str {
        ""
    }

    fn display(&self) -> String {
        let class = self.class_name();
        format!("[object {}]", if class.is_empty() { "Object" } else { class })
    }

    fn is_function(&self) -> bool {
        false
    }

    fn is_constructible(&self) -> bool {
        false
    }

    /// `true` when `this` is passed through unchanged instead of being bound
    /// to the global object.
    fn is_strict_function(&self) -> bool {
        false
    }

    fn is_array(&self) -> bool {
        false
    }

    fn call(&self, _this: HostValue, _args: Vec<HostValue>) -> Result<HostValue, BridgeError> {
        Err(BridgeError::unsupported("call", self.display()))
    }

    fn construct(&self, _args: Vec<HostValue>) -> Result<CapabilityRef, BridgeError> {
        Err(BridgeError::unsupported("construct", self.display()))
    }

    fn get_member(&self, _name: &str) -> Option<HostValue> {
        None
    }

    fn set_member(&self, _name: &str, _value: HostValue) {}

    fn has_member(&self, _name: &str) -> bool {
        false
    }

    fn remove_member(&self, _name: &str) {}

    fn get_slot(&self, _index: usize) -> Option<HostValue> {
        None
    }

    fn set_slot(&self, _index: usize, _value: HostValue) {}

    fn has_slot(&self, _index: usize) -> bool {
        false
    }

    /// Was `value` produced by this object acting as a constructor?
    fn is_instance(&self, _value: &HostValue) -> bool {
        false
    }

    /// Does this constructor produce values of the concrete type `class`?
    fn is_instance_of(&self, _class: TypeId) -> bool {
        false
    }

    fn member_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn values(&self) -> Vec<HostValue> {
        Vec::new()
    }

    fn to_number(&self) -> f64 {
        0.0
    }
}

/// The single primary role of a bridged value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Function,
    Constructor,
    Data,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Function => write!(f, "function"),
            Role::Constructor => write!(f, "constructor"),
            Role::Data => write!(f, "object"),
        }
    }
}

pub fn primary_role(obj: &dyn CapabilityObject) -> Role {
    if obj.is_function() {
        Role::Function
    } else if obj.is_constructible() {
        Role::Constructor
    } else {
        Role::Data
    }
}

/// Identity of the concrete Rust type behind a bridged value.
pub fn concrete_type_id(obj: &dyn CapabilityObject) -> TypeId {
    Any::type_id(obj.as_any())
}

/// Reference identity. Compares data addresses only, so two handles to the
/// same allocation are equal even if their vtable pointers differ.
pub fn same_object(a: &CapabilityRef, b: &CapabilityRef) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
