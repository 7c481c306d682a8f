//! Data structures shared by everything on the host side of the bridge:
//! the value type, the capability protocol and its adapters, and errors.

pub mod array_object;
pub mod atomic_slot;
pub mod capability;
pub mod constructor_object;
pub mod data_object;
pub mod error;
pub mod function_object;
pub mod value;
