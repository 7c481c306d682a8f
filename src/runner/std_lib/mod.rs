//! Standard components.
//!
//! Host capabilities every script environment gets unless configuration says
//! otherwise: `console`, `Json`, `sleep`, `sync`, `Lock` and
//! `ReadWriteLock`.

pub mod console;
pub mod core;
pub mod json;
pub mod lock;
pub mod sleep;
pub mod sync;

pub use self::core::register_standard_components;
