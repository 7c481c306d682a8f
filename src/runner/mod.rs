//! Host side of the script runtime.
//!
//! - **[`ds`]** - Values, the capability protocol and its adapters
//! - **[`plugin`]** - Component registry and host-binding gateway
//! - **[`std_lib`]** - Standard components

pub mod ds;
pub mod plugin;
pub mod std_lib;
