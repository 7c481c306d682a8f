//! `sleep(ms)`: block the calling script thread.

use std::thread;
use std::time::Duration;

use crate::runner::ds::error::HostError;
use crate::runner::ds::value::HostValue;
use crate::runner::plugin::descriptor::ComponentDescriptor;

pub const NAME: &str = "sleep";

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::function(NAME, sleep).singleton()
}

/// Sleeps for the first argument in milliseconds and returns it.
/// Non-numeric and negative durations sleep for 0 ms.
fn sleep(_this: HostValue, args: Vec<HostValue>) -> Result<HostValue, HostError> {
    let requested = match args.first() {
        Some(v) => v.to_number(),
        None => return Ok(HostValue::Undefined),
    };
    let millis = if requested.is_finite() && requested > 0.0 {
        requested as u64
    } else {
        0
    };
    thread::sleep(Duration::from_millis(millis));
    Ok(HostValue::integer(millis as i64))
}
