//! Console component.
//!
//! Provides console.log, console.info, console.warn, console.error,
//! console.time and console.timeEnd.
//!
//! A fresh console is built for every activation and writes its timers into
//! the activation's bindings scope, so timers started by one script are seen
//! by any later console in the same scope.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, error, info, warn};

use crate::runner::ds::capability::CapabilityObject;
use crate::runner::ds::data_object::DataObject;
use crate::runner::ds::error::{BridgeError, HostError};
use crate::runner::ds::value::{HostValue, NumberType};
use crate::runner::plugin::descriptor::ComponentDescriptor;
use crate::runner::plugin::types::{Activation, BindingsScope};

pub const NAME: &str = "console";

/// Bindings key holding the running timers.
pub const TIME_MAP_KEY: &str = "@console_timeMap";

#[derive(Debug, Clone, Copy)]
enum Level {
    Log,
    Info,
    Warn,
    Error,
}

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(NAME, build).requires_bindings_scope()
}

fn build(activation: &Activation) -> Result<Arc<dyn CapabilityObject>, BridgeError> {
    let bindings = activation.bindings()?.clone();
    let server_mode = activation.server_mode();

    let time_bindings = bindings.clone();
    let console = DataObject::new(NAME)
        .with_function("log", move |_, args| output(Level::Log, &args, server_mode))
        .with_function("info", move |_, args| output(Level::Info, &args, server_mode))
        .with_function("warn", move |_, args| output(Level::Warn, &args, server_mode))
        .with_function("error", move |_, args| output(Level::Error, &args, server_mode))
        .with_function("time", move |_, args| time(&time_bindings, &args))
        .with_function("timeEnd", move |_, args| time_end(&bindings, &args));

    Ok(console.into_ref())
}

/// Format a HostValue for console output.
fn format_value(value: &HostValue) -> String {
    match value {
        HostValue::Number(NumberType::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{:.0}", f)
        }
        HostValue::Object(o) if !o.is_function() && !o.is_constructible() => o.display(),
        other => other.to_string(),
    }
}

/// Format all arguments for console output.
fn format_args(args: &[HostValue]) -> String {
    args.iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// log/info go to stdout, warn/error to stderr. In server mode the line is
/// also emitted as a tracing event so it reaches the server's log.
fn output(level: Level, args: &[HostValue], server_mode: bool) -> Result<HostValue, HostError> {
    let line = format_args(args);
    match level {
        Level::Log | Level::Info => println!("{}", line),
        Level::Warn | Level::Error => eprintln!("{}", line),
    }
    if server_mode {
        match level {
            Level::Log => debug!(target: "console", "{}", line),
            Level::Info => info!(target: "console", "{}", line),
            Level::Warn => warn!(target: "console", "{}", line),
            Level::Error => error!(target: "console", "{}", line),
        }
    }
    Ok(HostValue::Undefined)
}

fn now_millis() -> Result<i64, HostError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as i64)
}

fn label_of(args: &[HostValue]) -> Option<String> {
    match args.first() {
        None | Some(HostValue::Undefined) | Some(HostValue::Null) => None,
        Some(v) => Some(v.to_string()).filter(|s| !s.is_empty()),
    }
}

fn time_map(bindings: &BindingsScope) -> Result<Arc<dyn CapabilityObject>, HostError> {
    let map = bindings.get_or_insert_with(TIME_MAP_KEY, || DataObject::new("TimeMap").into_value());
    match map {
        HostValue::Object(o) => Ok(o),
        other => Err(format!("{} holds {} instead of a timer map", TIME_MAP_KEY, other).into()),
    }
}

/// Returns the current time in epoch millis; with a label, also starts a
/// timer under it.
fn time(bindings: &BindingsScope, args: &[HostValue]) -> Result<HostValue, HostError> {
    let now = now_millis()?;
    if let Some(label) = label_of(args) {
        time_map(bindings)?.set_member(&label, HostValue::integer(now));
    }
    Ok(HostValue::integer(now))
}

/// Milliseconds since `time(label)`, or -1 for a label with no running timer.
fn time_end(bindings: &BindingsScope, args: &[HostValue]) -> Result<HostValue, HostError> {
    let label = match label_of(args) {
        Some(label) => label,
        None => return Ok(HostValue::integer(-1)),
    };
    if !bindings.contains(TIME_MAP_KEY) {
        return Ok(HostValue::integer(-1));
    }
    let map = time_map(bindings)?;
    match map.get_member(&label) {
        Some(start) => {
            map.remove_member(&label);
            Ok(HostValue::integer(now_millis()? - start.to_number() as i64))
        }
        None => Ok(HostValue::integer(-1)),
    }
}
