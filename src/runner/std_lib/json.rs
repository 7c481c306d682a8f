//! `Json` component: `Json.encode(value)` and `Json.decode(text)`.
//!
//! Encoding walks bridged objects through the capability protocol: arrays
//! by their values, everything else by member names. Functions and
//! constructors are dropped from objects and become `null` inside arrays,
//! the same way `JSON.stringify` treats them.

use serde_json::{Map, Number, Value};

use crate::runner::ds::array_object::ArrayObject;
use crate::runner::ds::capability::CapabilityObject;
use crate::runner::ds::data_object::DataObject;
use crate::runner::ds::error::HostError;
use crate::runner::ds::value::{HostValue, NumberType};
use crate::runner::plugin::descriptor::ComponentDescriptor;

pub const NAME: &str = "Json";

/// Nesting limit for encoding; also stops cyclic object graphs.
const MAX_DEPTH: usize = 128;

pub fn descriptor() -> ComponentDescriptor {
    ComponentDescriptor::new(NAME, |_| {
        let json = DataObject::new(NAME)
            .with_function("encode", |_, args| encode(args.first().unwrap_or(&HostValue::Undefined)))
            .with_function("decode", |_, args| decode(args.first().unwrap_or(&HostValue::Undefined)));
        Ok(json.into_ref())
    })
    .singleton()
}

/// `undefined` and bare functions encode to `undefined`, not a string.
pub fn encode(value: &HostValue) -> Result<HostValue, HostError> {
    match to_json(value, 0)? {
        Some(json) => Ok(HostValue::String(serde_json::to_string(&json)?)),
        None => Ok(HostValue::Undefined),
    }
}

/// Nullish input decodes as the text `null`.
pub fn decode(value: &HostValue) -> Result<HostValue, HostError> {
    let text = if value.is_nullish() {
        "null".to_string()
    } else {
        value.to_string()
    };
    let json: Value = serde_json::from_str(&text)?;
    Ok(from_json(json))
}

pub fn to_json(value: &HostValue, depth: usize) -> Result<Option<Value>, HostError> {
    if depth > MAX_DEPTH {
        return Err(format!("value nests deeper than {} levels", MAX_DEPTH).into());
    }
    let json = match value {
        HostValue::Undefined => return Ok(None),
        HostValue::Null => Value::Null,
        HostValue::Boolean(b) => Value::Bool(*b),
        HostValue::String(s) => Value::String(s.clone()),
        HostValue::Number(NumberType::Integer(i)) => Value::Number(Number::from(*i)),
        HostValue::Number(n) => Number::from_f64(n.as_f64())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        HostValue::Object(o) => {
            if o.is_function() || o.is_constructible() {
                return Ok(None);
            }
            object_to_json(o.as_ref(), depth)?
        }
    };
    Ok(Some(json))
}

fn object_to_json(object: &dyn CapabilityObject, depth: usize) -> Result<Value, HostError> {
    if object.is_array() {
        let mut items = Vec::new();
        for v in object.values() {
            items.push(to_json(&v, depth + 1)?.unwrap_or(Value::Null));
        }
        Ok(Value::Array(items))
    } else {
        let mut map = Map::new();
        for name in object.member_names() {
            if let Some(v) = object.get_member(&name) {
                if let Some(json) = to_json(&v, depth + 1)? {
                    map.insert(name, json);
                }
            }
        }
        Ok(Value::Object(map))
    }
}

pub fn from_json(json: Value) -> HostValue {
    match json {
        Value::Null => HostValue::Null,
        Value::Bool(b) => HostValue::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => HostValue::integer(i),
            None => HostValue::float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => HostValue::String(s),
        Value::Array(items) => {
            ArrayObject::from_values(items.into_iter().map(from_json).collect()).into_value()
        }
        Value::Object(map) => {
            let object = DataObject::new("Object");
            for (k, v) in map {
                object.set_member(&k, from_json(v));
            }
            object.into_value()
        }
    }
}
