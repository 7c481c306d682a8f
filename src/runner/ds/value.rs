use std::fmt;
use std::fmt::{Display, Formatter};

use crate::runner::ds::capability::{same_object, CapabilityRef};

pub const TYPE_STR_UNDEFINED: &str = "undefined";
pub const TYPE_STR_NULL: &str = "null";

/// A value crossing the boundary between the script engine and host code.
#[derive(Clone)]
pub enum HostValue {
    Undefined,
    Null,
    Boolean(bool),
    String(String),
    Number(NumberType),
    Object(CapabilityRef),
}

impl HostValue {
    pub fn integer(n: i64) -> Self {
        HostValue::Number(NumberType::Integer(n))
    }

    pub fn float(n: f64) -> Self {
        HostValue::Number(NumberType::from_f64(n))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, HostValue::Undefined)
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, HostValue::Undefined | HostValue::Null)
    }

    pub fn as_object(&self) -> Option<&CapabilityRef> {
        match self {
            HostValue::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric coercion, the same way the engine's `ToNumber` treats primitives.
    /// Objects answer through their own `to_number` handler.
    pub fn to_number(&self) -> f64 {
        match self {
            HostValue::Undefined => f64::NAN,
            HostValue::Null => 0.0,
            HostValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            HostValue::String(s) => string_to_number(s),
            HostValue::Number(n) => n.as_f64(),
            HostValue::Object(o) => o.to_number(),
        }
    }
}

/// Only the spelled-out `Infinity` names a non-finite number. `str::parse`
/// also takes `inf` and `NaN`, which scripts treat as non-numeric.
fn string_to_number(s: &str) -> f64 {
    match s.trim() {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        s if s.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        s => s.parse::<f64>().unwrap_or(f64::NAN),
    }
}

impl Display for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => write!(f, "{}", TYPE_STR_UNDEFINED),
            HostValue::Null => write!(f, "{}", TYPE_STR_NULL),
            HostValue::Boolean(b) => write!(f, "{}", b),
            HostValue::String(s) => write!(f, "{}", s),
            HostValue::Number(n) => write!(f, "{}", n),
            HostValue::Object(o) => write!(f, "{}", o.display()),
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Undefined => write!(f, "HostValue::Undefined"),
            HostValue::Null => write!(f, "HostValue::Null"),
            HostValue::Boolean(b) => write!(f, "HostValue::Boolean({})", b),
            HostValue::String(s) => write!(f, "HostValue::String({:?})", s),
            HostValue::Number(n) => write!(f, "HostValue::Number({:?})", n),
            HostValue::Object(o) => write!(f, "HostValue::Object({})", o.display()),
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Undefined, HostValue::Undefined) => true,
            (HostValue::Null, HostValue::Null) => true,
            (HostValue::Boolean(a), HostValue::Boolean(b)) => a == b,
            (HostValue::String(a), HostValue::String(b)) => a == b,
            (HostValue::Number(a), HostValue::Number(b)) => a == b,
            (HostValue::Object(a), HostValue::Object(b)) => same_object(a, b),
            _ => false,
        }
    }
}

impl From<bool> for HostValue {
    fn from(b: bool) -> Self {
        HostValue::Boolean(b)
    }
}

impl From<i64> for HostValue {
    fn from(n: i64) -> Self {
        HostValue::integer(n)
    }
}

impl From<f64> for HostValue {
    fn from(n: f64) -> Self {
        HostValue::float(n)
    }
}

impl From<&str> for HostValue {
    fn from(s: &str) -> Self {
        HostValue::String(s.to_string())
    }
}

impl From<String> for HostValue {
    fn from(s: String) -> Self {
        HostValue::String(s)
    }
}

impl From<CapabilityRef> for HostValue {
    fn from(o: CapabilityRef) -> Self {
        HostValue::Object(o)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumberType {
    Integer(i64),
    Float(f64),
    NaN,
    PositiveInfinity,
    NegativeInfinity,
}

impl NumberType {
    /// Normalises a float: integral values that fit an `i64` become `Integer`.
    pub fn from_f64(n: f64) -> Self {
        if n.is_nan() {
            NumberType::NaN
        } else if n == f64::INFINITY {
            NumberType::PositiveInfinity
        } else if n == f64::NEG_INFINITY {
            NumberType::NegativeInfinity
        } else if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
            NumberType::Integer(n as i64)
        } else {
            NumberType::Float(n)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            NumberType::Integer(i) => *i as f64,
            NumberType::Float(f) => *f,
            NumberType::NaN => f64::NAN,
            NumberType::PositiveInfinity => f64::INFINITY,
            NumberType::NegativeInfinity => f64::NEG_INFINITY,
        }
    }
}

impl Display for NumberType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NumberType::Integer(i) => write!(f, "{}", i),
            NumberType::Float(nf) => write!(f, "{}", nf),
            NumberType::NaN => write!(f, "NaN"),
            NumberType::PositiveInfinity => write!(f, "Infinity"),
            NumberType::NegativeInfinity => write!(f, "-Infinity"),
        }
    }
}
