//! Typed values and the codec between the external textual form and the
//! component's value domain.
//!
//! Tables, initial overrides and configuration all carry values as text.
//! The component only accepts values matching the type its metadata declares
//! for a variable, so every external value passes through [`Value::decode`]
//! before reaching the component, and comes back out as a [`Value`] whose tag
//! is fixed by the variable's [`VarType`].

use crate::errors::{CosimError, CosimResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of value domains a variable can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarType {
    Real,
    Integer,
    Boolean,
    String,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Real => write!(f, "Real"),
            VarType::Integer => write!(f, "Integer"),
            VarType::Boolean => write!(f, "Boolean"),
            VarType::String => write!(f, "String"),
        }
    }
}

impl FromStr for VarType {
    type Err = CosimError;

    /// Parse a declared type name from model metadata.
    ///
    /// Anything outside the four supported kinds is an
    /// [`CosimError::UnsupportedType`]; callers at the metadata boundary are
    /// expected to log and skip such variables rather than abort.
    fn from_str(s: &str) -> CosimResult<Self> {
        match s {
            "Real" | "Float64" => Ok(VarType::Real),
            "Integer" | "Int32" | "Int64" => Ok(VarType::Integer),
            "Boolean" => Ok(VarType::Boolean),
            "String" => Ok(VarType::String),
            other => Err(CosimError::UnsupportedType {
                declared: other.to_string(),
            }),
        }
    }
}

/// A value tagged with its domain.
///
/// Produced by [`Value::decode`] from an untyped external form and consumed
/// by the lifecycle adapter, which dispatches on the tag to the matching
/// component accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Real(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Convert an external textual value into the given domain.
    ///
    /// - `Real`: floating-point parse, fails on non-numeric input.
    /// - `Integer`: integer parse; textual floats with a zero fractional part
    ///   (`"2.0"`) are accepted, genuine fractions are rejected.
    /// - `Boolean`: `"true"` (any case) and `"1"` are true, anything else is
    ///   false. Never fails, but unrecognized tokens are logged since they
    ///   silently become false.
    /// - `String`: passthrough.
    pub fn decode(var_type: VarType, raw: &str) -> CosimResult<Self> {
        let token = raw.trim();
        match var_type {
            VarType::Real => token
                .parse::<f64>()
                .map(Value::Real)
                .map_err(|_| conversion_error(raw, var_type)),
            VarType::Integer => parse_integer(token)
                .map(Value::Integer)
                .ok_or_else(|| conversion_error(raw, var_type)),
            VarType::Boolean => {
                let truthy = token.eq_ignore_ascii_case("true") || token == "1";
                let falsy = token.eq_ignore_ascii_case("false") || token == "0";
                if !truthy && !falsy {
                    warn!(
                        "unrecognized boolean token {:?}, treating as false",
                        token
                    );
                }
                Ok(Value::Boolean(truthy))
            }
            VarType::String => Ok(Value::String(raw.to_string())),
        }
    }

    /// Render the value back into its external textual form.
    ///
    /// Only used for display and comparison, never fed back to a component.
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// The domain this value belongs to.
    pub fn var_type(&self) -> VarType {
        match self {
            Value::Real(_) => VarType::Real,
            Value::Integer(_) => VarType::Integer,
            Value::Boolean(_) => VarType::Boolean,
            Value::String(_) => VarType::String,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
        }
    }
}

fn conversion_error(raw: &str, kind: VarType) -> CosimError {
    CosimError::Conversion {
        value: raw.to_string(),
        kind,
    }
}

/// Integer parse accepting float-rendered whole numbers.
///
/// Table writers backed by float cells render integers as "2.0"; those are
/// accepted. "2.5" is not silently truncated.
fn parse_integer(token: &str) -> Option<i64> {
    if let Ok(v) = token.parse::<i64>() {
        return Some(v);
    }
    let v = token.parse::<f64>().ok()?;
    if v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_real() {
        assert_eq!(
            Value::decode(VarType::Real, "10.5").unwrap(),
            Value::Real(10.5)
        );
        assert_eq!(
            Value::decode(VarType::Real, " -3e2 ").unwrap(),
            Value::Real(-300.0)
        );
        assert!(matches!(
            Value::decode(VarType::Real, "fast"),
            Err(CosimError::Conversion { .. })
        ));
    }

    #[test]
    fn decode_integer() {
        assert_eq!(
            Value::decode(VarType::Integer, "42").unwrap(),
            Value::Integer(42)
        );
        // Float-rendered whole numbers are accepted
        assert_eq!(
            Value::decode(VarType::Integer, "2.0").unwrap(),
            Value::Integer(2)
        );
        // Genuine fractions are rejected, not truncated
        assert!(matches!(
            Value::decode(VarType::Integer, "2.5"),
            Err(CosimError::Conversion { .. })
        ));
        assert!(Value::decode(VarType::Integer, "abc").is_err());
    }

    #[test]
    fn decode_boolean_never_fails() {
        assert_eq!(
            Value::decode(VarType::Boolean, "true").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Value::decode(VarType::Boolean, "TRUE").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Value::decode(VarType::Boolean, "1").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Value::decode(VarType::Boolean, "false").unwrap(),
            Value::Boolean(false)
        );
        // Unrecognized tokens become false rather than erroring
        assert_eq!(
            Value::decode(VarType::Boolean, "yes").unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn decode_string_passthrough() {
        assert_eq!(
            Value::decode(VarType::String, " keep me ").unwrap(),
            Value::String(" keep me ".to_string())
        );
    }

    #[test]
    fn round_trips() {
        for value in [
            Value::Real(10.5),
            Value::Real(-0.125),
            Value::Integer(-7),
            Value::String("label".to_string()),
        ] {
            let decoded = Value::decode(value.var_type(), &value.encode()).unwrap();
            assert_eq!(decoded, value);
        }
        // Booleans only round-trip through the canonical tokens
        for value in [Value::Boolean(true), Value::Boolean(false)] {
            let decoded = Value::decode(VarType::Boolean, &value.encode()).unwrap();
            assert_eq!(decoded, value);
        }
    }

    #[test]
    fn var_type_from_metadata_names() {
        assert_eq!("Real".parse::<VarType>().unwrap(), VarType::Real);
        assert_eq!("Float64".parse::<VarType>().unwrap(), VarType::Real);
        assert_eq!("Int32".parse::<VarType>().unwrap(), VarType::Integer);
        assert!(matches!(
            "Enumeration".parse::<VarType>(),
            Err(CosimError::UnsupportedType { .. })
        ));
    }
}
