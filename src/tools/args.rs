//! Argument coercion
//!
//! Agents send loosely typed argument bags. This module turns them into the
//! typed values the ledger engine expects: names and reasons as strings,
//! amounts as [`Amount`], ids as integers.

use serde_json::{Map, Value};
use std::str::FromStr;

use crate::domain::{AccountRef, Amount, AmountError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("Arguments must be a JSON object")]
    NotAnObject,

    #[error("Arguments are not valid JSON: {0}")]
    Malformed(String),

    #[error("Missing required argument: {0}")]
    Missing(&'static str),

    #[error("Missing required argument: {id_field} or {name_field}")]
    MissingAccount {
        id_field: &'static str,
        name_field: &'static str,
    },

    #[error("Argument {field} must be {expected}")]
    InvalidType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Argument {field} is not a valid amount: {source}")]
    InvalidAmount {
        field: &'static str,
        source: AmountError,
    },
}

/// Argument bag of one tool invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    /// Accept an object; `null` is treated as no arguments
    pub fn from_value(value: Value) -> Result<Self, ArgumentError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(ArgumentError::NotAnObject),
        }
    }

    /// Parse the JSON-encoded arguments string of a tool call
    pub fn from_json_str(raw: &str) -> Result<Self, ArgumentError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ArgumentError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).filter(|v| !v.is_null())
    }

    /// Optional string; numbers and booleans are stringified
    pub fn string(&self, field: &'static str) -> Result<Option<String>, ArgumentError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(ArgumentError::InvalidType {
                field,
                expected: "a string",
            }),
        }
    }

    pub fn require_string(&self, field: &'static str) -> Result<String, ArgumentError> {
        self.string(field)?.ok_or(ArgumentError::Missing(field))
    }

    /// Optional integer; integer strings are accepted
    pub fn integer(&self, field: &'static str) -> Result<Option<i64>, ArgumentError> {
        let invalid = ArgumentError::InvalidType {
            field,
            expected: "an integer",
        };

        match self.get(field) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_i64() {
                Some(i) => Ok(Some(i)),
                // 3.0 from a float-happy client is still 3
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(invalid),
                },
            },
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid),
            Some(_) => Err(invalid),
        }
    }

    /// Required amount; JSON numbers and numeric strings are accepted
    pub fn amount(&self, field: &'static str) -> Result<Amount, ArgumentError> {
        let parsed = match self.get(field) {
            None => return Err(ArgumentError::Missing(field)),
            Some(Value::Number(n)) => Amount::try_from(n),
            Some(Value::String(s)) => Amount::from_str(s),
            Some(_) => {
                return Err(ArgumentError::InvalidType {
                    field,
                    expected: "a number",
                })
            }
        };
        parsed.map_err(|source| ArgumentError::InvalidAmount { field, source })
    }

    /// Optional history limit; zero and negative values are floored to zero
    pub fn limit(&self, field: &'static str) -> Result<Option<u32>, ArgumentError> {
        Ok(self
            .integer(field)?
            .map(|n| n.clamp(0, i64::from(u32::MAX)) as u32))
    }

    /// Account reference from an id field or a name field; the id wins
    pub fn account_ref(
        &self,
        id_field: &'static str,
        name_field: &'static str,
    ) -> Result<AccountRef, ArgumentError> {
        if let Some(id) = self.integer(id_field)? {
            return Ok(AccountRef::Id(id));
        }
        match self.string(name_field)? {
            Some(name) if !name.trim().is_empty() => Ok(AccountRef::Name(name)),
            _ => Err(ArgumentError::MissingAccount {
                id_field,
                name_field,
            }),
        }
    }
}
