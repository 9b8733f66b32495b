//! JSON wire format
//!
//! An [`Error`] serializes as
//!
//! ```text
//! {"message": .., "function": .., "linenumber": .., "file": "<path>:<line>",
//!  "details": {..}, "cause": ..}
//! ```
//!
//! with empty fields omitted. A cause that is itself an [`Error`] nests in the
//! same shape, an [`ErrorList`] cause uses the list shape
//! `{"message": "<N> errors have occurred", "errors": [..]}`, a cause attached
//! with [`Error::wrap_serializable`] uses its own serde form, and any other
//! error becomes `{"message": <Display text>}`.
//!
//! Decoding goes into the read-only mirrors [`JsonError`] and
//! [`JsonErrorList`]; live errors are not reconstructed.

use crate::error::MarshalFn;
use crate::{Error, ErrorDetails, ErrorList};
use serde::ser::{Error as _, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::error::Error as StdError;

const MESSAGE: &str = "message";
const FUNCTION: &str = "function";
const LINE_NUMBER: &str = "linenumber";
const FILE: &str = "file";
const DETAILS: &str = "details";
const CAUSE: &str = "cause";
const ERRORS: &str = "errors";

const ERROR_FIELDS: [&str; 6] = [MESSAGE, FUNCTION, LINE_NUMBER, FILE, DETAILS, CAUSE];

// =============================================================================
// Encoding
// =============================================================================

impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.message().is_empty() {
            map.serialize_entry(MESSAGE, self.message())?;
        }
        if let Some(location) = self.location() {
            if !location.function().is_empty() {
                map.serialize_entry(FUNCTION, location.function())?;
            }
            if location.line() != 0 {
                map.serialize_entry(LINE_NUMBER, &location.line())?;
            }
            if !location.file().is_empty() {
                map.serialize_entry(FILE, &location.file_with_line())?;
            }
        }
        if !self.details().is_empty() {
            map.serialize_entry(DETAILS, self.details())?;
        }
        if let Some(cause) = self.cause_parts() {
            let cause = Marshalable {
                error: cause.error.as_ref(),
                marshal: cause.marshal,
            };
            map.serialize_entry(CAUSE, &cause)?;
        }
        map.end()
    }
}

impl Serialize for ErrorList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let errors: Vec<Marshalable<'_>> = self
            .iter()
            .map(|error| Marshalable {
                error,
                marshal: None,
            })
            .collect();

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(MESSAGE, &self.summary())?;
        map.serialize_entry(ERRORS, &errors)?;
        map.end()
    }
}

/// Any error in its best available JSON form
struct Marshalable<'a> {
    error: &'a (dyn StdError + 'static),
    marshal: Option<MarshalFn>,
}

impl Serialize for Marshalable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(err) = self.error.downcast_ref::<Error>() {
            return err.serialize(serializer);
        }
        if let Some(list) = self.error.downcast_ref::<ErrorList>() {
            return list.serialize(serializer);
        }
        if let Some(value) = self.marshal.and_then(|marshal| marshal(self.error)) {
            return value.map_err(S::Error::custom)?.serialize(serializer);
        }
        JsonError::from_message(self.error.to_string()).serialize(serializer)
    }
}

impl Error {
    /// Encode as a compact JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Encode as an indented JSON string
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Encode as a JSON value
    pub fn to_json_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl ErrorList {
    /// Encode as a compact JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Read-only mirror of the JSON form of an [`Error`].
///
/// Carries the data (message, location fields, details, cause chain) but not
/// the identity of the original error, so it takes no part in matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonError {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub function: String,

    #[serde(rename = "linenumber", default, skip_serializing_if = "is_zero")]
    pub line_number: u32,

    /// As written on the wire, usually `<path>:<line>`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,

    #[serde(
        default,
        skip_serializing_if = "ErrorDetails::is_empty",
        deserialize_with = "nullable"
    )]
    pub details: ErrorDetails,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<JsonCause>,
}

fn is_zero(line: &u32) -> bool {
    *line == 0
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl JsonError {
    /// Leaf carrying only a message
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Decode from a JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Snapshot of a live error
    pub fn from_error(err: &Error) -> serde_json::Result<Self> {
        serde_json::from_value(err.to_json_value()?)
    }

    /// Messages along the decoded cause chain, outermost first. Stops at the
    /// first opaque cause without a readable message.
    pub fn messages(&self) -> Vec<&str> {
        let mut messages = vec![self.message.as_str()];
        let mut cause = self.cause.as_ref();
        while let Some(current) = cause {
            match current.message() {
                Some(message) => messages.push(message),
                None => break,
            }
            cause = match current {
                JsonCause::Error(err) => err.cause.as_ref(),
                JsonCause::Opaque(_) => None,
            };
        }
        messages
    }
}

/// Decoded `cause` field.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonCause {
    /// A nested object in the error shape
    Error(Box<JsonError>),
    /// Anything else, kept as raw JSON
    Opaque(Value),
}

impl JsonCause {
    /// Try the error shape first, keep the raw value otherwise.
    ///
    /// Only objects whose keys are all error fields count as the error shape,
    /// so list objects (`errors`) and foreign serde forms stay opaque.
    pub fn from_value(value: Value) -> Self {
        let is_error_shape = match &value {
            Value::Object(map) => map.keys().all(|key| ERROR_FIELDS.contains(&key.as_str())),
            _ => false,
        };
        if is_error_shape {
            if let Ok(err) = serde_json::from_value::<JsonError>(value.clone()) {
                return JsonCause::Error(Box::new(err));
            }
        }
        JsonCause::Opaque(value)
    }

    /// The nested error, if the cause decoded in the error shape
    pub fn as_error(&self) -> Option<&JsonError> {
        match self {
            JsonCause::Error(err) => Some(err),
            JsonCause::Opaque(_) => None,
        }
    }

    /// Message of the cause: the nested error's message, a bare JSON string,
    /// or the `message` member of an opaque object.
    pub fn message(&self) -> Option<&str> {
        match self {
            JsonCause::Error(err) => Some(&err.message),
            JsonCause::Opaque(Value::String(message)) => Some(message),
            JsonCause::Opaque(Value::Object(map)) => map.get(MESSAGE).and_then(Value::as_str),
            JsonCause::Opaque(_) => None,
        }
    }
}

impl Serialize for JsonCause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonCause::Error(err) => err.serialize(serializer),
            JsonCause::Opaque(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for JsonCause {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(JsonCause::from_value)
    }
}

/// Read-only mirror of the JSON form of an [`ErrorList`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonErrorList {
    #[serde(default)]
    pub message: String,

    #[serde(default, deserialize_with = "nullable")]
    pub errors: Vec<JsonCause>,
}

impl JsonErrorList {
    /// Decode from a JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
