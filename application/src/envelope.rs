//! Envelope codec
//!
//! Every portal response is wrapped in `{resultCode, resultMessage, resultData}`.
//! Several endpoints go one step further and put a JSON *string* inside
//! `resultData`, which decodes to a second document carrying its own
//! `result_code`:
//!
//! ```text
//! {"resultCode":200,"resultData":{"list2":"{\"result_code\":200,\"my_group\":[...]}"}}
//! ```
//!
//! [`Envelope::nested`] is the single place where that second stage is decoded
//! and validated; resource operations never re-parse payloads themselves.

use crate::error::{ClientError, ProtocolError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thecamp_domain::core::serde_helpers::number_or_string;
use tracing::{debug, warn};

/// Result code the portal uses for success, on both envelope levels.
pub const SUCCESS_CODE: i64 = 200;

const NESTED_CODE_FIELD: &str = "result_code";

/// Outer response envelope.
///
/// An empty response body decodes to `Envelope::default()` (code 0), since
/// some endpoints answer a successful call with no payload at all.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(rename = "resultCode", default, deserialize_with = "number_or_string")]
    pub code: i64,
    #[serde(rename = "resultMessage", default)]
    pub message: Option<String>,
    #[serde(rename = "resultData", default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Decode a raw response body.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            debug!("Empty response body, using zero-value envelope");
            return Ok(Self::default());
        }
        serde_json::from_slice(raw).map_err(|e| classify("envelope", e))
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    /// Fail with [`ProtocolError::Rejected`] unless the outer code is 200.
    pub fn ensure_success(&self) -> std::result::Result<(), ProtocolError> {
        if self.is_success() {
            Ok(())
        } else {
            warn!(code = self.code, message = self.message(), "Portal returned non-success code");
            Err(ProtocolError::Rejected {
                code: self.code,
                message: self.message().to_string(),
            })
        }
    }

    /// Decode `resultData.<field>` as a nested envelope and map its payload onto `T`.
    ///
    /// Both the outer code and the nested `result_code` must be 200. The field
    /// may hold a JSON-encoded string (the usual case) or an already decoded
    /// object.
    pub fn nested<T: DeserializeOwned>(&self, field: &str) -> Result<T> {
        self.ensure_success()?;

        let raw = self
            .data
            .as_ref()
            .and_then(|data| data.get(field))
            .ok_or_else(|| ProtocolError::MissingField(format!("resultData.{}", field)))?;

        let inner: Value = match raw {
            Value::String(encoded) => {
                serde_json::from_str(encoded).map_err(|e| classify(field, e))?
            }
            Value::Object(_) => raw.clone(),
            other => {
                return Err(ProtocolError::UnexpectedShape {
                    field: field.to_string(),
                    detail: format!("expected a JSON string or object, found {}", kind(other)),
                }
                .into());
            }
        };

        let code = nested_code(field, &inner)?;
        if code != SUCCESS_CODE {
            warn!(field, code, "Nested envelope returned non-success code");
            return Err(ProtocolError::NestedRejected {
                field: field.to_string(),
                code,
            }
            .into());
        }

        debug!(field, "Decoded nested envelope");
        serde_json::from_value(inner).map_err(|e| {
            ProtocolError::UnexpectedShape {
                field: field.to_string(),
                detail: e.to_string(),
            }
            .into()
        })
    }
}

fn nested_code(field: &str, inner: &Value) -> Result<i64> {
    let value = inner.get(NESTED_CODE_FIELD).ok_or_else(|| {
        ProtocolError::MissingField(format!("{}.{}", field, NESTED_CODE_FIELD))
    })?;

    let code = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    code.ok_or_else(|| {
        ProtocolError::UnexpectedShape {
            field: format!("{}.{}", field, NESTED_CODE_FIELD),
            detail: format!("expected an integer, found {}", value),
        }
        .into()
    })
}

/// Syntax errors are decode failures; well-formed JSON of the wrong shape is a
/// protocol violation.
fn classify(field: &str, error: serde_json::Error) -> ClientError {
    if error.is_data() {
        ProtocolError::UnexpectedShape {
            field: field.to_string(),
            detail: error.to_string(),
        }
        .into()
    } else {
        ClientError::Decode(error)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
