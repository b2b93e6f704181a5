use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{BodyError, ValidationError};

/// Host used when the caller does not configure one.
pub const DEFAULT_HOST: &str = "localhost:9200";

// ---------------------------------------------------------------------------
// ParsedRequest
// ---------------------------------------------------------------------------

/// The result of parsing a request script.
///
/// Built once by the [`Parser`](crate::Parser) and read through accessors
/// afterwards. Whether the request is executable is decided separately by
/// [`validate`](Self::validate); whether its body is usable by
/// [`json`](Self::json).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRequest {
    host: String,
    method: String,
    uri: String,
    #[serde(serialize_with = "serialize_body")]
    body: String,
}

/// Serialize the body as embedded JSON when it parses, as a plain string
/// otherwise.
fn serialize_body<S: Serializer>(body: &str, s: S) -> Result<S::Ok, S::Error> {
    match parse_body(body) {
        Ok(None) => s.serialize_none(),
        Ok(Some(value)) => value.serialize(s),
        Err(_) => s.serialize_str(body),
    }
}

impl ParsedRequest {
    pub(crate) fn new(
        host: impl Into<String>,
        method: impl Into<String>,
        uri: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            method: method.into(),
            uri: uri.into(),
            body: body.into(),
        }
    }

    /// A request with no command line, produced for blank input.
    pub(crate) fn empty(host: impl Into<String>) -> Self {
        Self::new(host, "", "", "")
    }

    /// Return a copy of this request aimed at a different host.
    pub fn with_host(self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self
        }
    }

    /// Target host, `host[:port]`.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Uppercase request method, empty when no command line was present.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path and optional query string.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Body text exactly as captured from the script.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Full URL: `http://` + host + URI.
    pub fn url(&self) -> String {
        format!("http://{}{}", self.host, self.uri)
    }

    /// Check that the request carries a method and a URI.
    ///
    /// The body is not inspected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.method.is_empty() {
            return Err(ValidationError::MissingMethod);
        }
        if self.uri.is_empty() {
            return Err(ValidationError::MissingUri);
        }
        Ok(())
    }

    /// Return the body re-serialized as compact JSON.
    ///
    /// An empty or whitespace-only body yields an empty string. Object keys
    /// keep their original order.
    ///
    /// # Errors
    ///
    /// Returns [`BodyError`] if the body is not a JSON object or array.
    pub fn json(&self) -> Result<String, BodyError> {
        match parse_body(&self.body)? {
            None => Ok(String::new()),
            Some(value) => Ok(value.to_string()),
        }
    }

    /// Return the parsed body, or `None` when the body is empty.
    ///
    /// # Errors
    ///
    /// Same as [`json`](Self::json).
    pub fn json_value(&self) -> Result<Option<Value>, BodyError> {
        parse_body(&self.body)
    }

    /// Returns `true` if the body is empty or whitespace-only.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

fn parse_body(body: &str) -> Result<Option<Value>, BodyError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Object(_) | Value::Array(_) => Ok(Some(value)),
        other => Err(BodyError::UnexpectedTopLevel {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_none() {
        assert_eq!(parse_body("").unwrap(), None);
        assert_eq!(parse_body(" \n\t ").unwrap(), None);
    }

    #[test]
    fn scalar_top_level_is_rejected() {
        for (body, kind) in [("42", "number"), ("\"x\"", "string"), ("true", "boolean"), ("null", "null")] {
            assert_eq!(
                parse_body(body),
                Err(BodyError::UnexpectedTopLevel { found: kind }),
                "body {body}"
            );
        }
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        assert!(matches!(
            parse_body("{} {}"),
            Err(BodyError::Malformed { .. })
        ));
    }

    #[test]
    fn malformed_reports_position() {
        let err = parse_body("{\n  \"a\": }").unwrap_err();
        match err {
            BodyError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
