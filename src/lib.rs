//! # reqscript
//!
//! A parser for **request scripts**: a `METHOD URI` command line followed by
//! an optional JSON body, as typed into a console or an editor selection.
//!
//! ```text
//! GET /foo/_search
//! {"size": 10, "query": {"term": {"field": "value"}}}
//! ```
//!
//! Parsing yields a [`ParsedRequest`] that can be validated, turned into a
//! URL, and whose body can be re-serialized as compact JSON. A
//! [`CopyGuard`] forwards input from a stream that may never produce data,
//! giving up after a short wait instead of blocking.
//!
//! ## Quick start
//!
//! ```rust
//! use reqscript::parse_request;
//!
//! let script = "POST /foo/bar\n{\n  \"size\": 10\n}\n";
//! let request = parse_request(script.as_bytes()).expect("valid script");
//! request.validate().expect("method and URI present");
//! assert_eq!(request.url(), "http://localhost:9200/foo/bar");
//! assert_eq!(request.json().unwrap(), r#"{"size":10}"#);
//! ```
//!
//! ## Guarded input
//!
//! ```rust
//! use std::time::Duration;
//! use reqscript::{CopyGuard, parse_request};
//!
//! let mut copy = Vec::new();
//! let bytes = CopyGuard::new(Duration::from_secs(1))
//!     .copy(&b"GET /_cat/indices"[..], &mut copy)
//!     .expect("source completes immediately");
//! let request = parse_request(&bytes[..]).unwrap();
//! assert_eq!(request.method(), "GET");
//! ```

mod error;
mod guard;
mod output;
mod parser;
mod types;

// Re-export public API.
pub use error::{BodyError, CopyError, ParseError, ValidationError};
pub use guard::{CopyGuard, try_parse_async};
pub use output::{format_curl, format_debug, format_json, format_line};
pub use parser::{Parser, ParserConfig};
pub use types::{DEFAULT_HOST, ParsedRequest};

/// Sample request script bundled with the crate.
pub const TEMPLATE: &str = include_str!("../templates/search.txt");

/// Read a request script from `input` and parse it with default settings.
///
/// # Errors
///
/// Returns [`ParseError`] if the input cannot be read or its command line is
/// malformed. Blank input is **not** an error; see [`ParsedRequest::validate`].
pub fn parse_request<R: std::io::Read>(input: R) -> Result<ParsedRequest, ParseError> {
    Parser::new().parse(input)
}

/// Read and parse a request script using a custom [`ParserConfig`].
///
/// # Errors
///
/// Returns [`ParseError`] if the input cannot be read, exceeds the configured
/// size, or its command line is malformed.
pub fn parse_request_with_config<R: std::io::Read>(
    input: R,
    config: ParserConfig,
) -> Result<ParsedRequest, ParseError> {
    Parser::with_config(config).parse(input)
}

/// Parse a request script held in memory with default settings.
///
/// # Errors
///
/// Returns [`ParseError`] if the command line is malformed.
pub fn parse_script(text: &str) -> Result<ParsedRequest, ParseError> {
    Parser::new().parse_str(text)
}
