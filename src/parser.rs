use std::io::Read;
use std::time::Duration;

use tracing::debug;

use crate::error::ParseError;
use crate::types::{DEFAULT_HOST, ParsedRequest};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings shared by the script parser and the copy guard.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Host stamped on every parsed request (default: `localhost:9200`).
    pub host: String,
    /// Maximum script size in bytes (default: 10 MiB).
    pub max_script_size: usize,
    /// How long the copy guard waits for the source to finish (default: 100 ms).
    pub read_timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            max_script_size: 10 * 1024 * 1024,
            read_timeout: Duration::from_millis(100),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parser for request scripts: a `METHOD URI` command line followed by an
/// optional JSON body.
///
/// ```rust
/// use reqscript::Parser;
///
/// let parser = Parser::new();
/// let request = parser.parse_str("\nPOST /foo/bar\n{\"size\": 10}\n").unwrap();
/// assert_eq!(request.method(), "POST");
/// assert_eq!(request.uri(), "/foo/bar");
/// assert_eq!(request.json().unwrap(), r#"{"size":10}"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom settings.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read `input` to the end and parse it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if reading fails, the input exceeds
    /// [`ParserConfig::max_script_size`], is not UTF-8, or the command line
    /// is malformed.
    pub fn parse<R: Read>(&self, input: R) -> Result<ParsedRequest, ParseError> {
        let limit = self.config.max_script_size;
        let mut buf = Vec::new();
        input
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut buf)?;
        if buf.len() > limit {
            return Err(ParseError::ScriptTooLarge { limit });
        }
        let text = String::from_utf8(buf).map_err(|_| ParseError::InvalidEncoding)?;
        self.parse_str(&text)
    }

    /// Parse a script already held in memory.
    ///
    /// Blank input is not an error: it yields a request with empty method,
    /// URI and body, which [`ParsedRequest::validate`] then rejects.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the command line is malformed.
    pub fn parse_str(&self, text: &str) -> Result<ParsedRequest, ParseError> {
        let Some((line, rest)) = split_command_line(text) else {
            debug!("script has no command line");
            return Ok(ParsedRequest::empty(self.config.host.as_str()));
        };

        let (method, uri) = parse_command_line(line)?;
        let body = rest.trim();
        debug!(%method, %uri, body_len = body.len(), "parsed request script");

        Ok(ParsedRequest::new(
            self.config.host.as_str(),
            method,
            uri,
            body,
        ))
    }
}

// ---------------------------------------------------------------------------
// Script splitting
// ---------------------------------------------------------------------------

/// Locate the first non-blank line; return it together with everything
/// after its line terminator.
fn split_command_line(text: &str) -> Option<(&str, &str)> {
    let mut rest = text;
    loop {
        let (line, tail) = match rest.find('\n') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        if !line.trim().is_empty() {
            return Some((line, tail.unwrap_or("")));
        }
        rest = tail?;
    }
}

/// Split a command line into exactly `METHOD URI`.
fn parse_command_line(line: &str) -> Result<(String, &str), ParseError> {
    let mut tokens = line.split_whitespace();
    let method = tokens.next().unwrap_or_default();
    let Some(uri) = tokens.next() else {
        return Err(ParseError::MissingUri(line.trim().to_owned()));
    };
    if let Some(extra) = tokens.next() {
        return Err(ParseError::UnexpectedToken(extra.to_owned()));
    }

    if !method.bytes().all(is_tchar) {
        return Err(ParseError::InvalidMethod(method.to_owned()));
    }
    if !uri.starts_with('/') {
        return Err(ParseError::InvalidUri(uri.to_owned()));
    }

    Ok((method.to_ascii_uppercase(), uri))
}

// ---------------------------------------------------------------------------
// Character classification helpers (RFC 9110)
// ---------------------------------------------------------------------------

/// `tchar` – characters allowed in HTTP tokens (method names).
///
/// ```text
/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*" / "+" / "-" / "." /
///         "^" / "_" / "`" / "|" / "~" / DIGIT / ALPHA
/// ```
#[inline]
fn is_tchar(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#'
            | b'$'
            | b'%'
            | b'&'
            | b'\''
            | b'*'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~'
            | b'0'..=b'9'
            | b'a'..=b'z'
            | b'A'..=b'Z'
    )
}

// ---------------------------------------------------------------------------
// Tests (unit)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tchar_accepts_valid_bytes() {
        for &b in b"abcXYZ019!#$%&'*+-.^_`|~" {
            assert!(is_tchar(b), "expected tchar for byte 0x{b:02X}");
        }
    }

    #[test]
    fn tchar_rejects_invalid_bytes() {
        for &b in b" \t\r\n@[]{}" {
            assert!(!is_tchar(b), "expected non-tchar for byte 0x{b:02X}");
        }
    }

    #[test]
    fn split_skips_blank_lines() {
        let (line, rest) = split_command_line("\n  \n\tGET /a\n{}\n").unwrap();
        assert_eq!(line, "\tGET /a");
        assert_eq!(rest, "{}\n");
    }

    #[test]
    fn split_last_line_without_newline() {
        assert_eq!(split_command_line("\n\nGET /a"), Some(("GET /a", "")));
    }

    #[test]
    fn split_blank_input_has_no_command_line() {
        assert_eq!(split_command_line(""), None);
        assert_eq!(split_command_line("\n \r\n\t"), None);
    }

    #[test]
    fn command_line_tolerates_crlf() {
        let (method, uri) = parse_command_line("get /x?y=1\r").unwrap();
        assert_eq!(method, "GET");
        assert_eq!(uri, "/x?y=1");
    }
}
