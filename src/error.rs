use std::fmt;
use std::io;

/// Errors raised while reading and splitting a request script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The command line holds a method but no URI (e.g. a bare `GET`).
    MissingUri(String),
    /// The command line carries more than the two `METHOD URI` tokens.
    UnexpectedToken(String),
    /// The method token contains characters outside the HTTP token set.
    InvalidMethod(String),
    /// The URI token does not start with `/`.
    InvalidUri(String),
    /// The script exceeds the configured maximum size.
    ScriptTooLarge {
        /// Configured limit in bytes.
        limit: usize,
    },
    /// The script is not valid UTF-8.
    InvalidEncoding,
    /// Reading the input stream failed.
    Io(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUri(line) => write!(f, "missing URI in command line: '{line}'"),
            Self::UnexpectedToken(tok) => {
                write!(f, "unexpected token after URI in command line: '{tok}'")
            }
            Self::InvalidMethod(m) => write!(f, "invalid method: '{m}'"),
            Self::InvalidUri(u) => write!(f, "invalid URI (must start with '/'): '{u}'"),
            Self::ScriptTooLarge { limit } => {
                write!(f, "script exceeds maximum allowed size of {limit} bytes")
            }
            Self::InvalidEncoding => write!(f, "script is not valid UTF-8"),
            Self::Io(msg) => write!(f, "failed to read script: {msg}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<io::Error> for ParseError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// A parsed request lacks a field required to execute it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No method was parsed.
    MissingMethod,
    /// No URI was parsed.
    MissingUri,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMethod => write!(f, "request has no method"),
            Self::MissingUri => write!(f, "request has no URI"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The request body is not an acceptable JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyError {
    /// The body is not syntactically valid JSON.
    Malformed {
        /// 1-based line of the failure within the body.
        line: usize,
        /// 1-based column of the failure within the body.
        column: usize,
        /// Description reported by the JSON parser.
        message: String,
    },
    /// The body is valid JSON but its top level is neither an object nor an array.
    UnexpectedTopLevel {
        /// Kind of value found (`"string"`, `"number"`, ...).
        found: &'static str,
    },
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed {
                line,
                column,
                message,
            } => write!(f, "malformed JSON body at {line}:{column}: {message}"),
            Self::UnexpectedTopLevel { found } => {
                write!(f, "JSON body must be an object or array, found {found}")
            }
        }
    }
}

impl std::error::Error for BodyError {}

impl From<serde_json::Error> for BodyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Failure of a guarded copy from a source stream into a sink.
#[derive(Debug)]
pub enum CopyError {
    /// The source produced no complete read before the deadline.
    Timeout,
    /// The source failed before the deadline.
    Read(io::Error),
    /// Writing the copied bytes to the sink failed.
    Write(io::Error),
}

impl CopyError {
    /// Returns `true` for [`CopyError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for input"),
            Self::Read(e) => write!(f, "failed to read input: {e}"),
            Self::Write(e) => write!(f, "failed to write copied input: {e}"),
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timeout => None,
            Self::Read(e) | Self::Write(e) => Some(e),
        }
    }
}
