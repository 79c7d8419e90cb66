//! Error types for parsing, marshaling, emitting and binding.
use std::fmt;

use serde::{de, ser};
#[cfg(feature = "deserialize")]
use saphyr_parser::{ScanError, Span};

use crate::value::Value;

/// Row/column location within the source YAML document (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// 1-indexed row number in the input stream.
    pub row: usize,
    /// 1-indexed column number in the input stream.
    pub column: usize,
}

impl Location {
    pub(crate) const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.row, self.column)
    }
}

/// Convert a `saphyr_parser::Span` to a 1-indexed `Location`.
///
/// Called by:
/// - The saphyr event source for each raw parser event.
#[cfg(feature = "deserialize")]
pub(crate) fn location_from_span(span: &Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}

/// Why the tree builder gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseReason {
    /// The event source reported a syntax error.
    Syntax(String),
    /// A sequence or mapping was used as a mapping key.
    NonScalarKey,
    /// The event stream ended inside an open collection.
    UnexpectedEnd,
    /// The input uses a YAML feature this crate does not model (aliases).
    Unsupported(&'static str),
    /// Nesting went deeper than `ParseOptions::max_depth`.
    TooDeep(usize),
    /// The document holds more nodes after its root node.
    TrailingContent,
}

impl fmt::Display for ParseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseReason::Syntax(msg) => f.write_str(msg),
            ParseReason::NonScalarKey => f.write_str("mapping keys must be scalars"),
            ParseReason::UnexpectedEnd => f.write_str("unexpected end of input"),
            ParseReason::Unsupported(what) => write!(f, "{what} are not supported"),
            ParseReason::TooDeep(max) => write!(f, "nesting deeper than {max} levels"),
            ParseReason::TrailingContent => f.write_str("content after the document root"),
        }
    }
}

/// The document could not be turned into a [`Value`].
///
/// `Display` prints the fixed message `Error parsing YAML.`; the alternate form
/// (`{:#}`) appends the reason and, when known, the location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    reason: ParseReason,
    location: Option<Location>,
}

impl ParseError {
    pub(crate) fn new(reason: ParseReason, location: Option<Location>) -> Self {
        Self { reason, location }
    }

    /// What went wrong.
    pub fn reason(&self) -> &ParseReason {
        &self.reason
    }

    /// Where it went wrong, if the event source reported a position.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Map a `saphyr_parser::ScanError` into a syntax error with location.
    #[cfg(feature = "deserialize")]
    pub(crate) fn from_scan_error(err: ScanError) -> Self {
        let mark = err.marker();
        Self::new(
            ParseReason::Syntax(err.info().to_owned()),
            Some(Location::new(mark.line(), mark.col() + 1)),
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Error parsing YAML.")?;
        if f.alternate() {
            write!(f, " {}", self.reason)?;
            if let Some(location) = self.location {
                write!(f, " at {location}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// A host value has no defined mapping to a YAML node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarshalError {
    /// The value's type is outside the marshalable set.
    UnsupportedType { type_name: &'static str },
    /// A mapping key did not serialize to a string.
    NonStringKey { type_name: &'static str },
    /// Free-form message raised by a user `Serialize` impl.
    Message { msg: String },
}

impl MarshalError {
    pub(crate) fn unsupported(type_name: &'static str) -> Self {
        MarshalError::UnsupportedType { type_name }
    }
}

impl fmt::Display for MarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarshalError::UnsupportedType { type_name } => {
                write!(f, "error marshaling unknown type {type_name}")
            }
            MarshalError::NonStringKey { type_name } => {
                write!(f, "error marshaling mapping key of type {type_name}: keys must be strings")
            }
            MarshalError::Message { msg } => f.write_str(msg),
        }
    }
}

impl std::error::Error for MarshalError {}

impl ser::Error for MarshalError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        MarshalError::Message {
            msg: msg.to_string(),
        }
    }
}

/// The event sink rejected an event or could not flush.
#[derive(Debug)]
pub enum EmitError {
    /// Wrapper for formatting errors of the `fmt::Write` target.
    Format { error: fmt::Error },
    /// The event does not fit the current emitter state.
    Rejected { msg: String },
}

impl EmitError {
    #[cold]
    pub(crate) fn rejected(msg: impl Into<String>) -> Self {
        EmitError::Rejected { msg: msg.into() }
    }
}

impl From<fmt::Error> for EmitError {
    fn from(error: fmt::Error) -> Self {
        EmitError::Format { error }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmitError::Format { error } => write!(f, "YAML error emitting: {error}"),
            EmitError::Rejected { msg } => write!(f, "YAML error emitting: {msg}"),
        }
    }
}

impl std::error::Error for EmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EmitError::Format { error } => Some(error),
            EmitError::Rejected { .. } => None,
        }
    }
}

/// A [`Value`] did not fit the destination it was bound into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindError {
    /// Free-form message, typically from a `Deserialize` impl.
    Message { msg: String },
    /// The value has the wrong shape for the destination.
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Scalar text is not a valid number of the destination type (strict mode).
    InvalidNumber { text: String, ty: &'static str },
}

impl BindError {
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        BindError::Mismatch {
            expected,
            found: found.kind(),
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Message { msg } => f.write_str(msg),
            BindError::Mismatch { expected, found } => {
                write!(f, "cannot bind {found} into {expected}")
            }
            BindError::InvalidNumber { text, ty } => write!(f, "invalid {ty}: `{text}`"),
        }
    }
}

impl std::error::Error for BindError {}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindError::Message {
            msg: msg.to_string(),
        }
    }
}

/// Error returned by the composed helpers (`from_str`, `to_string`, `unmarshal`).
#[derive(Debug)]
pub enum Error {
    Parse(ParseError),
    Marshal(MarshalError),
    Emit(EmitError),
    Bind(BindError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

impl From<MarshalError> for Error {
    fn from(err: MarshalError) -> Self {
        Error::Marshal(err)
    }
}

impl From<EmitError> for Error {
    fn from(err: EmitError) -> Self {
        Error::Emit(err)
    }
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        Error::Bind(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => fmt::Display::fmt(err, f),
            Error::Marshal(err) => fmt::Display::fmt(err, f),
            Error::Emit(err) => fmt::Display::fmt(err, f),
            Error::Bind(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(err) => Some(err),
            Error::Marshal(err) => Some(err),
            Error::Emit(err) => Some(err),
            Error::Bind(err) => Some(err),
        }
    }
}
