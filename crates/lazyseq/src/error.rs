use core::fmt;

/// Failure categories surfaced by pipeline builders, orderings, reducers and
/// list sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A required argument (source, predicate, projection, key selector) was absent.
    InvalidArgument,
    /// More than one element matched where at most one was allowed.
    Cardinality,
    /// A counter exceeded the representable range.
    Overflow,
    /// A list source was mutated while a cursor still held it.
    SourceBusy,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "invalid-argument",
            ErrorCode::Cardinality => "cardinality",
            ErrorCode::Overflow => "overflow",
            ErrorCode::SourceBusy => "source-busy",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
}

impl Error {
    pub fn from_code(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into() }
    }

    /// `name` is the parameter that was missing, e.g. `"predicate"`.
    pub fn invalid_argument(name: &str) -> Self {
        Self::from_code(ErrorCode::InvalidArgument, format!("argument `{name}` must be present"))
    }

    pub fn cardinality(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::Cardinality, msg)
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::Overflow, msg)
    }

    pub fn source_busy(msg: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::SourceBusy, msg)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

/// Unwraps an optional argument or fails with [`ErrorCode::InvalidArgument`].
pub(crate) fn require<T>(value: Option<T>, name: &str) -> Result<T, Error> {
    value.ok_or_else(|| Error::invalid_argument(name))
}
