//! Error types for argline.
//!
//! [`CommandError`] covers everything that can go wrong while a command pulls
//! its arguments or runs; the dispatcher recovers from every variant.
//! [`Error`] covers the ambient layers around the core (configuration, I/O,
//! structured invocations).

use thiserror::Error;

use crate::commands::types::ArgType;

/// Failure raised by a cursor or a command body during one dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A required argument was requested but the source is exhausted.
    #[error("not enough arguments specified")]
    NotEnoughArguments,

    /// The command declared itself finished but input remains.
    #[error("too many arguments specified")]
    TooManyArguments,

    /// A quoted token reached the end of the line without its closing quote.
    #[error("unclosed quote encountered at byte {position}")]
    UnclosedQuote { position: usize },

    /// The line ends with a backslash that escapes nothing.
    #[error("argument ends with an unexpected escape character at byte {position}")]
    UnexpectedEscapeCharacter { position: usize },

    /// A `\x`, `\u` or octal escape is malformed.
    #[error("escape format specified incorrectly at byte {position}")]
    InvalidEscapeFormat { position: usize },

    /// The token is not a valid literal for the requested type.
    #[error("invalid {expected} value: {value:?}")]
    InvalidArgument { expected: ArgType, value: String },

    /// The literal does not fit the requested width or signedness.
    #[error("{expected} value out of range: {value:?}")]
    OutOfRange { expected: ArgType, value: String },

    /// A custom argument type was requested that nobody registered.
    #[error("unknown custom argument type: {0}")]
    UnknownCustomType(String),

    /// A command name did not resolve through the alias table.
    #[error("specified command not found: {0}")]
    CommandNotFound(String),

    /// A command requested another argument after consuming the full remainder.
    #[error("argument requested after the full remainder was consumed")]
    ArgumentsAfterRemainder,

    /// The command ran but reported a failure of its own.
    #[error("{0}")]
    Failed(String),
}

impl CommandError {
    /// Creates an invalid-argument error for the given type and raw token.
    pub fn invalid(expected: ArgType, value: impl Into<String>) -> Self {
        Self::InvalidArgument {
            expected,
            value: value.into(),
        }
    }

    /// Creates an out-of-range error for the given type and raw token.
    pub fn out_of_range(expected: ArgType, value: impl Into<String>) -> Self {
        Self::OutOfRange {
            expected,
            value: value.into(),
        }
    }

    /// Creates a command failure with the given message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }

    /// Returns true for errors raised while tokenizing or converting a value.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Self::UnclosedQuote { .. }
                | Self::UnexpectedEscapeCharacter { .. }
                | Self::InvalidEscapeFormat { .. }
                | Self::InvalidArgument { .. }
                | Self::OutOfRange { .. }
        )
    }
}

/// Main error type for the layers around the command core.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (unreadable file, invalid TOML, bad values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors on the terminal or a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed structured invocation.
    #[error("Invocation error: {0}")]
    Invocation(String),
}

impl Error {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an invocation error with the given message.
    pub fn invocation(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Io(_) => "I/O Error",
            Self::Invocation(_) => "Invocation Error",
        }
    }
}

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
