//! Argument type tags and the typed values cursors produce.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag of a command argument.
///
/// `Full` consumes the rest of the line and must be the last declared
/// argument of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    /// Token-bounded string: `one`, `'two words'`, `"two words"`.
    Text,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// yes | no | on | off | true | false | y | n | t | f
    Bool,
    /// The remainder of the line, unescaped as one string.
    Full,
    /// Externally registered type, parsed from a text token.
    Custom,
}

impl ArgType {
    /// Returns the name shown in usage strings and diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::I8 => "tiny int",
            Self::I16 => "short int",
            Self::I32 => "int",
            Self::I64 => "big int",
            Self::U8 => "+tiny int",
            Self::U16 => "+short int",
            Self::U32 => "+int",
            Self::U64 => "+big int",
            Self::F32 => "float",
            Self::F64 => "double float",
            Self::Bool => "yes/no",
            Self::Full => "full text...",
            Self::Custom => "[predefined]",
        }
    }
}

impl fmt::Display for ArgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A typed argument value handed out by a cursor.
///
/// Text values are raw bytes: `\xHH` escapes may yield sequences that are
/// not valid UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(Vec<u8>),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Full(Vec<u8>),
    Custom { type_name: String, value: String },
}

impl ArgValue {
    /// Returns the type tag matching this value.
    pub fn arg_type(&self) -> ArgType {
        match self {
            Self::Text(_) => ArgType::Text,
            Self::I8(_) => ArgType::I8,
            Self::I16(_) => ArgType::I16,
            Self::I32(_) => ArgType::I32,
            Self::I64(_) => ArgType::I64,
            Self::U8(_) => ArgType::U8,
            Self::U16(_) => ArgType::U16,
            Self::U32(_) => ArgType::U32,
            Self::U64(_) => ArgType::U64,
            Self::F32(_) => ArgType::F32,
            Self::F64(_) => ArgType::F64,
            Self::Bool(_) => ArgType::Bool,
            Self::Full(_) => ArgType::Full,
            Self::Custom { .. } => ArgType::Custom,
        }
    }
}
