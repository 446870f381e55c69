//! Structured command invocations.
//!
//! A front end that already has typed values sends them as JSON instead of a
//! text line, for example:
//!
//! ```json
//! {"command": "sum", "args": [{"i32": 3}, {"i32": 4}]}
//! ```
//!
//! The values land in a [`PlaceholderCursor`], so the command body reads
//! them exactly as it would read a typed line.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::output::OutputSink;
use super::placeholder::PlaceholderCursor;
use super::router::CommandRegistry;
use super::types::ArgValue;

/// One typed argument of a structured invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationArg {
    Text(String),
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
    Full(String),
    Custom { type_name: String, value: String },
}

impl From<InvocationArg> for ArgValue {
    fn from(arg: InvocationArg) -> Self {
        match arg {
            InvocationArg::Text(v) => ArgValue::Text(v.into_bytes()),
            InvocationArg::I8(v) => ArgValue::I8(v),
            InvocationArg::I16(v) => ArgValue::I16(v),
            InvocationArg::I32(v) => ArgValue::I32(v),
            InvocationArg::I64(v) => ArgValue::I64(v),
            InvocationArg::U8(v) => ArgValue::U8(v),
            InvocationArg::U16(v) => ArgValue::U16(v),
            InvocationArg::U32(v) => ArgValue::U32(v),
            InvocationArg::U64(v) => ArgValue::U64(v),
            InvocationArg::F32(v) => ArgValue::F32(v),
            InvocationArg::F64(v) => ArgValue::F64(v),
            InvocationArg::Bool(v) => ArgValue::Bool(v),
            InvocationArg::Full(v) => ArgValue::Full(v.into_bytes()),
            InvocationArg::Custom { type_name, value } => ArgValue::Custom { type_name, value },
        }
    }
}

/// A command name plus its typed arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub command: String,
    #[serde(default)]
    pub args: Vec<InvocationArg>,
}

impl Invocation {
    /// Parses one JSON invocation.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input)
            .map_err(|e| Error::invocation(format!("malformed invocation: {e}")))
    }

    /// Builds the cursor the command will read from.
    pub fn into_cursor(self) -> PlaceholderCursor {
        PlaceholderCursor::from_values(self.args.into_iter().map(ArgValue::from))
    }

    /// Runs the invocation against `registry`.
    pub fn run(self, registry: &CommandRegistry, sink: &mut dyn OutputSink) -> bool {
        let command = self.command.clone();
        tracing::debug!(command = %command, args = self.args.len(), "Running structured invocation");
        registry.invoke(&command, self.into_cursor(), sink)
    }
}
