//! Command parsing and dispatch.
//!
//! Argument sources ([`ArglineCursor`], [`PlaceholderCursor`]) implement the
//! [`TokenCursor`] protocol; [`CommandRegistry`] resolves names and runs
//! [`Command`] implementations against them.

pub mod builtin;
pub mod cursor;
pub mod custom;
pub mod definitions;
pub mod invocation;
pub mod output;
pub mod placeholder;
pub mod router;
pub mod tokenizer;
pub mod types;

pub use builtin::{register_builtins, register_demo, DEFAULT_HELP_PAGE_SIZE};
pub use cursor::{Cursor, FromArgument, Remainder, TokenCursor};
pub use custom::TypeRegistry;
pub use definitions::{format_usage, validate_declaration, ArgDef, Command, CommandDef, UsageStyle};
pub use invocation::{Invocation, InvocationArg};
pub use output::{BufferSink, OutputSink, StdoutSink};
pub use placeholder::PlaceholderCursor;
pub use router::{CommandRegistry, ExecutionContext, Tables};
pub use tokenizer::{unescape, ArglineCursor};
pub use types::{ArgType, ArgValue};
