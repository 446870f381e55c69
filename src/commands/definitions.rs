//! Command definitions for declarative command metadata.
//!
//! A command declares its mandatory and optional arguments up front. The
//! declarations drive three things:
//! - Usage strings in help output and diagnostics
//! - Naming the offending argument when parsing fails
//! - Validation that a `full` argument comes last

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

use super::router::ExecutionContext;
use super::types::ArgType;

/// Declaration of a command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgDef {
    /// Type used to parse the argument.
    pub arg_type: ArgType,
    /// Argument name.
    pub name: Cow<'static, str>,
    /// Short description.
    pub description: Cow<'static, str>,
}

impl ArgDef {
    pub const fn new(arg_type: ArgType, name: &'static str, description: &'static str) -> Self {
        Self {
            arg_type,
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
        }
    }

    /// Creates a declaration from runtime strings.
    pub fn owned(arg_type: ArgType, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            arg_type,
            name: Cow::Owned(name.into()),
            description: Cow::Owned(description.into()),
        }
    }
}

/// A named, executable command.
///
/// Implementations pull their arguments from `ctx.cursor()` in declaration
/// order and call `finish()` once done.
pub trait Command: Send + Sync {
    /// Canonical name.
    fn name(&self) -> &str;

    /// Short description shown in help.
    fn description(&self) -> &str;

    /// Mandatory arguments, in order.
    fn args(&self) -> &[ArgDef] {
        &[]
    }

    /// Optional arguments, in order, following the mandatory ones.
    fn optional_args(&self) -> &[ArgDef] {
        &[]
    }

    /// Runs the command.
    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError>;

    /// Declaration for the argument at `position`, counting mandatory ones first.
    fn argument_at(&self, position: usize) -> Option<&ArgDef> {
        let args = self.args();
        if position < args.len() {
            args.get(position)
        } else {
            self.optional_args().get(position - args.len())
        }
    }

    /// Renders the usage line for this command invoked as `alias`.
    fn format_usage(&self, alias: &str, style: &UsageStyle) -> String {
        format_usage(alias, self.args(), self.optional_args(), style)
    }
}

/// Pieces used to render usage strings such as `/sum (a <int>) [b <int>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageStyle {
    pub command_prefix: String,
    pub arg_before: String,
    pub arg_after: String,
    pub optarg_before: String,
    pub optarg_after: String,
    pub type_before: String,
    pub type_after: String,
}

impl Default for UsageStyle {
    fn default() -> Self {
        Self {
            command_prefix: "/".to_string(),
            arg_before: "(".to_string(),
            arg_after: ")".to_string(),
            optarg_before: "[".to_string(),
            optarg_after: "]".to_string(),
            type_before: " <".to_string(),
            type_after: ">".to_string(),
        }
    }
}

/// Renders a usage line from argument declarations.
pub fn format_usage(alias: &str, args: &[ArgDef], optional: &[ArgDef], style: &UsageStyle) -> String {
    let mandatory = args
        .iter()
        .map(|arg| (arg, style.arg_before.as_str(), style.arg_after.as_str()));
    let optional = optional
        .iter()
        .map(|arg| (arg, style.optarg_before.as_str(), style.optarg_after.as_str()));

    mandatory.chain(optional).fold(
        format!("{}{}", style.command_prefix, alias),
        |mut usage, (arg, before, after)| {
            usage.push_str(&format!(
                " {before}{}{}{}{}{after}",
                arg.name,
                style.type_before,
                arg.arg_type.display_name(),
                style.type_after
            ));
            usage
        },
    )
}

/// Problems with a command's argument declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// A `full` argument is followed by another argument.
    FullNotLast { name: String },
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullNotLast { name } => {
                write!(f, "argument \"{name}\" consumes the full line but is not last")
            }
        }
    }
}

impl std::error::Error for DeclarationError {}

/// Checks that a `full` argument, if any, is the last declared one.
pub fn validate_declaration(args: &[ArgDef], optional: &[ArgDef]) -> Result<(), DeclarationError> {
    let all: Vec<&ArgDef> = args.iter().chain(optional).collect();
    match all.iter().position(|arg| arg.arg_type == ArgType::Full) {
        Some(index) if index + 1 != all.len() => Err(DeclarationError::FullNotLast {
            name: all[index].name.to_string(),
        }),
        _ => Ok(()),
    }
}

type Handler = Box<dyn Fn(&mut ExecutionContext<'_>) -> Result<(), CommandError> + Send + Sync>;

/// A command assembled from metadata and a closure.
pub struct CommandDef {
    name: String,
    description: String,
    args: Vec<ArgDef>,
    optional_args: Vec<ArgDef>,
    handler: Handler,
}

impl CommandDef {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_>) -> Result<(), CommandError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            args: Vec::new(),
            optional_args: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Appends a mandatory argument.
    pub fn arg(mut self, arg: ArgDef) -> Self {
        self.args.push(arg);
        self
    }

    /// Appends an optional argument.
    pub fn optional(mut self, arg: ArgDef) -> Self {
        self.optional_args.push(arg);
        self
    }
}

impl fmt::Debug for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDef")
            .field("name", &self.name)
            .field("args", &self.args)
            .field("optional_args", &self.optional_args)
            .finish_non_exhaustive()
    }
}

impl Command for CommandDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn args(&self) -> &[ArgDef] {
        &self.args
    }

    fn optional_args(&self) -> &[ArgDef] {
        &self.optional_args
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        (self.handler)(ctx)
    }
}
