//! Command registry and dispatch.
//!
//! Resolves the first word of a line through the alias table, wraps the rest
//! of the line in an [`ArglineCursor`] and runs the command. Every
//! [`CommandError`] a command returns is rendered to the output sink here,
//! naming the argument the cursor was filling.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::CommandError;

use super::cursor::{Cursor, TokenCursor};
use super::custom::TypeRegistry;
use super::definitions::{validate_declaration, Command, UsageStyle};
use super::output::{OutputSink, StdoutSink};
use super::tokenizer::ArglineCursor;

/// Called with the unresolved name when a line names no known command.
pub type UnknownCommandHandler = Box<dyn Fn(&str, &mut dyn OutputSink) + Send + Sync>;

/// Creates the sink used by [`CommandRegistry::dispatch`].
pub type SinkFactory = Box<dyn Fn() -> Box<dyn OutputSink> + Send + Sync>;

fn default_unknown_handler(name: &str, sink: &mut dyn OutputSink) {
    sink.write_str(&format!("Unknown command: {name}\n"));
    sink.flush();
}

fn same_command(a: &Arc<dyn Command>, b: &Arc<dyn Command>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Registry state guarded by the registry lock.
///
/// Commands receive a shared reference during execution, so they can inspect
/// other commands without locking again.
pub struct Tables {
    aliases: BTreeMap<String, Arc<dyn Command>>,
    commands: Vec<Arc<dyn Command>>,
    types: Arc<TypeRegistry>,
    usage_style: UsageStyle,
    unknown_handler: UnknownCommandHandler,
    sink_factory: SinkFactory,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            aliases: BTreeMap::new(),
            commands: Vec::new(),
            types: Arc::new(TypeRegistry::new()),
            usage_style: UsageStyle::default(),
            unknown_handler: Box::new(default_unknown_handler),
            sink_factory: Box::new(|| Box::new(StdoutSink) as Box<dyn OutputSink>),
        }
    }
}

impl Tables {
    /// Resolves an invocation name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Command>> {
        self.aliases.get(name)
    }

    /// Number of distinct registered commands.
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Distinct commands sorted by canonical name.
    pub fn commands(&self) -> Vec<&Arc<dyn Command>> {
        let mut commands: Vec<_> = self.commands.iter().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Every invocation name that resolves to `command`, in sorted order.
    pub fn aliases_of<'a>(&'a self, command: &'a Arc<dyn Command>) -> impl Iterator<Item = &'a str> {
        self.aliases
            .iter()
            .filter(move |(_, target)| same_command(target, command))
            .map(|(name, _)| name.as_str())
    }

    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn usage_style(&self) -> &UsageStyle {
        &self.usage_style
    }
}

impl fmt::Debug for Tables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tables")
            .field("aliases", &self.aliases.keys().collect::<Vec<_>>())
            .field("command_count", &self.commands.len())
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

/// Everything a command sees while it runs.
pub struct ExecutionContext<'a> {
    cursor: Cursor,
    alias: &'a str,
    command: &'a Arc<dyn Command>,
    tables: &'a Tables,
    sink: &'a mut dyn OutputSink,
}

impl<'a> ExecutionContext<'a> {
    /// Argument source for this invocation.
    pub fn cursor(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    /// Name the command was invoked under.
    pub fn alias(&self) -> &str {
        self.alias
    }

    /// The running command.
    pub fn command(&self) -> &Arc<dyn Command> {
        self.command
    }

    /// Read-only view of the registry.
    pub fn registry(&self) -> &Tables {
        self.tables
    }

    pub fn write(&mut self, data: &[u8]) {
        self.sink.write(data);
    }

    pub fn write_str(&mut self, text: &str) {
        self.sink.write_str(text);
    }

    pub fn flush(&mut self) {
        self.sink.flush();
    }

    /// Usage line of the running command under its invocation name.
    pub fn usage(&self) -> String {
        self.command.format_usage(self.alias, &self.tables.usage_style)
    }

    /// Renders a command failure into a user-facing message.
    fn describe(&self, err: &CommandError) -> String {
        let command = self.command.as_ref();
        let position = self.cursor.argument_position();
        let argument = command
            .argument_at(position)
            .map(|arg| arg.name.to_string())
            .unwrap_or_else(|| format!("#{}", position + 1));
        let usage = self.usage();

        match err {
            CommandError::NotEnoughArguments => format!(
                "This command requires at least {} arguments, but received {position}.\n{usage}\n",
                command.args().len()
            ),
            CommandError::TooManyArguments => format!(
                "This command requires at most {} arguments, but received more.\n{usage}\n",
                command.args().len() + command.optional_args().len()
            ),
            CommandError::UnclosedQuote { .. } => {
                format!("Unclosed quote in argument \"{argument}\".\n{usage}\n")
            }
            CommandError::UnexpectedEscapeCharacter { .. } => {
                "Error: unexpected escape character encountered at the end of the line.\n"
                    .to_string()
            }
            CommandError::InvalidEscapeFormat { .. } => {
                let rest = match &self.cursor {
                    Cursor::Argline(cursor) => cursor.rest(),
                    Cursor::Placeholder(_) => "",
                };
                format!("Invalid escape code sequence specified for argument \"{argument}\":\n{rest}\n")
            }
            CommandError::InvalidArgument { .. } => {
                format!("Invalid value specified for argument \"{argument}\".\n{usage}\n")
            }
            CommandError::OutOfRange { .. } => {
                format!("Value outside of the boundaries provided for argument \"{argument}\".\n")
            }
            CommandError::UnknownCustomType(type_name) => {
                format!("Argument \"{argument}\" has unknown type \"{type_name}\".\n")
            }
            CommandError::CommandNotFound(name) => format!("Command \"{name}\" not found.\n"),
            CommandError::ArgumentsAfterRemainder => format!(
                "Command \"{}\" requested an argument after the full text.\n",
                self.alias
            ),
            CommandError::Failed(msg) => format!("{msg}\n"),
        }
    }
}

/// Maps invocation names to commands and dispatches lines to them.
///
/// One lock guards every table and is held for the whole of a dispatch.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    tables: Mutex<Tables>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers `command` under its canonical name.
    pub fn register(&self, command: Arc<dyn Command>) -> bool {
        let name = command.name().to_string();
        self.register_as(name, command)
    }

    /// Registers `command` under `name`.
    ///
    /// Returns false, leaving the tables untouched, when the name is taken or
    /// a `full` argument is not declared last.
    pub fn register_as(&self, name: impl Into<String>, command: Arc<dyn Command>) -> bool {
        let name = name.into();
        if let Err(e) = validate_declaration(command.args(), command.optional_args()) {
            tracing::warn!(command = %name, "Refusing to register command: {e}");
            return false;
        }

        let mut tables = self.lock();
        if tables.aliases.contains_key(&name) {
            tracing::debug!(command = %name, "Command name already registered");
            return false;
        }
        if !tables.commands.iter().any(|c| same_command(c, &command)) {
            tables.commands.push(Arc::clone(&command));
        }
        tables.aliases.insert(name.clone(), command);
        tracing::info!(command = %name, "Registered command");
        true
    }

    /// Makes `alias` resolve to the command currently registered as `existing`.
    pub fn add_alias(&self, alias: impl Into<String>, existing: &str) -> bool {
        let alias = alias.into();
        let mut tables = self.lock();
        if tables.aliases.contains_key(&alias) {
            return false;
        }
        let Some(target) = tables.aliases.get(existing).cloned() else {
            return false;
        };
        tracing::info!(alias = %alias, target = existing, "Added alias");
        tables.aliases.insert(alias, target);
        true
    }

    /// Removes one alias entry. The command stays registered.
    pub fn remove_alias(&self, alias: &str) -> bool {
        let removed = self.lock().aliases.remove(alias).is_some();
        if removed {
            tracing::info!(alias, "Removed alias");
        }
        removed
    }

    /// Unregisters the command `name` resolves to.
    ///
    /// The command leaves the distinct command set. Alias entries, `name`
    /// included, are only removed with `delete_aliases`.
    pub fn unregister(&self, name: &str, delete_aliases: bool) -> bool {
        let mut tables = self.lock();
        let Some(command) = tables.aliases.get(name).cloned() else {
            return false;
        };
        tables.commands.retain(|c| !same_command(c, &command));
        if delete_aliases {
            tables.aliases.retain(|_, target| !same_command(target, &command));
        }
        tracing::info!(command = name, delete_aliases, "Unregistered command");
        true
    }

    /// Resolves an invocation name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.lock().lookup(name).cloned()
    }

    pub fn command_count(&self) -> usize {
        self.lock().command_count()
    }

    /// Distinct commands sorted by canonical name.
    pub fn commands(&self) -> Vec<Arc<dyn Command>> {
        self.lock().commands().into_iter().cloned().collect()
    }

    /// Every invocation name that resolves to `command`.
    pub fn aliases_of(&self, command: &Arc<dyn Command>) -> Vec<String> {
        self.lock()
            .aliases_of(command)
            .map(str::to_string)
            .collect()
    }

    /// Registers a custom argument type. Returns false if the name is taken.
    pub fn register_type<F>(&self, name: impl Into<String>, parser: F) -> bool
    where
        F: Fn(&str) -> Result<String, String> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut tables = self.lock();
        let added = Arc::make_mut(&mut tables.types).register(name.clone(), parser);
        if added {
            tracing::info!(type_name = %name, "Registered custom argument type");
        }
        added
    }

    /// Removes a custom argument type. Commands declaring it fail to parse
    /// that argument from then on.
    pub fn unregister_type(&self, name: &str) -> bool {
        let mut tables = self.lock();
        let removed = Arc::make_mut(&mut tables.types).unregister(name);
        if removed {
            tracing::info!(type_name = name, "Unregistered custom argument type");
        }
        removed
    }

    pub fn set_usage_style(&self, style: UsageStyle) {
        self.lock().usage_style = style;
    }

    pub fn usage_style(&self) -> UsageStyle {
        self.lock().usage_style.clone()
    }

    /// Replaces the handler for lines naming no known command.
    pub fn set_unknown_handler<F>(&self, handler: F)
    where
        F: Fn(&str, &mut dyn OutputSink) + Send + Sync + 'static,
    {
        self.lock().unknown_handler = Box::new(handler);
    }

    /// Replaces the factory producing the sink for [`dispatch`](Self::dispatch).
    pub fn set_sink_factory<F>(&self, factory: F)
    where
        F: Fn() -> Box<dyn OutputSink> + Send + Sync + 'static,
    {
        self.lock().sink_factory = Box::new(factory);
    }

    /// Dispatches `line` with output going to a fresh sink from the factory.
    pub fn dispatch(&self, line: &str) -> bool {
        let tables = self.lock();
        let mut sink = (tables.sink_factory)();
        dispatch_locked(&tables, line, sink.as_mut())
    }

    /// Dispatches `line` with output going to `sink`.
    ///
    /// Returns true when the command ran to completion.
    pub fn dispatch_to(&self, line: &str, sink: &mut dyn OutputSink) -> bool {
        let tables = self.lock();
        dispatch_locked(&tables, line, sink)
    }

    /// Runs the command registered as `name` against a pre-built cursor.
    pub fn invoke(&self, name: &str, cursor: impl Into<Cursor>, sink: &mut dyn OutputSink) -> bool {
        let tables = self.lock();
        let Some(command) = tables.lookup(name) else {
            tracing::warn!(command = name, "Unknown command");
            (tables.unknown_handler)(name, sink);
            return false;
        };
        run(&tables, name, command, cursor.into(), sink)
    }
}

fn dispatch_locked(tables: &Tables, line: &str, sink: &mut dyn OutputSink) -> bool {
    let (name, argline) = line.split_once(' ').unwrap_or((line, ""));
    tracing::debug!(command = name, "Dispatching line");

    let Some(command) = tables.lookup(name) else {
        tracing::warn!(command = name, "Unknown command");
        (tables.unknown_handler)(name, sink);
        return false;
    };
    let cursor = ArglineCursor::new(argline).with_types(Arc::clone(&tables.types));
    run(tables, name, command, cursor.into(), sink)
}

fn run(
    tables: &Tables,
    alias: &str,
    command: &Arc<dyn Command>,
    cursor: Cursor,
    sink: &mut dyn OutputSink,
) -> bool {
    let mut ctx = ExecutionContext {
        cursor,
        alias,
        command,
        tables,
        sink,
    };

    match command.execute(&mut ctx) {
        Ok(()) => true,
        Err(err) => {
            if err == CommandError::ArgumentsAfterRemainder {
                tracing::error!(command = alias, "Argument requested after the full remainder");
            } else if err.is_parse_error() {
                tracing::debug!(command = alias, error = %err, "Argument did not parse");
            } else {
                tracing::debug!(command = alias, error = %err, "Command failed");
            }
            let message = ctx.describe(&err);
            ctx.write_str(&message);
            ctx.flush();
            false
        }
    }
}
