//! Built-in commands: `help`, `helpof` and the `sum`/`echo` demo commands.

use std::sync::Arc;

use crate::error::CommandError;

use super::cursor::TokenCursor;
use super::definitions::{ArgDef, Command};
use super::router::{CommandRegistry, ExecutionContext};
use super::types::ArgType;

/// Commands listed per `help` page unless configured otherwise.
pub const DEFAULT_HELP_PAGE_SIZE: usize = 10;

/// Paginated list of every registered command.
#[derive(Debug, Clone)]
pub struct HelpCommand {
    page_size: usize,
}

impl HelpCommand {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new(DEFAULT_HELP_PAGE_SIZE)
    }
}

const HELP_OPTIONAL: &[ArgDef] = &[ArgDef::new(ArgType::U32, "page", "Help page to show.")];

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Show commands, their usage and their description. \
         For showing information about a specific command, use /helpof command."
    }

    fn optional_args(&self) -> &[ArgDef] {
        HELP_OPTIONAL
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        let requested: Option<u32> = ctx.cursor().parse_optional()?;
        ctx.cursor().finish()?;

        let tables = ctx.registry();
        let style = tables.usage_style();
        let commands = tables.commands();
        let max_page = commands.len().saturating_sub(1) / self.page_size + 1;
        let page = (requested.unwrap_or(1) as usize).clamp(1, max_page);

        let mut out = format!("--- Help (page {page} of {max_page}) ---\n");
        for command in commands.iter().skip((page - 1) * self.page_size).take(self.page_size) {
            out.push_str(&format!(
                "{}: {}\n",
                command.format_usage(command.name(), style),
                command.description()
            ));
        }
        if page < max_page {
            out.push_str(&format!(
                "--- Next page: {}{} {} ---\n",
                style.command_prefix,
                ctx.alias(),
                page + 1
            ));
        } else {
            out.push_str("--- This is the last page ---\n");
        }

        ctx.write_str(&out);
        ctx.flush();
        Ok(())
    }
}

/// Describes a single command.
#[derive(Debug, Clone, Default)]
pub struct HelpOfCommand;

const HELPOF_ARGS: &[ArgDef] = &[ArgDef::new(
    ArgType::Text,
    "command",
    "Command to show the info of.",
)];

fn describe_arguments(out: &mut String, args: &[ArgDef]) {
    if args.is_empty() {
        out.push_str("(none)\n");
    }
    for arg in args {
        out.push_str(&format!(
            " - {} ({}): {}\n",
            arg.name,
            arg.arg_type.display_name(),
            arg.description
        ));
    }
}

impl Command for HelpOfCommand {
    fn name(&self) -> &str {
        "helpof"
    }

    fn description(&self) -> &str {
        "Show help for a specified command."
    }

    fn args(&self) -> &[ArgDef] {
        HELPOF_ARGS
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        let name: String = ctx.cursor().parse()?;
        ctx.cursor().finish()?;

        let tables = ctx.registry();
        let command = tables
            .lookup(&name)
            .ok_or_else(|| CommandError::CommandNotFound(name.clone()))?;

        let aliases: Vec<&str> = tables.aliases_of(command).collect();
        let mut out = format!("Description: {}\n", command.description());
        if aliases.is_empty() {
            out.push_str("Aliases: (none)\n");
        } else {
            out.push_str(&format!("Aliases: {}\n", aliases.join(", ")));
        }
        out.push_str(&command.format_usage(&name, tables.usage_style()));
        out.push_str("\nArguments:\n");
        describe_arguments(&mut out, command.args());
        out.push_str("Optional arguments:\n");
        describe_arguments(&mut out, command.optional_args());

        ctx.write_str(&out);
        ctx.flush();
        Ok(())
    }
}

/// Demo: adds two integers.
#[derive(Debug, Clone, Default)]
pub struct SumCommand;

const SUM_ARGS: &[ArgDef] = &[
    ArgDef::new(ArgType::I32, "number1", "First number"),
    ArgDef::new(ArgType::I32, "number2", "Second number"),
];

impl Command for SumCommand {
    fn name(&self) -> &str {
        "sum"
    }

    fn description(&self) -> &str {
        "Count the sum of two integers."
    }

    fn args(&self) -> &[ArgDef] {
        SUM_ARGS
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        let a: i32 = ctx.cursor().parse()?;
        let b: i32 = ctx.cursor().parse()?;
        ctx.cursor().finish()?;

        ctx.write_str(&format!("Result: {}\n", i64::from(a) + i64::from(b)));
        ctx.flush();
        Ok(())
    }
}

/// Demo: prints a titled message back.
#[derive(Debug, Clone, Default)]
pub struct EchoCommand;

const ECHO_ARGS: &[ArgDef] = &[
    ArgDef::new(ArgType::Text, "name", "Title name of the message."),
    ArgDef::new(ArgType::Text, "text", "Message to show to the output."),
];

impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Return the same text into the output."
    }

    fn args(&self) -> &[ArgDef] {
        ECHO_ARGS
    }

    fn execute(&self, ctx: &mut ExecutionContext<'_>) -> Result<(), CommandError> {
        // Raw bytes, so `\xHH` escapes reach the output unchanged.
        let name: Vec<u8> = ctx.cursor().parse()?;
        let text: Vec<u8> = ctx.cursor().parse()?;
        ctx.cursor().finish()?;

        ctx.write(b"Message [");
        ctx.write(&name);
        ctx.write(b"]: ");
        ctx.write(&text);
        ctx.write(b"\n");
        ctx.flush();
        Ok(())
    }
}

/// Registers `help` and `helpof`.
pub fn register_builtins(registry: &CommandRegistry, help_page_size: usize) -> bool {
    registry.register(Arc::new(HelpCommand::new(help_page_size)))
        && registry.register(Arc::new(HelpOfCommand))
}

/// Registers `sum`, `echo` and the `msg` alias for `echo`.
pub fn register_demo(registry: &CommandRegistry) -> bool {
    registry.register(Arc::new(SumCommand))
        && registry.register(Arc::new(EchoCommand))
        && registry.add_alias("msg", "echo")
}
