//! argline - interactive prompt dispatching typed commands.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use argline::cli::Cli;
use argline::commands::{
    register_builtins, register_demo, CommandRegistry, Invocation, OutputSink, StdoutSink,
};
use argline::config::Config;
use argline::error::Error;
use argline::logging;
use tracing::{error, info, warn};

fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run() {
        let category = e.downcast_ref::<Error>().map_or("Error", Error::category);
        error!("{category}: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    let registry = CommandRegistry::new();
    if !register_builtins(&registry, config.repl.help_page_size) || !register_demo(&registry) {
        anyhow::bail!("failed to register the built-in commands");
    }
    for alias in config.apply(&registry) {
        warn!("Alias '{alias}' from {} was not added", config_path.display());
    }

    let prompt = cli.prompt.as_deref().unwrap_or(&config.repl.prompt);
    let mut stdout = io::stdout();
    if !cli.structured {
        writeln!(
            stdout,
            "Type a command, '{}help' to list commands or '{}' to leave.",
            config.repl.prompt, config.repl.quit_word
        )
        .context("failed to write greeting")?;
    }

    let mut sink = StdoutSink;
    let mut input = io::stdin().lock();
    let mut line = String::new();
    loop {
        if !cli.structured {
            write!(stdout, "{prompt}").context("failed to write prompt")?;
            stdout.flush().context("failed to flush prompt")?;
        }

        line.clear();
        if input.read_line(&mut line).context("failed to read input")? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);
        if line == config.repl.quit_word {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if cli.structured {
            run_structured(&registry, line, &mut sink);
        } else {
            registry.dispatch_to(line, &mut sink);
        }
    }

    Ok(())
}

fn run_structured(registry: &CommandRegistry, line: &str, sink: &mut dyn OutputSink) {
    match Invocation::from_json(line) {
        Ok(invocation) => {
            invocation.run(registry, sink);
        }
        Err(e) => {
            warn!("{}: {e}", e.category());
            sink.write_str(&format!("{e}\n"));
            sink.flush();
        }
    }
}
