use bugboard::cli::commands;
use bugboard::cli::{Cli, Commands};
use bugboard::config;
use bugboard::logging::init_logging;
use bugboard::{BugError, StructuredError};
use clap::Parser;
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, None) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    let json = cli.json;

    let result = match &cli.command {
        Commands::Init { force } => commands::init::execute(*force, json, None),
        Commands::Create(args) => commands::create::execute(args, json, &overrides),
        Commands::List(args) => commands::list::execute(args, json, &overrides),
        Commands::Show { id } => commands::show::execute(id, json, &overrides),
        Commands::Update(args) => commands::update::execute(args, json, &overrides),
        Commands::Close(args) => commands::close::execute(args, json, &overrides),
        Commands::Approve(args) => commands::approve::execute(args, json, &overrides),
        Commands::Reopen(args) => commands::reopen::execute(args, json, &overrides),
        Commands::Delete(args) => commands::delete::execute(args, json, &overrides),
        Commands::Stats => commands::stats::execute(json, &overrides),
        Commands::Trend => commands::trend::execute(json, &overrides),
        Commands::Completions(args) => commands::completions::execute(args),
    };

    if let Err(e) = result {
        handle_error(&e, json, &overrides);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color. Unknown IDs
/// get "did you mean" suggestions from the workspace.
fn handle_error(err: &BugError, json_mode: bool, overrides: &config::CliOverrides) -> ! {
    let structured = match err {
        BugError::BugNotFound { id } => {
            StructuredError::bug_not_found(id, &commands::known_ids(overrides))
        }
        _ => StructuredError::from_error(err),
    };
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        actor: cli.actor.clone(),
        role: cli.role.clone(),
        json: cli.json.then_some(true),
        no_color: cli.no_color.then_some(true),
        lock_timeout: cli.lock_timeout,
    }
}
