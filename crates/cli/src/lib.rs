pub mod commands;

use clap::{Parser, Subcommand};
use std::io;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "concierge",
    about = "Concierge operator CLI",
    long_about = "Talk to the concierge responder, inspect configuration, and run readiness checks.",
    after_help = "Examples:\n  concierge chat\n  concierge ask pricing\n  concierge ask Alex --context '{\"step\":\"ask_name\"}'\n  concierge doctor --json\n  concierge smoke"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive conversation on stdin/stdout (/reset, /quit)")]
    Chat {
        #[arg(long, help = "Print each reply as a JSON line instead of formatted text")]
        json: bool,
    },
    #[command(about = "Resolve a single message and print the reply JSON")]
    Ask {
        message: String,
        #[arg(long, help = "Conversation context as JSON, e.g. '{\"step\":\"ask_email\"}'")]
        context: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, FAQ catalog integrity, and the bind address")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run a scripted conversation with per-check timing details")]
    Smoke,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat { json } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            match commands::chat::run(stdin.lock(), stdout.lock(), json) {
                Ok(_) => return ExitCode::SUCCESS,
                Err(error) => commands::CommandResult::failure(
                    "chat",
                    "io",
                    format!("chat session aborted: {error}"),
                    1,
                ),
            }
        }
        Command::Ask { message, context } => commands::ask::run(&message, context.as_deref()),
        Command::Smoke => commands::smoke::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
