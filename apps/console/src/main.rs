mod commands;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    config::normalize_api_base, load_settings, HttpTransport, TranscriptSession,
};
use commands::ConsoleCommand;
use shared::domain::TranscriptAction;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::JoinSet,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "transcript-console",
    version,
    about = "Index YouTube transcripts and ask questions about them"
)]
struct Args {
    /// Transcript service base address; overrides client.toml and environment
    #[arg(long)]
    api_base: Option<String>,
    /// Notification auto-dismiss delay in milliseconds
    #[arg(long)]
    toast_ttl_ms: Option<u64>,
    /// Probe the service root before reading commands
    #[arg(long)]
    check: bool,
    /// Print the error log after every transport failure
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(api_base) = args.api_base.as_deref() {
        settings.api_base = normalize_api_base(api_base)?;
    }
    if let Some(ttl) = args.toast_ttl_ms {
        settings.toast_ttl_ms = ttl;
    }
    info!(api_base = %settings.api_base, "transcript console starting");

    if args.check {
        match HttpTransport::new(settings.api_base.clone()).health().await {
            Ok(greeting) => println!("Service reachable: {greeting}"),
            Err(err) => println!("Service check failed: {err}"),
        }
    }

    let session = Arc::new(TranscriptSession::connect(&settings));
    let toast_printer = tokio::spawn(render::print_toasts(session.subscribe_toasts()));
    let mut running = JoinSet::new();
    println!("{}", commands::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        match commands::parse(&line) {
            ConsoleCommand::Run { action, input } => {
                let orchestrator = session.orchestrator(action);
                if orchestrator.is_busy() {
                    println!("[{}] still running", orchestrator.label());
                    continue;
                }
                if !input.trim().is_empty() {
                    println!("[{}]", action.busy_label());
                }
                let session = Arc::clone(&session);
                let debug = args.debug;
                running.spawn(async move {
                    let outcome = match action {
                        TranscriptAction::Upload => session.upload_transcript(&input).await,
                        TranscriptAction::Ask => session.ask_question(&input).await,
                    };
                    render::print_outcome(&session, action, &outcome, debug);
                });
            }
            ConsoleCommand::Dismiss => {
                if session.dismiss_toast().is_none() {
                    println!("No notification to dismiss");
                }
            }
            ConsoleCommand::Log => {
                println!("{}", render::format_error_log(&session.error_log().entries()));
            }
            ConsoleCommand::State => {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
            ConsoleCommand::Help => println!("{}", commands::HELP),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Empty => {}
            ConsoleCommand::Unknown(word) => {
                println!("Unknown command '{word}'; type 'help' for a list");
            }
        }

        // Reap finished actions.
        while running.try_join_next().is_some() {}
    }

    while running.join_next().await.is_some() {}
    toast_printer.abort();
    Ok(())
}
