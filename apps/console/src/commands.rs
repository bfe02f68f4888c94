//! Stdin commands understood by the console.

use shared::domain::TranscriptAction;

pub const HELP: &str = "\
Commands:
  upload <videoId>   fetch and index a YouTube transcript
  ask <question>     ask about the indexed transcripts
  dismiss            close the current notification
  log                show recent errors (newest first)
  state              print the session state as JSON
  help               show this message
  quit               wait for running actions and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Run {
        action: TranscriptAction,
        input: String,
    },
    Dismiss,
    Log,
    State,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse(line: &str) -> ConsoleCommand {
    let line = line.trim();
    if line.is_empty() {
        return ConsoleCommand::Empty;
    }

    let (word, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line, ""));
    let input = rest.trim().to_string();

    match word.to_ascii_lowercase().as_str() {
        "upload" => ConsoleCommand::Run {
            action: TranscriptAction::Upload,
            input,
        },
        "ask" => ConsoleCommand::Run {
            action: TranscriptAction::Ask,
            input,
        },
        "dismiss" => ConsoleCommand::Dismiss,
        "log" => ConsoleCommand::Log,
        "state" => ConsoleCommand::State,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => ConsoleCommand::Unknown(other.to_string()),
    }
}
