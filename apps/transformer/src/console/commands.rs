//! Operator commands read from the interactive console.

use std::path::PathBuf;

use shared::domain::{OutputFormat, ParseSelectionError, SourceSystem};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    SetPayload(String),
    LoadPayload(PathBuf),
    SetSource(SourceSystem),
    SetFormat(OutputFormat),
    /// Debounced trigger.
    Transform,
    /// Direct cycle, bypassing the quiet window.
    TransformNow,
    Show,
    Options,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleCommand::SetPayload(_) => "payload",
            ConsoleCommand::LoadPayload(_) => "load",
            ConsoleCommand::SetSource(_) => "source",
            ConsoleCommand::SetFormat(_) => "format",
            ConsoleCommand::Transform => "transform",
            ConsoleCommand::TransformNow => "now",
            ConsoleCommand::Show => "show",
            ConsoleCommand::Options => "options",
            ConsoleCommand::Help => "help",
            ConsoleCommand::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty command; type 'help' for the command list")]
    Empty,
    #[error("unknown command '{0}'; type 'help' for the command list")]
    Unknown(String),
    #[error("'{command}' needs an argument")]
    MissingArgument { command: &'static str },
    #[error(transparent)]
    Selection(#[from] ParseSelectionError),
}

pub const HELP_TEXT: &str = "\
commands:
  payload <text>   replace the input payload (sent verbatim, may be empty)
  load <path>      replace the input payload with a file's contents
  source <name>    select the source system
  format <name>    select the output format
  transform        debounced transform of the current fields
  now              transform immediately
  show             print the form and output pane
  options          list selectable sources and formats
  help             this text
  quit             leave";

/// Parses one console line. The `payload` argument is taken verbatim after the
/// first space so that JSON whitespace survives.
pub fn parse_console_command(line: &str) -> Result<ConsoleCommand, CommandParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Err(CommandParseError::Empty);
    }

    let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (trimmed, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "payload" => Ok(ConsoleCommand::SetPayload(rest.to_string())),
        "load" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err(CommandParseError::MissingArgument { command: "load" });
            }
            Ok(ConsoleCommand::LoadPayload(PathBuf::from(path)))
        }
        "source" => {
            let value = required_argument("source", rest)?;
            Ok(ConsoleCommand::SetSource(value.parse()?))
        }
        "format" => {
            let value = required_argument("format", rest)?;
            Ok(ConsoleCommand::SetFormat(value.parse()?))
        }
        "transform" | "t" => Ok(ConsoleCommand::Transform),
        "now" => Ok(ConsoleCommand::TransformNow),
        "show" => Ok(ConsoleCommand::Show),
        "options" => Ok(ConsoleCommand::Options),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" | "q" => Ok(ConsoleCommand::Quit),
        other => Err(CommandParseError::Unknown(other.to_string())),
    }
}

fn required_argument<'a>(
    command: &'static str,
    rest: &'a str,
) -> Result<&'a str, CommandParseError> {
    let value = rest.trim();
    if value.is_empty() {
        Err(CommandParseError::MissingArgument { command })
    } else {
        Ok(value)
    }
}
