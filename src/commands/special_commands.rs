//! Special commands parser for interactive chat mode
//!
//! Commands are prefixed with `/`. The command word is case-insensitive;
//! arguments (file paths in particular) are kept as typed.

use crate::attachments::{AttachmentId, AttachmentKind};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands change the composing state or show information; they are
/// never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Stage a local file through an upload channel
    Attach {
        /// Channel to stage through
        kind: AttachmentKind,
        /// Path of the file
        path: PathBuf,
    },

    /// List staged attachments
    ListAttachments,

    /// Remove a staged attachment
    RemoveAttachment(AttachmentId),

    /// Switch the model used for the next submission
    SwitchModel(String),

    /// List models for the current module
    ListModels,

    /// Show the module's preset prompts
    ListSuggestions,

    /// Copy a preset prompt into the draft (1-based)
    UseSuggestion(usize),

    /// Print the conversation so far
    ShowHistory,

    /// Show module, model, state and last error
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input is the text to send.
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, `CommandError::MissingArgument` if a required
/// argument is absent and `CommandError::UnsupportedArgument` if an
/// argument cannot be used.
///
/// # Examples
///
/// ```
/// use studiochat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/model deepseek").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchModel("deepseek".to_string()));
///
/// let cmd = parse_special_command("design a boss fight").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word.to_lowercase(), rest.trim()),
        None => (lower.clone(), ""),
    };

    match word.as_str() {
        "/image" | "/img" | "/doc" | "/document" => {
            let kind = if word.starts_with("/i") {
                AttachmentKind::Image
            } else {
                AttachmentKind::Document
            };
            if rest.is_empty() {
                return Err(missing(&word, &format!("{} <path>", word)));
            }
            Ok(SpecialCommand::Attach {
                kind,
                path: PathBuf::from(rest),
            })
        }

        "/files" | "/attachments" => Ok(SpecialCommand::ListAttachments),

        "/remove" | "/rm" => {
            if rest.is_empty() {
                return Err(missing(&word, "/remove <attachment id>"));
            }
            rest.parse::<AttachmentId>()
                .map(SpecialCommand::RemoveAttachment)
                .map_err(|_| unsupported(&word, rest))
        }

        "/model" => {
            if rest.is_empty() {
                return Err(missing("/model", "/model <model id>"));
            }
            Ok(SpecialCommand::SwitchModel(rest.to_lowercase()))
        }

        "/models" => Ok(SpecialCommand::ListModels),

        "/suggest" | "/suggestions" => {
            if rest.is_empty() {
                return Ok(SpecialCommand::ListSuggestions);
            }
            match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(SpecialCommand::UseSuggestion(n)),
                _ => Err(unsupported(&word, rest)),
            }
        }

        "/history" => Ok(SpecialCommand::ShowHistory),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        _ => Err(CommandError::UnknownCommand(word)),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

ATTACHMENTS:
  /image <path>   - Stage an image (shorthand: /img)
  /doc <path>     - Stage a document (pdf, doc, docx, txt, rtf, odt)
  /files          - List staged attachments
  /remove <id>    - Remove a staged attachment

MODELS:
  /models         - List models for this module
  /model <id>     - Use a different model for the next message

PROMPTS:
  /suggest        - Show preset prompts for this module
  /suggest <n>    - Copy preset prompt n into the draft

SESSION:
  /history        - Print the conversation
  /status         - Show module, model and last error
  /help           - Show this help message
  /exit           - Exit (also: exit, quit)

NOTES:
  - Regular text (not starting with /) is sent to the backend
  - Staged attachments are sent with the next message
  - A message can be sent with attachments and no text
"#
    );
}
