/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: interactive chat session against one task module
- `send`: one-shot submission
- `models`: model listing

The handlers are thin: all session behaviour lives in
[`crate::session::SessionOrchestrator`].
*/

use crate::attachments::{AttachmentKind, StageReport};
use crate::backend::{create_backend, TaskKind};
use crate::config::Config;
use crate::error::{Result, StudioError};
use crate::files::{describe_path, format_size};
use crate::session::{Author, DeliveryState, Message, SessionOrchestrator};
use colored::Colorize;
use std::path::Path;

// Special commands parser for the chat loop
pub mod special_commands;

// Model listing commands
pub mod models;

/// Resolve the module to use: the explicit choice, else the configured one
///
/// # Errors
///
/// Returns `StudioError::UnknownModule` for an unrecognized name
pub fn resolve_module(config: &Config, module: Option<&str>) -> Result<TaskKind> {
    match module {
        Some(name) => Ok(name.parse::<TaskKind>()?),
        None => config.session.module(),
    }
}

/// Build a session for `task`, applying an optional model override
///
/// # Errors
///
/// Returns `StudioError::InvalidModel` if the default or the override is
/// not valid for the module.
pub fn build_session(
    config: &Config,
    task: TaskKind,
    model: Option<&str>,
) -> Result<SessionOrchestrator> {
    let mut session = SessionOrchestrator::from_config(task, config)?;
    if let Some(model) = model {
        session.select_model(model)?;
    }
    Ok(session)
}

/// Load `path` from disk and stage it through `kind`
///
/// # Errors
///
/// Returns `StudioError::FileLoad` if the file cannot be read
pub async fn stage_path(
    session: &mut SessionOrchestrator,
    path: &Path,
    kind: AttachmentKind,
) -> Result<StageReport> {
    let descriptor = describe_path(path, session.attachments().max_size_bytes()).await?;
    Ok(session.stage_files(vec![descriptor], kind))
}

/// Print staged and rejected files from a stage report
pub fn print_stage_report(session: &SessionOrchestrator, report: &StageReport) {
    for id in &report.staged {
        if let Some(attachment) = session.attachments().pending().iter().find(|a| a.id() == *id)
        {
            println!(
                "{}",
                format!(
                    "Staged #{} {} ({}, {})",
                    id,
                    attachment.name(),
                    attachment.mime_type(),
                    format_size(attachment.size_bytes())
                )
                .green()
            );
        }
    }
    for rejection in &report.rejected {
        eprintln!("{}", format!("Rejected {}", rejection).red());
    }
}

/// Print one message
pub fn print_message(message: &Message) {
    let label = match (message.author, message.delivery_state) {
        (Author::User, _) => "You".cyan().bold(),
        (Author::Assistant, DeliveryState::Failed) => "Assistant".red().bold(),
        (Author::Assistant, _) => "Assistant".green().bold(),
    };
    let time = message.created_at.format("%H:%M:%S").to_string().dimmed();

    match message.delivery_state {
        DeliveryState::Pending => println!("{} {} {}", time, label, "...".dimmed()),
        DeliveryState::Failed => println!("{} {} {}", time, label, message.content.red()),
        DeliveryState::Delivered => println!("{} {} {}", time, label, message.content),
    }

    for attachment in &message.attachments {
        println!(
            "         {} {} ({})",
            format!("[{}]", attachment.kind).dimmed(),
            attachment.name,
            format_size(attachment.size_bytes)
        );
    }

    if let Some(media) = &message.media {
        if media.present {
            println!("         {} {}", "[image]".magenta(), media.url);
        } else {
            println!("         {} {}", "[media]".dimmed(), media.url);
        }
    }
}

/// Print every message of the session
pub fn print_history(session: &SessionOrchestrator) {
    if session.history().is_empty() {
        println!("{}", "No messages yet".dimmed());
        return;
    }
    for message in session.history() {
        print_message(message);
    }
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Builds a session and a backend, then runs a readline loop. Plain
    //! input is sent; `/` commands edit the composing state.

    use super::*;
    use crate::backend::Backend;
    use crate::commands::models::print_models_table;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::session::SubmitOutcome;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `module` - Optional override for the configured module
    /// * `model` - Optional model to select before the first message
    ///
    /// # Errors
    ///
    /// Returns error if the module or model is invalid, or if the backend
    /// or the line editor cannot be created
    pub async fn run_chat(
        config: Config,
        module: Option<String>,
        model: Option<String>,
    ) -> Result<()> {
        let task = resolve_module(&config, module.as_deref())?;
        let mut session = build_session(&config, task, model.as_deref())?;
        let backend = create_backend(&config.backend)?;
        tracing::info!(%task, backend = %backend.name(), "Starting interactive chat mode");

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&session);
        print_history(&session);

        loop {
            let prompt = format!("[{}|{}] >> ", task, session.selected_model().id);
            let initial = session.draft().to_string();
            let line = if initial.is_empty() {
                rl.readline(&prompt)
            } else {
                rl.readline_with_initial(&prompt, (initial.as_str(), ""))
            };

            match line {
                Ok(line) => {
                    let trimmed = line.trim();

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => {}
                        Ok(SpecialCommand::Exit) => break,
                        Ok(command) => {
                            handle_command(&mut session, command).await;
                            continue;
                        }
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    session.set_draft(trimmed);
                    if trimmed.is_empty() && session.attachments().is_empty() {
                        continue;
                    }
                    if !trimmed.is_empty() {
                        rl.add_history_entry(trimmed)?;
                    }

                    send_draft(&mut session, backend.as_ref()).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        session.teardown();
        println!("Goodbye!");
        Ok(())
    }

    async fn send_draft(session: &mut SessionOrchestrator, backend: &dyn Backend) {
        let Some(ticket) = session.begin_submission() else {
            return;
        };

        if let Some(user) = session.history().iter().rev().nth(1) {
            print_message(user);
        }
        println!("{}", "Thinking...".dimmed());

        let done = ticket.dispatch(backend).await;
        let message_id = done.message_id();
        let outcome = session.complete(done);

        if let Some(reply) = session.conversation().get(message_id) {
            print_message(reply);
        }
        if let SubmitOutcome::Failed { error, .. } = outcome {
            eprintln!("{}", format!("Error: {}", error).red());
        }
        println!();
    }

    async fn handle_command(session: &mut SessionOrchestrator, command: SpecialCommand) {
        match command {
            SpecialCommand::Attach { kind, path } => {
                match stage_path(session, &path, kind).await {
                    Ok(report) => print_stage_report(session, &report),
                    Err(e) => eprintln!("{}", e.to_string().red()),
                }
            }
            SpecialCommand::ListAttachments => print_attachments(session),
            SpecialCommand::RemoveAttachment(id) => {
                if session.remove_attachment(id) {
                    println!("Removed attachment #{}", id);
                } else {
                    println!("{}", format!("No staged attachment #{}", id).yellow());
                }
            }
            SpecialCommand::SwitchModel(id) => match session.select_model(&id) {
                Ok(selected) => println!("Using model {}", selected.green()),
                Err(e) => {
                    eprintln!("{}", e.to_string().red());
                    print_models_table(session.available_models(), session.selected_model().id);
                }
            },
            SpecialCommand::ListModels => {
                print_models_table(session.available_models(), session.selected_model().id)
            }
            SpecialCommand::ListSuggestions => {
                for (i, suggestion) in session.suggestions().iter().enumerate() {
                    println!("  {}. {}", i + 1, suggestion);
                }
            }
            SpecialCommand::UseSuggestion(n) => match session.apply_suggestion(n - 1) {
                Some(_) => println!("{}", "Suggestion copied to the prompt".dimmed()),
                None => eprintln!("{}", format!("No suggestion {}", n).red()),
            },
            SpecialCommand::ShowHistory => print_history(session),
            SpecialCommand::ShowStatus => print_status_display(session),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
    }

    fn print_attachments(session: &SessionOrchestrator) {
        let pending = session.attachments().pending();
        if pending.is_empty() {
            println!("{}", "No staged attachments".dimmed());
            return;
        }
        for attachment in pending {
            let preview = if attachment.has_preview() { " [preview]" } else { "" };
            println!(
                "  #{} {} {} ({}){}",
                attachment.id(),
                format!("[{}]", attachment.kind()).dimmed(),
                attachment.name(),
                format_size(attachment.size_bytes()),
                preview
            );
        }
    }

    fn print_welcome_banner(session: &SessionOrchestrator) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║           studiochat Interactive Chat - Welcome!             ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Module: {} ({})",
            session.task().to_string().cyan(),
            session.task().description()
        );
        println!("Model:  {}\n", session.selected_model().name.green());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status_display(session: &SessionOrchestrator) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                   studiochat Session Status                  ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Module:            {} ({})",
            session.task().to_string().cyan(),
            session.task().description()
        );
        let model = session.selected_model();
        println!("Model:             {} ({})", model.name.green(), model.id);
        println!("State:             {}", session.state());
        println!("Conversation Size: {} messages", session.history().len());
        println!("Staged Files:      {}", session.attachments().len());
        match session.last_error() {
            Some(error) => println!("Last Error:        {}", error.red()),
            None => println!("Last Error:        none"),
        }
        println!();
    }
}

// One-shot send command handler
pub mod send {
    //! One-shot submission handler.

    use super::*;
    use crate::backend::RequestError;
    use crate::session::SubmitOutcome;
    use std::path::PathBuf;

    /// Options for a one-shot submission
    #[derive(Debug, Clone, Default)]
    pub struct SendOptions {
        /// Module override
        pub module: Option<String>,
        /// Model override
        pub model: Option<String>,
        /// Images to attach
        pub images: Vec<PathBuf>,
        /// Documents to attach
        pub documents: Vec<PathBuf>,
        /// Print the conversation as JSON
        pub json: bool,
    }

    /// Stage the given files, send `text` once and print the conversation
    ///
    /// # Errors
    ///
    /// Returns `StudioError::Validation` if a file is rejected or there is
    /// nothing to send, and `StudioError::Request` if the backend request
    /// fails (after the conversation has been printed).
    pub async fn run_send(config: Config, text: String, options: SendOptions) -> Result<()> {
        let task = resolve_module(&config, options.module.as_deref())?;
        let mut session = build_session(&config, task, options.model.as_deref())?;
        let backend = create_backend(&config.backend)?;

        let files = options
            .images
            .iter()
            .map(|p| (p, AttachmentKind::Image))
            .chain(options.documents.iter().map(|p| (p, AttachmentKind::Document)));
        for (path, kind) in files {
            let report = stage_path(&mut session, path, kind).await?;
            if let Some(rejection) = report.rejected.first() {
                return Err(StudioError::Validation(rejection.to_string()).into());
            }
        }

        session.set_draft(text);
        let outcome = session.submit(backend.as_ref()).await;

        if matches!(outcome, SubmitOutcome::NothingToSend) {
            return Err(StudioError::Validation(
                "Nothing to send: provide text or at least one attachment".to_string(),
            )
            .into());
        }

        if options.json {
            let output = serde_json::to_string_pretty(session.history())
                .map_err(StudioError::Serialization)?;
            println!("{}", output);
        } else {
            print_history(&session);
        }

        match outcome {
            SubmitOutcome::Failed { error, .. } => {
                Err(StudioError::Request(RequestError::Other(error)).into())
            }
            _ => Ok(()),
        }
    }
}
