//! Main chat loop orchestration.
//!
//! Session creation, welcome banner, then one turn per input line. The loop
//! awaits each turn before reading the next line, so input is never
//! accepted while a reply is streaming.

use std::path::Path;

use console::style;
use tracing::info;

use consultant_types::chat::MessageRole;
use consultant_types::error::ChatError;

use crate::state::{AppState, ConcreteChatDriver};

use super::banner::{print_new_session, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;
use super::view::{TurnView, send_with_view};

/// Longest history preview line, in characters.
const HISTORY_PREVIEW_CHARS: usize = 100;

pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let driver = state.chat_driver();
    let renderer = ChatRenderer::new();

    let session = match driver.start_session().await {
        Ok(session) => session,
        Err(e) => {
            let banner = driver.banner().unwrap_or_else(|| e.to_string());
            eprintln!("\n  {} {}", style("!").red().bold(), style(&banner).red());
            eprintln!("  {}", style(format!("Backend: {}", state.config.backend_url)).dim());
            return Err(e.into());
        }
    };
    print_welcome_banner(&session, &state.config.backend_url);

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::New => match driver.new_conversation().await {
                    Ok(session) => print_new_session(&session),
                    Err(e) => print_banner_or(&driver, &e),
                },
                ChatCommand::History => print_history(&driver),
                ChatCommand::Upload(path) => upload_in_chat(state, Path::new(&path)).await,
                ChatCommand::MissingArgument { command, usage } => {
                    println!(
                        "\n  {} {} needs an argument. Usage: {}\n",
                        style("?").yellow().bold(),
                        style(command).dim(),
                        style(usage).cyan()
                    );
                }
                ChatCommand::Unknown(cmd_name) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(cmd_name).dim()
                    );
                }
            }
            continue;
        }

        let mut view = TurnView::new(&renderer);
        match send_with_view(&driver, &mut view, &text).await {
            Ok(outcome) => {
                info!(?outcome, turn = driver.turn_count(), "turn finished");
                println!();
            }
            Err(e) => print_banner_or(&driver, &e),
        }
    }

    Ok(())
}

/// Show the driver's banner if it set one for this error, else the error.
fn print_banner_or(driver: &ConcreteChatDriver, error: &ChatError) {
    let text = match error {
        ChatError::TurnInFlight => error.to_string(),
        _ => driver.banner().unwrap_or_else(|| error.to_string()),
    };
    eprintln!("\n  {} {}\n", style("!").red().bold(), style(text).red());
}

fn print_history(driver: &ConcreteChatDriver) {
    let log = driver.snapshot();
    println!();
    if log.is_empty() {
        println!("  {}", style("No messages yet.").dim());
    }
    for message in log.messages() {
        let label = match message.role {
            MessageRole::User => style("You").green().bold(),
            MessageRole::Assistant => style("Consultant").cyan().bold(),
        };
        println!("  {} {}", label, preview(&message.content, HISTORY_PREVIEW_CHARS));
    }
    println!();
}

async fn upload_in_chat(state: &AppState, path: &Path) {
    match crate::cli::upload::run_upload(state, path).await {
        Ok(result) => crate::cli::upload::print_result(&result),
        Err(e) => eprintln!("\n  {} {e}\n", style("!").red().bold()),
    }
}

/// First line of `text`, cut to `max` characters.
fn preview(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let truncated = first_line.chars().count() > max || text.lines().nth(1).is_some();
    if !truncated {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max.saturating_sub(3)).collect();
    format!("{cut}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_single_line() {
        assert_eq!(preview("Harvard is in Cambridge.", 100), "Harvard is in Cambridge.");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "케임브리지".repeat(30);
        let out = preview(&text, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_preview_multiline_marks_continuation() {
        assert_eq!(preview("Top picks:\n1. MIT", 100), "Top picks:...");
    }

    #[test]
    fn test_preview_empty() {
        assert_eq!(preview("", 100), "");
    }
}
