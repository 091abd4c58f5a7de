//! Session CLI commands: create a session, inspect a stored one.

use anyhow::{Context, Result};
use console::style;

use consultant_core::backend::AgentBackend;
use consultant_types::error::BackendError;

use crate::state::AppState;

/// Ask the backend for a fresh session and print its identifiers.
///
/// ```bash
/// consult session new
/// consult session new --json
/// ```
pub async fn new_session(state: &AppState, json: bool) -> Result<()> {
    let session = state
        .backend()
        .create_session()
        .await
        .with_context(|| format!("Failed to create a session at {}", state.config.backend_url))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  {} Session created", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Session:").bold(), session.session_id);
    println!("  {}     {}", style("User:").bold(), session.user_id);
    println!("  {}    {}", style("Agent:").bold(), session.app_name);
    println!();
    Ok(())
}

/// Print what the backend has stored for `id`.
pub async fn show_session(state: &AppState, id: &str, json: bool) -> Result<()> {
    let value = match state.backend().get_session(id).await {
        Ok(value) => value,
        Err(BackendError::NotFound) => anyhow::bail!("Session '{id}' not found"),
        Err(e) => return Err(e).context("Failed to fetch session"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("Session").bold(), style(id).cyan());
    println!();
    match value.as_object() {
        Some(fields) => {
            for (key, field) in fields {
                let rendered = match field {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Array(items) => format!("[{} items]", items.len()),
                    serde_json::Value::Object(map) => format!("{{{} keys}}", map.len()),
                    other => other.to_string(),
                };
                println!("  {:<16} {}", style(key).bold(), rendered);
            }
        }
        None => println!("  {value}"),
    }
    println!();
    Ok(())
}
