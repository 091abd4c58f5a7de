//! One-shot question: open a session, run a single turn, print the reply.

use anyhow::Result;

use consultant_core::chat::TurnOutcome;

use crate::state::AppState;

use super::chat::renderer::ChatRenderer;
use super::chat::view::{TurnView, send_with_view};

/// ```bash
/// consult ask "What is the acceptance rate at MIT?"
/// consult ask --json "Compare Harvard and Yale"
/// ```
pub async fn ask(state: &AppState, text: &str, json: bool) -> Result<()> {
    let driver = state.chat_driver();
    let session = driver.start_session().await.map_err(|e| {
        anyhow::anyhow!(driver.banner().unwrap_or_else(|| e.to_string()))
    })?;

    let outcome = if json {
        driver.send(text).await?
    } else {
        let renderer = ChatRenderer::new();
        let mut view = TurnView::new(&renderer);
        let outcome = send_with_view(&driver, &mut view, text).await?;
        println!();
        outcome
    };

    if json {
        let log = driver.snapshot();
        let report = serde_json::json!({
            "session": session,
            "outcome": outcome_label(&outcome),
            "messages": log.messages(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    match outcome {
        TurnOutcome::Failed { error } => anyhow::bail!("Failed to send message: {error}"),
        _ => Ok(()),
    }
}

fn outcome_label(outcome: &TurnOutcome) -> &'static str {
    match outcome {
        TurnOutcome::Completed { .. } => "completed",
        TurnOutcome::Fallback => "fallback",
        TurnOutcome::Failed { .. } => "failed",
        TurnOutcome::Cancelled => "cancelled",
        TurnOutcome::Ignored => "ignored",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&TurnOutcome::Completed { fragments: 3 }), "completed");
        assert_eq!(outcome_label(&TurnOutcome::Fallback), "fallback");
        assert_eq!(
            outcome_label(&TurnOutcome::Failed {
                error: "HTTP 500".to_string()
            }),
            "failed"
        );
    }
}
