//! Document upload command.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use consultant_types::error::UploadError;
use consultant_types::upload::UploadResult;

use crate::state::AppState;

/// Upload `file` with a spinner. Processing happens server-side before the
/// response arrives, so this can take a while.
pub async fn run_upload(state: &AppState, file: &Path) -> Result<UploadResult, UploadError> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("uploading {}...", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = state.upload_client().upload(file).await;
    spinner.finish_and_clear();
    result
}

pub fn print_result(result: &UploadResult) {
    println!();
    println!(
        "  {} {}",
        style("✓").green().bold(),
        result.message.as_deref().unwrap_or("File uploaded.")
    );
    let rows = [
        ("File:", result.filename.as_deref()),
        ("Saved to:", result.saved_path.as_deref()),
        ("Analysis:", result.agent_response_saved.as_deref()),
        ("Session:", result.session_id.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {:<10} {}", style(label).bold(), style(value).dim());
        }
    }
    println!();
}

/// ```bash
/// consult upload ~/Downloads/harvard_cds.pdf
/// ```
pub async fn upload(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let result = run_upload(state, file).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}
