//! Welcome banner display for chat sessions.

use console::style;

use consultant_types::session::SessionInfo;

/// Print the welcome banner: app name, backend and short session id.
pub fn print_welcome_banner(session: &SessionInfo, backend_url: &str) {
    println!();
    println!("  {}", style("College Consultant").cyan().bold());
    println!("  {}", style("Your AI guide to US universities").dim());
    println!();
    println!("  {}  {}", style("Agent:").bold(), style(&session.app_name).dim());
    println!("  {}  {}", style("Backend:").bold(), style(backend_url).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(format!("{}...", session.short_id())).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

/// One-line notice after `/new`.
pub fn print_new_session(session: &SessionInfo) {
    println!(
        "\n  {} New conversation {}\n",
        style("*").cyan().bold(),
        style(format!("(session {}...)", session.short_id())).dim()
    );
}
