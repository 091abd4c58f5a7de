//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for the
//! conversation, help and the screen.

use console::style;

#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat.
    Exit,
    /// Start a new conversation on a fresh session.
    New,
    /// Print the conversation so far.
    History,
    /// Upload a document, then keep chatting.
    Upload(String),
    /// A known command invoked without its required argument.
    MissingArgument { command: &'static str, usage: &'static str },
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" | "/cls" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/new" | "/reset" => Some(ChatCommand::New),
        "/history" => Some(ChatCommand::History),
        "/upload" if arg.is_empty() => Some(ChatCommand::MissingArgument {
            command: "/upload",
            usage: "/upload <file>",
        }),
        "/upload" => Some(ChatCommand::Upload(arg.to_string())),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat"),
        ("/new", "Start a new conversation"),
        ("/history", "Show the conversation so far"),
        ("/upload <file>", "Upload a document for the consultant"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, desc) in rows {
        println!("  {:<16} {}", style(cmd).cyan(), desc);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/QUIT"), Some(ChatCommand::Exit));
        assert_eq!(parse("  /q  "), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_new() {
        assert_eq!(parse("/new"), Some(ChatCommand::New));
        assert_eq!(parse("/reset"), Some(ChatCommand::New));
    }

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            parse("/upload ~/docs/harvard cds.pdf"),
            Some(ChatCommand::Upload("~/docs/harvard cds.pdf".to_string()))
        );
        assert_eq!(
            parse("/upload"),
            Some(ChatCommand::MissingArgument {
                command: "/upload",
                usage: "/upload <file>",
            })
        );
        assert!(matches!(
            parse("/upload   "),
            Some(ChatCommand::MissingArgument { command: "/upload", .. })
        ));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("what is the acceptance rate at MIT?"), None);
        assert_eq!(parse("and/or"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
