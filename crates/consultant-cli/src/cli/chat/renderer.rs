//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! Replies are printed raw while fragments stream in. Once the reply is
//! finalized, a reply that contains markdown is re-rendered in place:
//! prose through `termimad`, fenced code through `syntect`.

use std::io::Write;

use crossterm::{cursor, execute, terminal};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

const CODE_THEME: &str = "base16-ocean.dark";

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[0].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.headers[1].set_fg(termimad::crossterm::style::Color::Cyan);
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown reply.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            let is_fence = line.trim_start().starts_with("```");
            if is_fence && !in_code_block {
                in_code_block = true;
                code_lang = line.trim().trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if is_fence {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unclosed fence: highlight what arrived.
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Print one streamed fragment as-is.
    pub fn print_fragment(&self, fragment: &str) {
        print!("{fragment}");
        let _ = std::io::stdout().flush();
    }

    /// Erase the last `rows` terminal rows (the raw streamed reply) so the
    /// rendered version can be printed in its place.
    pub fn erase_rows(&self, rows: u16) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        execute!(stdout, cursor::MoveToColumn(0))?;
        if rows > 1 {
            execute!(stdout, cursor::MoveUp(rows - 1))?;
        }
        execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = String::new();
        output.push_str(&format!("  {}\n", console::style(format!("--- {lang} ---")).dim()));

        let Some(theme) = self.theme_set.themes.get(CODE_THEME) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };
        let mut h = HighlightLines::new(syntax, theme);

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

/// Whether a reply uses markdown worth re-rendering.
pub fn has_markup(text: &str) -> bool {
    if text.contains("```") || text.contains("**") || text.contains('`') {
        return true;
    }
    text.lines().any(|line| {
        let line = line.trim_start();
        line.starts_with('#')
            || line.starts_with("- ")
            || line.starts_with("* ")
            || line.starts_with("| ")
            || line
                .split_once(". ")
                .is_some_and(|(n, _)| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    })
}

/// Terminal rows occupied by `text` printed from column 0 on a terminal
/// `cols` wide.
pub fn rows_for(text: &str, cols: u16) -> u16 {
    let cols = usize::from(cols.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| console::measure_text_width(line).div_ceil(cols).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_markup() {
        assert!(has_markup("**Harvard** is in Cambridge."));
        assert!(has_markup("Top picks:\n1. MIT\n2. Stanford"));
        assert!(has_markup("## Admissions"));
        assert!(has_markup("- SAT 1500+\n- GPA 3.9"));
        assert!(has_markup("```python\nprint(1)\n```"));
        assert!(!has_markup("Harvard is in Cambridge, Massachusetts."));
        assert!(!has_markup("Founded in 1636. Private."));
    }

    #[test]
    fn test_rows_for() {
        assert_eq!(rows_for("", 80), 1);
        assert_eq!(rows_for("short", 80), 1);
        assert_eq!(rows_for("a\nb\nc", 80), 3);
        assert_eq!(rows_for(&"x".repeat(81), 80), 2);
        assert_eq!(rows_for(&"x".repeat(160), 80), 2);
        // Wide characters take two columns each.
        assert_eq!(rows_for(&"한".repeat(41), 80), 2);
        assert_eq!(rows_for("anything", 0), 8);
    }

    #[test]
    fn test_render_final_keeps_prose() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("Harvard is in Cambridge.");
        assert!(console::strip_ansi_codes(&out).contains("Harvard is in Cambridge."));
    }

    #[test]
    fn test_render_final_highlights_code() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("Try:\n```python\nprint('hi')\n```\nDone.");
        let plain = console::strip_ansi_codes(&out).to_string();
        assert!(plain.contains("--- python ---"));
        assert!(plain.contains("print('hi')"));
        assert!(plain.contains("Done."));
    }

    #[test]
    fn test_render_final_unclosed_fence() {
        let renderer = ChatRenderer::new();
        let out = renderer.render_final("```rust\nfn main() {}");
        assert!(console::strip_ansi_codes(&out).contains("fn main() {}"));
    }
}
