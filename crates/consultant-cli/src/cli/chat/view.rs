//! Live rendering of one turn from the driver's event stream.
//!
//! Events drive the output while the view keeps up. If the broadcast
//! receiver lags, the view catches up from a log snapshot instead; a
//! [`ReplyTracker`] remembers how much of each reply is already on screen,
//! so replayed or stale events paint nothing twice.

use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use consultant_core::backend::AgentBackend;
use consultant_core::chat::{ChatDriver, ConversationLog, TurnOutcome};
use consultant_types::chat::ConversationMessage;
use consultant_types::error::ChatError;
use consultant_types::event::ConversationEvent;

use super::renderer::{ChatRenderer, has_markup, rows_for};

const ASSISTANT_LABEL: &str = "Consultant >";

/// One step of terminal output for an assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paint {
    /// A streamed reply started.
    Open,
    /// Raw text appended to the streamed reply.
    Text(String),
    /// The streamed reply is complete.
    Close { content: String },
    /// A reply shown in one piece (fallback, error, or a reply whose
    /// streaming was missed entirely).
    Whole { content: String },
}

/// Tracks which part of the turn's assistant output has been painted.
#[derive(Debug, Default)]
pub struct ReplyTracker {
    /// First log index not yet fully painted.
    next: usize,
    /// Index of the reply still streaming, with the raw text painted so far.
    open: Option<(usize, String)>,
}

impl ReplyTracker {
    /// Track a turn whose entries start at log index `first_index`.
    pub fn starting_at(first_index: usize) -> Self {
        Self {
            next: first_index,
            open: None,
        }
    }

    pub fn apply(&mut self, event: &ConversationEvent) -> Vec<Paint> {
        match event {
            ConversationEvent::MessageAppended { index, message }
            | ConversationEvent::MessageUpdated { index, message, .. }
            | ConversationEvent::MessageFinalized { index, message } => {
                self.observe(*index, message)
            }
            _ => Vec::new(),
        }
    }

    /// Paint whatever `log` holds beyond what is already on screen.
    pub fn catch_up(&mut self, log: &ConversationLog) -> Vec<Paint> {
        let mut paints = Vec::new();
        for (index, message) in log.messages().iter().enumerate().skip(self.next) {
            paints.extend(self.observe(index, message));
        }
        paints
    }

    /// Compare the entry at `index` with what was painted for it.
    fn observe(&mut self, index: usize, message: &ConversationMessage) -> Vec<Paint> {
        let mut paints = Vec::new();
        if index < self.next || !message.is_assistant() {
            return paints;
        }

        match self.open.take() {
            Some((open_index, mut shown)) if open_index == index => {
                let rest = message.content.strip_prefix(shown.as_str());
                if let Some(rest) = rest.filter(|rest| !rest.is_empty()) {
                    paints.push(Paint::Text(rest.to_string()));
                    shown.push_str(rest);
                }
                if message.streaming {
                    self.open = Some((index, shown));
                } else {
                    paints.push(Paint::Close {
                        content: message.content.clone(),
                    });
                    self.next = index + 1;
                }
            }
            previous => {
                // A later entry exists, so the previous reply was finalized.
                if let Some((_, shown)) = previous {
                    paints.push(Paint::Close { content: shown });
                }
                if message.streaming {
                    paints.push(Paint::Open);
                    if !message.content.is_empty() {
                        paints.push(Paint::Text(message.content.clone()));
                    }
                    self.open = Some((index, message.content.clone()));
                    self.next = index;
                } else {
                    paints.push(Paint::Whole {
                        content: message.content.clone(),
                    });
                    self.next = index + 1;
                }
            }
        }
        paints
    }
}

/// Consumer of one turn's state changes.
pub trait TurnSink {
    /// Called before the turn starts with the current log length.
    fn begin(&mut self, first_index: usize);

    fn handle(&mut self, event: &ConversationEvent);

    /// Bring the output up to date with `log` after events were missed.
    fn catch_up(&mut self, log: &ConversationLog);
}

pub struct TurnView<'a> {
    renderer: &'a ChatRenderer,
    spinner: Option<ProgressBar>,
    tracker: ReplyTracker,
    /// Raw text printed for the streaming message, label included.
    printed: String,
    interactive: bool,
}

impl<'a> TurnView<'a> {
    pub fn new(renderer: &'a ChatRenderer) -> Self {
        Self {
            renderer,
            spinner: None,
            tracker: ReplyTracker::default(),
            printed: String::new(),
            interactive: Term::stdout().is_term(),
        }
    }

    fn paint(&mut self, paint: Paint) {
        match paint {
            Paint::Open => {
                self.stop_spinner();
                print!("\n  {} ", style(ASSISTANT_LABEL).cyan().bold());
                self.printed = format!("  {ASSISTANT_LABEL} ");
            }
            Paint::Text(text) => {
                self.stop_spinner();
                self.renderer.print_fragment(&text);
                self.printed.push_str(&text);
            }
            Paint::Close { content } => self.finish_streamed(&content),
            Paint::Whole { content } => {
                self.stop_spinner();
                if self.interactive && has_markup(&content) {
                    println!("\n  {}", style(ASSISTANT_LABEL).cyan().bold());
                    print!("{}", self.renderer.render_final(&content));
                } else {
                    println!("\n  {} {}", style(ASSISTANT_LABEL).cyan().bold(), content);
                }
            }
        }
    }

    fn finish_streamed(&mut self, content: &str) {
        let printed = std::mem::take(&mut self.printed);
        if !self.interactive || !has_markup(content) {
            println!();
            return;
        }

        let (_, cols) = Term::stdout().size();
        let rows = rows_for(&printed, cols);
        match self.renderer.erase_rows(rows) {
            Ok(()) => {
                println!("  {}", style(ASSISTANT_LABEL).cyan().bold());
                print!("{}", self.renderer.render_final(content));
            }
            Err(e) => {
                tracing::debug!(error = %e, "could not re-render reply");
                println!();
            }
        }
    }

    fn start_spinner(&mut self) {
        if !self.interactive || self.spinner.is_some() {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl TurnSink for TurnView<'_> {
    fn begin(&mut self, first_index: usize) {
        self.tracker = ReplyTracker::starting_at(first_index);
        self.printed.clear();
    }

    fn handle(&mut self, event: &ConversationEvent) {
        match event {
            ConversationEvent::BusyChanged { busy: true } => self.start_spinner(),
            ConversationEvent::BusyChanged { busy: false } => self.stop_spinner(),
            ConversationEvent::Banner { text: Some(text) } => {
                self.stop_spinner();
                eprintln!("\n  {} {}", style("!").red().bold(), style(text).red());
            }
            _ => {
                for paint in self.tracker.apply(event) {
                    self.paint(paint);
                }
            }
        }
    }

    fn catch_up(&mut self, log: &ConversationLog) {
        for paint in self.tracker.catch_up(log) {
            self.paint(paint);
        }
    }
}

impl Drop for TurnView<'_> {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

/// Run one turn while rendering its events as they are published.
pub async fn send_with_view<B: AgentBackend, V: TurnSink>(
    driver: &ChatDriver<B>,
    view: &mut V,
    text: &str,
) -> Result<TurnOutcome, ChatError> {
    let mut events = driver.subscribe();
    view.begin(driver.message_count());
    let turn = driver.send(text);
    tokio::pin!(turn);

    let outcome = loop {
        tokio::select! {
            outcome = &mut turn => break outcome,
            event = events.recv() => match event {
                Ok(event) => view.handle(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "renderer fell behind the event stream");
                    view.catch_up(&driver.snapshot());
                }
                Err(RecvError::Closed) => break (&mut turn).await,
            },
        }
    };

    // Events published during the final poll of the turn.
    loop {
        match events.try_recv() {
            Ok(event) => view.handle(&event),
            Err(TryRecvError::Lagged(_)) => view.catch_up(&driver.snapshot()),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    view.catch_up(&driver.snapshot());

    outcome
}
