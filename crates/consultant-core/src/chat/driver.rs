//! Turn driver: one user message in, one assembled reply out.
//!
//! [`ChatDriver`] owns the conversation state (session, log, busy flag and
//! error banner) and runs at most one turn at a time against an
//! [`AgentBackend`]. Every mutation is published on the [`EventBus`] while
//! the state lock is held, so subscribers observe the exact order in which
//! the log changed.
//!
//! Starting a new conversation cancels the in-flight turn. The cancelled
//! turn stops reading its response body and never touches the log again.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use consultant_types::chat::ConversationMessage;
use consultant_types::error::ChatError;
use consultant_types::event::ConversationEvent;
use consultant_types::session::SessionInfo;
use consultant_types::wire::RunRequest;

use crate::backend::AgentBackend;
use crate::event::EventBus;
use crate::stream::decoder::frames;
use crate::stream::parser::EventParser;

use super::assembler::{Assembled, MessageAssembler};
use super::log::ConversationLog;
use super::session::SessionContext;

pub const CONNECT_FAILED_BANNER: &str = "Failed to connect to the server. Please refresh the page.";
pub const NO_SESSION_BANNER: &str = "No active session. Please refresh the page.";
pub const SEND_FAILED_BANNER: &str = "Failed to send message. Please try again.";

/// How a call to [`ChatDriver::send`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The reply streamed in and was finalized.
    Completed { fragments: usize },
    /// The stream ended without text; the fallback reply was appended.
    Fallback,
    /// The request or the stream failed; the error reply was appended.
    Failed { error: String },
    /// A new conversation superseded this turn.
    Cancelled,
    /// The input was blank.
    Ignored,
}

#[derive(Debug, Default)]
struct ConversationState {
    session: SessionContext,
    log: ConversationLog,
    busy: bool,
    banner: Option<String>,
    /// Cancellation handle of the in-flight turn.
    turn: Option<CancellationToken>,
}

fn lock_state(state: &Mutex<ConversationState>) -> MutexGuard<'_, ConversationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn set_banner(state: &mut ConversationState, events: &EventBus, text: Option<&str>) {
    let text = text.map(str::to_string);
    if state.banner == text {
        return;
    }
    state.banner = text.clone();
    events.publish(ConversationEvent::Banner { text });
}

/// Clears the busy flag when a turn ends, however it ends.
///
/// A turn superseded by a new conversation leaves the flag alone: the reset
/// already cleared it and a newer turn may own it by now. If the turn's
/// future was dropped mid-stream, the open message is finalized so the log
/// never keeps a streaming entry without a turn behind it.
struct TurnGuard<'a> {
    state: &'a Mutex<ConversationState>,
    events: &'a EventBus,
    token: CancellationToken,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.state);
        if self.token.is_cancelled() {
            return;
        }

        if let Ok(index) = state.log.finalize_open() {
            self.events.publish(ConversationEvent::MessageFinalized {
                index,
                message: state.log.messages()[index].clone(),
            });
        }

        state.turn = None;
        if state.busy {
            state.busy = false;
            self.events
                .publish(ConversationEvent::BusyChanged { busy: false });
        }
    }
}

pub struct ChatDriver<B> {
    backend: B,
    parser: EventParser,
    events: EventBus,
    state: Mutex<ConversationState>,
}

impl<B: AgentBackend> ChatDriver<B> {
    pub fn new(backend: B) -> Self {
        Self::with_event_bus(backend, EventBus::default())
    }

    pub fn with_event_bus(backend: B, events: EventBus) -> Self {
        Self {
            backend,
            parser: EventParser::new(),
            events,
            state: Mutex::new(ConversationState::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    /// Cloned view of the conversation log.
    pub fn snapshot(&self) -> ConversationLog {
        lock_state(&self.state).log.clone()
    }

    /// Number of entries in the log.
    pub fn message_count(&self) -> usize {
        lock_state(&self.state).log.len()
    }

    pub fn is_busy(&self) -> bool {
        lock_state(&self.state).busy
    }

    pub fn session(&self) -> Option<SessionInfo> {
        lock_state(&self.state).session.session().cloned()
    }

    pub fn banner(&self) -> Option<String> {
        lock_state(&self.state).banner.clone()
    }

    pub fn turn_count(&self) -> u32 {
        lock_state(&self.state).session.turn_count()
    }

    /// Obtain the first session. Same as [`Self::new_conversation`].
    pub async fn start_session(&self) -> Result<SessionInfo, ChatError> {
        self.new_conversation().await
    }

    /// Replace the session and clear the log.
    ///
    /// On failure the session slot is emptied and the connect banner is
    /// shown; the log is left as it was.
    pub async fn new_conversation(&self) -> Result<SessionInfo, ChatError> {
        match self.backend.create_session().await {
            Ok(session) => {
                let mut state = lock_state(&self.state);
                if let Some(token) = state.turn.take() {
                    debug!("cancelling in-flight turn for new conversation");
                    token.cancel();
                }

                state.session.replace(session.clone());
                state.log.clear();
                self.events.publish(ConversationEvent::SessionChanged {
                    session: session.clone(),
                });
                self.events.publish(ConversationEvent::ConversationReset);

                if state.busy {
                    state.busy = false;
                    self.events
                        .publish(ConversationEvent::BusyChanged { busy: false });
                }
                set_banner(&mut state, &self.events, None);

                info!(session_id = %session.session_id, "session created");
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "failed to create session");
                let mut state = lock_state(&self.state);
                state.session.clear();
                set_banner(&mut state, &self.events, Some(CONNECT_FAILED_BANNER));
                Err(e.into())
            }
        }
    }

    /// Submit one user message and stream the reply into the log.
    ///
    /// Rejections (`NoSession`, `TurnInFlight`) leave the log untouched.
    /// Backend failures are not errors here: they are recorded in the log
    /// and reported as [`TurnOutcome::Failed`].
    pub async fn send(&self, text: &str) -> Result<TurnOutcome, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let (request, token, turn) = {
            let mut state = lock_state(&self.state);
            let session = match state.session.require() {
                Ok(session) => session.clone(),
                Err(e) => {
                    set_banner(&mut state, &self.events, Some(NO_SESSION_BANNER));
                    return Err(e);
                }
            };
            if state.busy {
                return Err(ChatError::TurnInFlight);
            }

            let message = ConversationMessage::user(text);
            let index = state.log.append(message.clone())?;
            self.events
                .publish(ConversationEvent::MessageAppended { index, message });

            state.busy = true;
            self.events
                .publish(ConversationEvent::BusyChanged { busy: true });
            set_banner(&mut state, &self.events, None);

            let token = CancellationToken::new();
            state.turn = Some(token.clone());
            (
                RunRequest::for_session(&session, text),
                token,
                state.session.turn_count() + 1,
            )
        };

        let _guard = TurnGuard {
            state: &self.state,
            events: &self.events,
            token: token.clone(),
        };

        let span = info_span!(
            "chat.turn",
            session_id = %request.session_id,
            turn,
        );
        Ok(self.drive(request, &token).instrument(span).await)
    }

    async fn drive(&self, request: RunRequest, token: &CancellationToken) -> TurnOutcome {
        let started = Instant::now();
        let mut assembler = MessageAssembler::new();

        let body = tokio::select! {
            biased;
            _ = token.cancelled() => return TurnOutcome::Cancelled,
            body = self.backend.send(request) => body,
        };
        let body = match body {
            Ok(body) => body,
            Err(e) => return self.fail(assembler, token, e.into()),
        };

        let mut lines = std::pin::pin!(frames(body));
        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(fragments = assembler.fragment_count(), "turn cancelled mid-stream");
                    return TurnOutcome::Cancelled;
                }
                next = lines.next() => next,
            };

            let frame = match next {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => return self.fail(assembler, token, e.into()),
                None => break,
            };

            let fragments = self.parser.fragments(&frame);
            if fragments.is_empty() {
                continue;
            }

            let mut state = lock_state(&self.state);
            if token.is_cancelled() {
                return TurnOutcome::Cancelled;
            }
            for fragment in &fragments {
                match assembler.apply(&mut state.log, fragment) {
                    Ok(Some(event)) => self.events.publish(event),
                    Ok(None) => {}
                    Err(e) => {
                        drop(state);
                        return self.fail(assembler, token, e.into());
                    }
                }
            }
        }

        let mut state = lock_state(&self.state);
        if token.is_cancelled() {
            return TurnOutcome::Cancelled;
        }
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match assembler.finish(&mut state.log) {
            Ok((assembled, event)) => {
                self.events.publish(event);
                state.session.increment_turn();
                match assembled {
                    Assembled::Finalized { fragments, .. } => {
                        info!(fragments, elapsed_ms, "turn completed");
                        TurnOutcome::Completed { fragments }
                    }
                    Assembled::Fallback { .. } => {
                        info!(elapsed_ms, "turn produced no text, using fallback reply");
                        TurnOutcome::Fallback
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, elapsed_ms, "failed to finalize reply");
                set_banner(&mut state, &self.events, Some(SEND_FAILED_BANNER));
                TurnOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    fn fail(
        &self,
        assembler: MessageAssembler,
        token: &CancellationToken,
        error: ChatError,
    ) -> TurnOutcome {
        let mut state = lock_state(&self.state);
        if token.is_cancelled() {
            return TurnOutcome::Cancelled;
        }

        warn!(error = %error, fragments = assembler.fragment_count(), "turn failed");
        set_banner(&mut state, &self.events, Some(SEND_FAILED_BANNER));
        match assembler.fail(&mut state.log) {
            Ok(events) => {
                for event in events {
                    self.events.publish(event);
                }
            }
            Err(e) => warn!(error = %e, "could not record error reply"),
        }

        TurnOutcome::Failed {
            error: error.to_string(),
        }
    }
}
