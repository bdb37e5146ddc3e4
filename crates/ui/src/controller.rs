//! Session state machine.
//!
//! Every mutation of [`SessionState`] goes through [`SessionController::handle_event`],
//! called from one sequential loop. The only concurrent work is the in-flight
//! completion request, whose result comes back through the same loop as a
//! [`SessionEvent`].

mod completion;
mod dispatch;
mod history;

use crate::state::{PAGE_LINES, SessionMode, SessionState, Viewport};
use palaver_core::Transcript;
use palaver_providers::CompletionService;
use palaver_store::HistoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub(crate) use dispatch::CompletionOutcome;

/// Inputs to the session state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    TextInput(char),
    Backspace,
    ToggleHistory,
    WipeTranscript,
    Submit,
    /// Re-send a transcript whose last completion failed
    Retry,
    SelectPrevious,
    SelectNext,
    SelectFirst,
    SelectLast,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// The terminal now has this many columns and rows
    Resize { width: u16, height: u16 },
    CompletionArrived(String),
    CompletionFailed(String),
    /// Leave the session
    Cancel,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::TextInput(_) => "text-input",
            SessionEvent::Backspace => "backspace",
            SessionEvent::ToggleHistory => "toggle-history",
            SessionEvent::WipeTranscript => "wipe-transcript",
            SessionEvent::Submit => "submit",
            SessionEvent::Retry => "retry",
            SessionEvent::SelectPrevious => "select-previous",
            SessionEvent::SelectNext => "select-next",
            SessionEvent::SelectFirst => "select-first",
            SessionEvent::SelectLast => "select-last",
            SessionEvent::ScrollUp => "scroll-up",
            SessionEvent::ScrollDown => "scroll-down",
            SessionEvent::PageUp => "page-up",
            SessionEvent::PageDown => "page-down",
            SessionEvent::Resize { .. } => "resize",
            SessionEvent::CompletionArrived(_) => "completion-arrived",
            SessionEvent::CompletionFailed(_) => "completion-failed",
            SessionEvent::Cancel => "cancel",
        }
    }
}

/// What an event did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Not valid in the current mode; state unchanged
    Ignored,
    /// The session is over
    Exit,
}

/// Owns the session state and its collaborators
pub struct SessionController {
    state: SessionState,
    completions: Arc<dyn CompletionService>,
    history: Arc<dyn HistoryStore>,
    completion_timeout: Option<Duration>,
    outcome_tx: mpsc::UnboundedSender<CompletionOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<CompletionOutcome>,
    /// Cancels the in-flight request
    in_flight: Option<CancellationToken>,
    /// Identifies the current request so late results can be dropped
    request_seq: u64,
    should_exit: bool,
}

impl SessionController {
    pub fn new(completions: Arc<dyn CompletionService>, history: Arc<dyn HistoryStore>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::default(),
            completions,
            history,
            completion_timeout: None,
            outcome_tx,
            outcome_rx,
            in_flight: None,
            request_seq: 0,
            should_exit: false,
        }
    }

    /// Seed the transcript with a system prompt
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        if let Some(prompt) = prompt {
            self.state.transcript = Transcript::with_system_prompt(prompt);
        }
        self
    }

    /// Bound each completion request; `None` waits indefinitely
    pub fn with_completion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Apply one event. This is the only path that mutates the session state.
    pub async fn handle_event(&mut self, event: SessionEvent) -> Transition {
        let mode = self.state.mode;
        let name = event.name();

        let transition = match event {
            SessionEvent::Cancel => {
                self.shutdown();
                Transition::Exit
            }
            SessionEvent::Resize { width, height } => {
                self.state.set_viewport(Viewport::new(width, height));
                Transition::Applied
            }
            SessionEvent::TextInput(c) if mode != SessionMode::AwaitingCompletion => {
                self.state.input.push(c);
                Transition::Applied
            }
            SessionEvent::Backspace if mode != SessionMode::AwaitingCompletion => {
                self.state.input.backspace();
                Transition::Applied
            }
            SessionEvent::ToggleHistory if mode != SessionMode::AwaitingCompletion => {
                self.toggle_history().await;
                Transition::Applied
            }
            SessionEvent::WipeTranscript if mode == SessionMode::Idle => {
                self.state.transcript.clear();
                self.state.last_error = None;
                self.state.scroll_to_bottom();
                Transition::Applied
            }
            SessionEvent::Submit if mode == SessionMode::BrowsingHistory => self.replay_selected(),
            SessionEvent::Submit if mode == SessionMode::Idle => {
                self.submit_prompt();
                Transition::Applied
            }
            SessionEvent::Retry if self.state.can_retry() => {
                self.begin_completion();
                Transition::Applied
            }
            SessionEvent::SelectPrevious if mode == SessionMode::BrowsingHistory => {
                self.state.browser.select_previous();
                Transition::Applied
            }
            SessionEvent::SelectNext if mode == SessionMode::BrowsingHistory => {
                self.state.browser.select_next();
                Transition::Applied
            }
            SessionEvent::SelectFirst if mode == SessionMode::BrowsingHistory => {
                self.state.browser.select_first();
                Transition::Applied
            }
            SessionEvent::SelectLast if mode == SessionMode::BrowsingHistory => {
                self.state.browser.select_last();
                Transition::Applied
            }
            SessionEvent::ScrollUp if mode == SessionMode::Idle => {
                self.state.scroll_up(1);
                Transition::Applied
            }
            SessionEvent::ScrollDown if mode == SessionMode::Idle => {
                self.state.scroll_down(1);
                Transition::Applied
            }
            SessionEvent::PageUp if mode == SessionMode::Idle => {
                self.state.scroll_up(PAGE_LINES);
                Transition::Applied
            }
            SessionEvent::PageDown if mode == SessionMode::Idle => {
                self.state.scroll_down(PAGE_LINES);
                Transition::Applied
            }
            SessionEvent::CompletionArrived(text) if mode == SessionMode::AwaitingCompletion => {
                self.apply_completion(text).await;
                Transition::Applied
            }
            SessionEvent::CompletionFailed(message) if mode == SessionMode::AwaitingCompletion => {
                self.apply_failure(message);
                Transition::Applied
            }
            _ => Transition::Ignored,
        };

        if transition == Transition::Ignored {
            tracing::debug!(event = name, mode = mode.as_str(), "event ignored");
        }
        transition
    }

    fn submit_prompt(&mut self) {
        let prompt = self.state.input.take();
        self.state.transcript.append(palaver_core::Turn::user(prompt));
        self.state.scroll_to_bottom();
        self.begin_completion();
    }

    /// Stop any in-flight request and mark the session finished
    pub fn shutdown(&mut self) {
        if let Some(token) = self.in_flight.take() {
            tracing::debug!("abandoning in-flight completion");
            token.cancel();
        }
        self.should_exit = true;
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
