mod browser;
mod input;

pub use browser::HistoryBrowser;
pub use input::InputState;

use crate::components::footer::FOOTER_HEIGHT;
use crate::render::render_transcript;
use palaver_core::Transcript;

/// Lines moved by one page of transcript scrolling
pub const PAGE_LINES: usize = 10;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    #[default]
    Idle,
    /// One completion request is in flight
    AwaitingCompletion,
    /// The history browser is open
    BrowsingHistory,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Idle => "idle",
            SessionMode::AwaitingCompletion => "awaiting-completion",
            SessionMode::BrowsingHistory => "browsing-history",
        }
    }
}

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Rows left for the transcript once the footer is drawn
    pub fn transcript_rows(&self) -> usize {
        usize::from(self.height.saturating_sub(FOOTER_HEIGHT).max(1))
    }
}

/// Everything the view needs. Mutated only by the session controller.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub transcript: Transcript,
    pub input: InputState,
    pub mode: SessionMode,
    pub browser: HistoryBrowser,
    /// Last completion failure, cleared by the next success or wipe
    pub last_error: Option<String>,
    /// Last persistence problem
    pub notice: Option<String>,
    /// Lines scrolled up from the bottom of the transcript
    pub scroll_offset: usize,
    /// Last known terminal size; scrolling is unbounded until one is known
    pub viewport: Option<Viewport>,
}

impl SessionState {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript, ..Self::default() }
    }

    pub fn is_loading(&self) -> bool {
        self.mode == SessionMode::AwaitingCompletion
    }

    pub fn is_browser_visible(&self) -> bool {
        self.mode == SessionMode::BrowsingHistory
    }

    pub fn is_idle(&self) -> bool {
        self.mode == SessionMode::Idle
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_scroll();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Record a new terminal size and pull the scroll offset back into range
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
        self.clamp_scroll();
    }

    /// Largest useful offset: the one that shows the first transcript line
    pub fn max_scroll(&self) -> Option<usize> {
        let viewport = self.viewport?;
        let lines = render_transcript(&self.transcript, usize::from(viewport.width)).lines.len();
        Some(lines.saturating_sub(viewport.transcript_rows()))
    }

    fn clamp_scroll(&mut self) {
        if let Some(max) = self.max_scroll() {
            self.scroll_offset = self.scroll_offset.min(max);
        }
    }

    /// Whether a failed completion can be re-sent as-is
    pub fn can_retry(&self) -> bool {
        self.is_idle() && self.last_error.is_some() && self.transcript.awaits_reply()
    }
}
