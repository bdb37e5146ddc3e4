//! Terminal session for palaver: the session controller state machine, the
//! history browser and the ratatui view that projects them.

pub mod app;
pub mod components;
pub mod controller;
pub mod event_handler;
pub mod render;
pub mod state;
pub mod theme;

pub use app::{App, draw_view};
pub use controller::{SessionController, SessionEvent, Transition};
pub use event_handler::EventHandler;
pub use render::{render_transcript, wrap};
pub use state::{HistoryBrowser, InputState, SessionMode, SessionState, Viewport};
pub use theme::Theme;
