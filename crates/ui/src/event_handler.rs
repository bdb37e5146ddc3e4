use crate::controller::SessionEvent;
use crate::state::SessionMode;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Maps terminal input to session events
pub struct EventHandler;

impl EventHandler {
    /// Read a single event from the terminal
    ///
    /// Returns `Some(event)` if an event is available, `None` on timeout or error.
    /// Terminal errors are logged rather than propagated; the loop polls again
    /// on the next iteration.
    pub fn read() -> Option<Event> {
        match crossterm::event::poll(std::time::Duration::from_millis(100)) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::error!(error = %e, "terminal read failed");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                tracing::error!(error = %e, "terminal poll failed");
                None
            }
        }
    }

    /// Translate a terminal event, ignoring everything but key presses and resizes
    pub fn handle_event(event: &Event, mode: SessionMode) -> Option<SessionEvent> {
        match event {
            Event::Key(key_event) => Self::handle_key_event(*key_event, mode),
            Event::Resize(width, height) => Some(SessionEvent::Resize { width: *width, height: *height }),
            _ => None,
        }
    }

    /// Translate a key press for the given mode.
    ///
    /// Keys the current mode has no use for map to `None`. A few keys are still
    /// forwarded while a request is in flight so the controller can refuse them.
    pub fn handle_key_event(event: KeyEvent, mode: SessionMode) -> Option<SessionEvent> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        match (event.code, mode) {
            (KeyCode::Esc, _) => Some(SessionEvent::Cancel),
            (KeyCode::Char('c'), _) if ctrl => Some(SessionEvent::Cancel),

            (KeyCode::Enter, _) => Some(SessionEvent::Submit),
            (KeyCode::Tab, _) => Some(SessionEvent::ToggleHistory),

            (KeyCode::Char('l'), SessionMode::Idle) if ctrl => Some(SessionEvent::WipeTranscript),
            (KeyCode::Char('r'), SessionMode::Idle) if ctrl => Some(SessionEvent::Retry),
            (KeyCode::Char(_), _) if ctrl => None,

            (_, SessionMode::AwaitingCompletion) => None,

            (KeyCode::Char(c), _) => Some(SessionEvent::TextInput(c)),
            (KeyCode::Backspace, _) => Some(SessionEvent::Backspace),

            (KeyCode::Up, SessionMode::Idle) => Some(SessionEvent::ScrollUp),
            (KeyCode::Down, SessionMode::Idle) => Some(SessionEvent::ScrollDown),
            (KeyCode::PageUp, SessionMode::Idle) => Some(SessionEvent::PageUp),
            (KeyCode::PageDown, SessionMode::Idle) => Some(SessionEvent::PageDown),

            (KeyCode::Up, SessionMode::BrowsingHistory) => Some(SessionEvent::SelectPrevious),
            (KeyCode::Down, SessionMode::BrowsingHistory) => Some(SessionEvent::SelectNext),
            (KeyCode::PageUp | KeyCode::Home, SessionMode::BrowsingHistory) => Some(SessionEvent::SelectFirst),
            (KeyCode::PageDown | KeyCode::End, SessionMode::BrowsingHistory) => Some(SessionEvent::SelectLast),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_cancel_in_every_mode() {
        for mode in [SessionMode::Idle, SessionMode::BrowsingHistory, SessionMode::AwaitingCompletion] {
            assert_eq!(EventHandler::handle_key_event(press(KeyCode::Esc), mode), Some(SessionEvent::Cancel));
            assert_eq!(EventHandler::handle_key_event(ctrl('c'), mode), Some(SessionEvent::Cancel));
        }
    }

    #[test]
    fn test_idle_keys() {
        let mode = SessionMode::Idle;
        assert_eq!(
            EventHandler::handle_key_event(press(KeyCode::Char('a')), mode),
            Some(SessionEvent::TextInput('a'))
        );
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Enter), mode), Some(SessionEvent::Submit));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Tab), mode), Some(SessionEvent::ToggleHistory));
        assert_eq!(EventHandler::handle_key_event(ctrl('l'), mode), Some(SessionEvent::WipeTranscript));
        assert_eq!(EventHandler::handle_key_event(ctrl('r'), mode), Some(SessionEvent::Retry));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Up), mode), Some(SessionEvent::ScrollUp));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::PageDown), mode), Some(SessionEvent::PageDown));
    }

    #[test]
    fn test_browsing_keys_move_selection() {
        let mode = SessionMode::BrowsingHistory;
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Up), mode), Some(SessionEvent::SelectPrevious));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Down), mode), Some(SessionEvent::SelectNext));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::PageUp), mode), Some(SessionEvent::SelectFirst));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::PageDown), mode), Some(SessionEvent::SelectLast));
        assert_eq!(EventHandler::handle_key_event(ctrl('l'), mode), None);
        assert_eq!(
            EventHandler::handle_key_event(press(KeyCode::Char('x')), mode),
            Some(SessionEvent::TextInput('x'))
        );
    }

    #[test]
    fn test_awaiting_drops_editing_keys() {
        let mode = SessionMode::AwaitingCompletion;
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Char('a')), mode), None);
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Backspace), mode), None);
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Up), mode), None);
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Enter), mode), Some(SessionEvent::Submit));
        assert_eq!(EventHandler::handle_key_event(press(KeyCode::Tab), mode), Some(SessionEvent::ToggleHistory));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut event = press(KeyCode::Enter);
        event.kind = KeyEventKind::Release;
        assert_eq!(EventHandler::handle_key_event(event, SessionMode::Idle), None);
    }

    #[test]
    fn test_resize_forwarded_in_every_mode() {
        for mode in [SessionMode::Idle, SessionMode::BrowsingHistory, SessionMode::AwaitingCompletion] {
            assert_eq!(
                EventHandler::handle_event(&Event::Resize(120, 40), mode),
                Some(SessionEvent::Resize { width: 120, height: 40 })
            );
        }
    }

    #[test]
    fn test_non_key_events_ignored() {
        assert_eq!(EventHandler::handle_event(&Event::FocusGained, SessionMode::Idle), None);
    }
}
