use chrono::{TimeZone, Utc};
use palaver_core::{Role, Transcript, Turn};
use palaver_store::{HistoryRecord, RecordId};
use palaver_ui::{SessionMode, SessionState, draw_view};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

fn render(state: &SessionState, width: u16, height: u16) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| draw_view(f, state, 0)).unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn conversation() -> SessionState {
    let mut transcript = Transcript::new();
    transcript.append(Turn::user("hello"));
    transcript.append(Turn::assistant("hi there"));
    SessionState::new(transcript)
}

fn record(id: i64, prompt: &str, response: &str) -> HistoryRecord {
    HistoryRecord {
        id: RecordId(id),
        role: Role::User,
        prompt: prompt.to_string(),
        response: response.to_string(),
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
    }
}

#[test]
fn test_idle_shows_transcript_input_and_help() {
    let mut state = conversation();
    state.input.push('h');
    state.input.push('i');

    let content = render(&state, 60, 12);
    assert!(content.contains("You:"));
    assert!(content.contains("hello"));
    assert!(content.contains("Assistant:"));
    assert!(content.contains("hi there"));
    assert!(content.contains("> hi"));
    assert!(content.contains("[Enter] send"));
}

#[test]
fn test_loading_shows_only_spinner() {
    let mut state = conversation();
    state.mode = SessionMode::AwaitingCompletion;

    let content = render(&state, 60, 12);
    assert!(content.contains("⠋"));
    assert!(content.contains("Waiting for reply"));
    assert!(!content.contains("hello"));
    assert!(!content.contains("[Enter]"));
}

#[test]
fn test_browser_replaces_transcript() {
    let mut state = conversation();
    state.browser.set_rows(vec![record(2, "second question", ""), record(1, "first question", "yes")]);
    state.browser.select_next();
    state.mode = SessionMode::BrowsingHistory;

    let content = render(&state, 80, 10);
    assert!(content.contains("History"));
    assert!(content.contains("2024-03-01 12:30"));
    assert!(content.contains("second question"));
    assert!(content.contains("> 2024-03-01 12:30 You: first question"));
    assert!(content.contains("[Enter] replay"));
    assert!(!content.contains("hi there"));
}

#[test]
fn test_empty_browser_message() {
    let mut state = SessionState::default();
    state.mode = SessionMode::BrowsingHistory;

    let content = render(&state, 60, 8);
    assert!(content.contains("No saved exchanges"));
}

#[test]
fn test_error_and_retry_hint_shown() {
    let mut state = SessionState::default();
    state.transcript.append(Turn::user("hello"));
    state.last_error = Some("provider error: request failed: refused".to_string());

    let content = render(&state, 80, 8);
    assert!(content.contains("Error: provider error: request failed: refused"));
    assert!(content.contains("[Ctrl+R] retry"));
}

#[test]
fn test_notice_shown_when_no_error() {
    let mut state = conversation();
    state.notice = Some("History not saved: disk full".to_string());

    let content = render(&state, 60, 10);
    assert!(content.contains("History not saved: disk full"));
}

#[test]
fn test_long_transcript_pins_newest_turn() {
    let mut transcript = Transcript::new();
    for i in 0..20 {
        transcript.append(Turn::user(format!("question {i}")));
    }
    let mut state = SessionState::new(transcript);

    let content = render(&state, 40, 10);
    assert!(content.contains("question 19"));
    assert!(!content.contains("question 16"));

    state.scroll_up(100);
    let content = render(&state, 40, 10);
    assert!(content.contains("question 0"));
    assert!(!content.contains("question 19"));
}

#[test]
fn test_long_reply_is_wrapped() {
    let mut transcript = Transcript::new();
    transcript.append(Turn::assistant("alpha beta gamma delta epsilon zeta eta theta"));
    let state = SessionState::new(transcript);

    let content = render(&state, 20, 12);
    assert!(content.contains("  alpha beta gamma"));
    assert!(content.contains("  delta epsilon zeta"));
}

fn buffer_to_string(buffer: &ratatui::buffer::Buffer) -> String {
    let mut s = String::new();
    for y in 0..buffer.area().height {
        for x in 0..buffer.area().width {
            s.push(buffer[(x, y)].symbol().chars().next().unwrap_or(' '));
        }
        s.push('\n');
    }
    s
}
