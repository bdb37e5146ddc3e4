use crate::state::SessionState;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Height the footer needs
pub const FOOTER_HEIGHT: u16 = 3;

/// Status line, input line and key hints
///
/// - Row 1: last completion error, else last persistence notice
/// - Row 2: input buffer with block cursor
/// - Row 3: key hints
pub struct Footer<'a> {
    state: &'a SessionState,
}

impl<'a> Footer<'a> {
    pub fn new(state: &'a SessionState) -> Self {
        Self { state }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        frame.render_widget(Paragraph::new(self.status_line()), rows[0]);
        frame.render_widget(Paragraph::new(self.input_line()).style(Theme::panel()), rows[1]);
        frame.render_widget(Paragraph::new(self.hints()), rows[2]);
    }

    fn status_line(&self) -> Line<'_> {
        if let Some(error) = &self.state.last_error {
            let mut spans = vec![Span::styled(format!("Error: {error}"), Theme::error())];
            if self.state.can_retry() {
                spans.push(Span::styled("  [Ctrl+R] retry", Theme::muted()));
            }
            return Line::from(spans);
        }
        match &self.state.notice {
            Some(notice) => Line::from(Span::styled(notice.as_str(), Theme::warning())),
            None => Line::default(),
        }
    }

    fn input_line(&self) -> Line<'_> {
        let cursor = Span::styled("█", Style::default().fg(Theme::FG));
        if self.state.input.is_empty() {
            return Line::from(vec![
                Span::styled("> ", Theme::muted()),
                cursor,
                Span::styled(" Type a message...", Theme::muted()),
            ]);
        }
        Line::from(vec![Span::styled("> ", Theme::muted()), Span::raw(self.state.input.as_str()), cursor])
    }

    fn hints(&self) -> Line<'static> {
        let pairs = [
            ("[Enter]", " send"),
            ("[Tab]", " history"),
            ("[Ctrl+L]", " clear"),
            ("[↑/↓]", " scroll"),
            ("[Esc]", " quit"),
        ];
        let mut spans = Vec::new();
        for (i, (key, label)) in pairs.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(key, Style::default().fg(Theme::BLUE)));
            spans.push(Span::styled(label, Theme::muted()));
        }
        Line::from(spans)
    }
}
