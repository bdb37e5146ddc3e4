use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Braille frames, advanced once per tick
pub const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Progress indicator shown while a completion is in flight
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn new(tick: usize) -> Self {
        Self { tick }
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.tick % FRAMES.len()]
    }

    /// Render centered in `area`
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(area);

        let line = Line::from(vec![
            Span::styled(self.frame(), Theme::warning()),
            Span::styled(" Waiting for reply...", Theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), rows[1]);
    }
}
