use crate::render::render_transcript;
use crate::theme::Theme;
use palaver_core::Transcript;
use ratatui::{
    Frame,
    layout::Rect,
    text::Text,
    widgets::{Block, Paragraph},
};

/// Scrollable conversation pane
///
/// `scroll_offset` counts lines up from the bottom, so zero always shows the
/// newest turn.
pub struct TranscriptView<'a> {
    transcript: &'a Transcript,
    scroll_offset: usize,
}

impl<'a> TranscriptView<'a> {
    pub fn new(transcript: &'a Transcript, scroll_offset: usize) -> Self {
        Self { transcript, scroll_offset }
    }

    /// First visible line for a pane of `height` rows
    pub fn first_visible_line(total: usize, height: usize, scroll_offset: usize) -> usize {
        total.saturating_sub(height).saturating_sub(scroll_offset)
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let text: Text<'static> = render_transcript(self.transcript, area.width as usize);
        let top = Self::first_visible_line(text.lines.len(), area.height as usize, self.scroll_offset);
        let top = u16::try_from(top).unwrap_or(u16::MAX);

        let paragraph = Paragraph::new(text)
            .block(Block::default().style(Theme::base()))
            .scroll((top, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_visible_line_pins_to_bottom() {
        assert_eq!(TranscriptView::first_visible_line(30, 10, 0), 20);
        assert_eq!(TranscriptView::first_visible_line(30, 10, 5), 15);
        assert_eq!(TranscriptView::first_visible_line(30, 10, 50), 0);
    }

    #[test]
    fn test_short_transcript_starts_at_top() {
        assert_eq!(TranscriptView::first_visible_line(3, 10, 0), 0);
    }
}
