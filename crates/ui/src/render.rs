//! Transcript to display text.

mod wrap;

pub use wrap::wrap;

use crate::theme::Theme;
use palaver_core::{Role, Transcript, Turn};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

/// Indent applied to turn bodies under their role label
pub const BODY_INDENT: &str = "  ";

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You: ",
        Role::Assistant => "Assistant: ",
        Role::System => "System: ",
    }
}

/// Render every turn as a colored role label followed by its wrapped body.
///
/// Turns are separated by a blank line. Each source line of a turn is wrapped
/// on its own so paragraph breaks survive.
pub fn render_transcript(transcript: &Transcript, width: usize) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for (index, turn) in transcript.iter().enumerate() {
        if index > 0 {
            lines.push(Line::default());
        }
        render_turn(turn, width, &mut lines);
    }

    Text::from(lines)
}

fn render_turn(turn: &Turn, width: usize, lines: &mut Vec<Line<'static>>) {
    let role = turn.role.as_str();
    lines.push(Line::from(Span::styled(role_label(turn.role), Theme::role_style(role))));

    let body_width = width.saturating_sub(BODY_INDENT.len());
    let body_style = Style::default().fg(Theme::FG);

    for source_line in turn.content.lines() {
        if source_line.trim().is_empty() {
            lines.push(Line::default());
            continue;
        }
        for wrapped in wrap(source_line, body_width, BODY_INDENT).lines() {
            lines.push(Line::from(Span::styled(wrapped.to_string(), body_style)));
        }
    }
}
