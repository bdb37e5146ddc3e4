use crate::components::{Footer, HistoryBrowserView, Spinner, TranscriptView, footer::FOOTER_HEIGHT};
use crate::state::SessionState;
use crate::theme::Theme;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    widgets::Block,
};

/// Project the session state onto a frame.
///
/// While loading only the spinner is drawn. The browser replaces the
/// transcript and input while it is open.
pub fn draw_view(frame: &mut Frame<'_>, state: &SessionState, tick: usize) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::base()), area);

    if state.is_loading() {
        Spinner::new(tick).render(frame, area);
        return;
    }

    if state.is_browser_visible() {
        HistoryBrowserView::new(&state.browser).render(frame, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
        .split(area);

    TranscriptView::new(&state.transcript, state.scroll_offset).render(frame, rows[0]);
    Footer::new(state).render(frame, rows[1]);
}
