use crate::render::role_label;
use crate::state::HistoryBrowser;
use crate::theme::Theme;
use palaver_store::HistoryRecord;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const HELP: &str = "[↑/↓] select  [PgUp/PgDn] first/last  [Enter] replay  [Tab] close  [Esc] quit";

/// Selectable list of stored exchanges
pub struct HistoryBrowserView<'a> {
    browser: &'a HistoryBrowser,
}

impl<'a> HistoryBrowserView<'a> {
    pub fn new(browser: &'a HistoryBrowser) -> Self {
        Self { browser }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::muted())
            .title(Span::styled(" History ", Theme::active()))
            .style(Theme::base());

        if self.browser.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled("No saved exchanges", Theme::muted()))).block(block);
            frame.render_widget(empty, rows[0]);
        } else {
            let items: Vec<ListItem<'_>> = self.browser.rows().iter().map(row_item).collect();
            let list = List::new(items).block(block).highlight_style(Theme::active()).highlight_symbol("> ");
            let mut list_state = ListState::default().with_selected(Some(self.browser.selected()));
            frame.render_stateful_widget(list, rows[0], &mut list_state);
        }

        frame.render_widget(Paragraph::new(Line::from(Span::styled(HELP, Theme::muted()))), rows[1]);
    }
}

/// One line per record: timestamp, role label, then the prompt's first line
fn row_item(record: &HistoryRecord) -> ListItem<'_> {
    let prompt = record.prompt.lines().next().unwrap_or_default();
    ListItem::new(Line::from(vec![
        Span::styled(record.created_at.format("%Y-%m-%d %H:%M").to_string(), Theme::muted()),
        Span::raw(" "),
        Span::styled(role_label(record.role), Theme::role_style(record.role.as_str())),
        Span::raw(prompt),
    ]))
}
