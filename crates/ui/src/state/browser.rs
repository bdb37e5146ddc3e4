use palaver_store::HistoryRecord;

/// Read-only list of stored exchanges with one clamped selection cursor
#[derive(Debug, Clone, Default)]
pub struct HistoryBrowser {
    rows: Vec<HistoryRecord>,
    selected: usize,
}

impl HistoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows and move the cursor back to the top
    pub fn set_rows(&mut self, rows: Vec<HistoryRecord>) {
        self.rows = rows;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.set_rows(Vec::new());
    }

    pub fn rows(&self) -> &[HistoryRecord] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Record under the cursor, `None` when there are no rows
    pub fn selected_row(&self) -> Option<&HistoryRecord> {
        self.rows.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use palaver_core::Role;
    use palaver_store::RecordId;

    fn record(id: i64, prompt: &str) -> HistoryRecord {
        HistoryRecord {
            id: RecordId(id),
            role: Role::User,
            prompt: prompt.to_string(),
            response: String::new(),
            created_at: Utc::now(),
        }
    }

    fn browser_with(n: i64) -> HistoryBrowser {
        let mut browser = HistoryBrowser::new();
        browser.set_rows((1..=n).map(|i| record(i, &format!("p{i}"))).collect());
        browser
    }

    #[test]
    fn test_empty_browser_has_no_selection() {
        let mut browser = HistoryBrowser::new();
        assert!(browser.selected_row().is_none());
        browser.select_next();
        browser.select_last();
        browser.select_previous();
        assert_eq!(browser.selected(), 0);
        assert!(browser.selected_row().is_none());
    }

    #[test]
    fn test_navigation_clamps_at_both_ends() {
        let mut browser = browser_with(3);

        browser.select_previous();
        assert_eq!(browser.selected(), 0);

        browser.select_next();
        browser.select_next();
        browser.select_next();
        assert_eq!(browser.selected(), 2);
        assert_eq!(browser.selected_row().map(|r| r.prompt.as_str()), Some("p3"));

        browser.select_first();
        assert_eq!(browser.selected(), 0);
        browser.select_last();
        assert_eq!(browser.selected(), 2);
    }

    #[test]
    fn test_set_rows_resets_selection() {
        let mut browser = browser_with(5);
        browser.select_last();
        browser.set_rows(vec![record(9, "only")]);
        assert_eq!(browser.selected(), 0);
        assert_eq!(browser.len(), 1);
    }
}
