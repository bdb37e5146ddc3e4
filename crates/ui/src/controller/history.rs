use super::{SessionController, Transition};
use crate::state::SessionMode;
use palaver_core::{Role, Turn};

impl SessionController {
    /// Open the browser with fresh rows, or close it.
    ///
    /// A failed read opens an empty browser and sets a notice.
    pub(super) async fn toggle_history(&mut self) {
        if self.state.mode == SessionMode::BrowsingHistory {
            self.state.mode = SessionMode::Idle;
            self.state.browser.clear();
            return;
        }

        match self.history.read_all().await {
            Ok(rows) => {
                tracing::debug!(count = rows.len(), "history loaded into browser");
                self.state.browser.set_rows(rows);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read history");
                self.state.browser.clear();
                self.state.notice = Some(format!("History unavailable: {e}"));
            }
        }
        self.state.mode = SessionMode::BrowsingHistory;
    }

    /// Copy the selected exchange into the transcript and close the browser.
    ///
    /// Nothing is sent to the completion service, and a pending failure can no
    /// longer be retried. With no rows this is a no-op and the browser stays open.
    pub(super) fn replay_selected(&mut self) -> Transition {
        let Some(record) = self.state.browser.selected_row().cloned() else {
            return Transition::Ignored;
        };

        let prompt_role = match record.role {
            Role::Assistant => Role::User,
            role => role,
        };
        self.state.transcript.append(Turn::new(prompt_role, record.prompt));
        if !record.response.is_empty() {
            self.state.transcript.append(Turn::assistant(record.response));
        }

        self.state.mode = SessionMode::Idle;
        self.state.browser.clear();
        self.state.last_error = None;
        self.state.scroll_to_bottom();
        tracing::debug!(id = %record.id, "replayed history record");
        Transition::Applied
    }
}
