use super::SessionController;
use palaver_core::Turn;

impl SessionController {
    /// Append the reply and persist the exchange it completes.
    ///
    /// The prompt is the turn that was last before the reply arrived. A store
    /// failure leaves the transcript intact and only sets a notice.
    pub(super) async fn apply_completion(&mut self, text: String) {
        self.finish_request();

        let prompt = self.state.transcript.last_turn().cloned();
        self.state.transcript.append(Turn::assistant(text.clone()));
        self.state.last_error = None;
        self.state.scroll_to_bottom();

        let Some(prompt) = prompt else {
            return;
        };

        match self.history.insert(prompt.role, &prompt.content, &text).await {
            Ok(id) => {
                tracing::debug!(%id, "exchange saved to history");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save exchange to history");
                self.state.notice = Some(format!("History not saved: {e}"));
            }
        }
    }

    /// Record the failure and go back to idle.
    ///
    /// The prompt stays in the transcript so it can be retried.
    pub(super) fn apply_failure(&mut self, message: String) {
        self.finish_request();
        self.state.last_error = Some(message);
    }
}
