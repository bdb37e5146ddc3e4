use super::{SessionController, SessionEvent};
use crate::state::SessionMode;
use palaver_core::{Error, ProviderError, Turn};
use palaver_providers::CompletionService;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Result of one background request, tagged with the request it answers
#[derive(Debug)]
pub(crate) struct CompletionOutcome {
    pub(crate) request: u64,
    pub(crate) event: SessionEvent,
}

impl SessionController {
    /// Send the current transcript and enter `AwaitingCompletion`.
    ///
    /// The request runs on its own task and reports back exactly once through
    /// the outcome channel unless it is cancelled first.
    pub(super) fn begin_completion(&mut self) {
        self.request_seq += 1;
        let request = self.request_seq;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.state.mode = SessionMode::AwaitingCompletion;

        let transcript = self.state.transcript.snapshot();
        let service = Arc::clone(&self.completions);
        let timeout = self.completion_timeout;
        let tx = self.outcome_tx.clone();

        tracing::info!(request, turns = transcript.len(), "dispatching completion request");

        tokio::spawn(async move {
            let event = tokio::select! {
                _ = token.cancelled() => return,
                event = request_completion(service, transcript, timeout) => event,
            };
            if !token.is_cancelled() {
                let _ = tx.send(CompletionOutcome { request, event });
            }
        });
    }

    /// Leave `AwaitingCompletion`, cancelling whatever is still running
    pub(super) fn finish_request(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.state.mode = SessionMode::Idle;
    }

    /// Wait for the result of the current request.
    ///
    /// Results from superseded requests are dropped. Pending forever when
    /// nothing is in flight, so it can sit in a `select!` arm.
    pub async fn next_completion_event(&mut self) -> SessionEvent {
        loop {
            if self.in_flight.is_none() {
                std::future::pending::<()>().await;
            }
            match self.outcome_rx.recv().await {
                Some(outcome) if outcome.request == self.request_seq => return outcome.event,
                Some(outcome) => {
                    tracing::debug!(request = outcome.request, "dropping stale completion result");
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}

/// Ask the service for the next turn and express the result as an event
pub(crate) async fn request_completion(
    service: Arc<dyn CompletionService>, transcript: Vec<Turn>, timeout: Option<Duration>,
) -> SessionEvent {
    let result = match timeout {
        Some(limit) => match tokio::time::timeout(limit, service.complete(&transcript)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Provider(ProviderError::Timeout(limit))),
        },
        None => service.complete(&transcript).await,
    };

    match result {
        Ok(turn) => {
            tracing::info!(chars = turn.content.len(), "completion arrived");
            SessionEvent::CompletionArrived(turn.content)
        }
        Err(e) => {
            tracing::warn!(error = %e, "completion failed");
            SessionEvent::CompletionFailed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palaver_providers::{MockProvider, MockResponse};

    #[tokio::test]
    async fn test_request_completion_success() {
        let service = Arc::new(MockProvider::with_responses(vec![MockResponse::Text { content: "hi".to_string() }]));
        let event = request_completion(service, vec![Turn::user("hello")], None).await;
        assert_eq!(event, SessionEvent::CompletionArrived("hi".to_string()));
    }

    #[tokio::test]
    async fn test_request_completion_failure() {
        let service = Arc::new(MockProvider::with_responses(vec![MockResponse::Status {
            status: 503,
            body: "busy".to_string(),
        }]));
        let event = request_completion(service, vec![Turn::user("hello")], None).await;
        assert_eq!(
            event,
            SessionEvent::CompletionFailed("provider error: API error: 503 - busy".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_completion_timeout() {
        let service = Arc::new(MockProvider::with_responses(vec![MockResponse::Delay {
            millis: 60_000,
            content: "late".to_string(),
        }]));
        let event = request_completion(service, vec![Turn::user("hello")], Some(Duration::from_secs(5))).await;
        assert_eq!(
            event,
            SessionEvent::CompletionFailed("provider error: no response after 5s".to_string())
        );
    }
}
