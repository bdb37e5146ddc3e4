use crate::CompletionService;
use palaver_core::{Error, ProviderError, Result, Turn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted replies for deterministic sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MockResponse {
    Text { content: String },
    /// Fails as a transport error
    Error { message: String },
    /// Fails as a non-2xx response
    Status { status: u16, body: String },
    /// Replies after sleeping
    Delay { millis: u64, content: String },
}

/// Mock configuration from TOML file
#[derive(Debug, Deserialize)]
struct MockConfig {
    responses: Vec<MockResponse>,
}

/// Completion service that replays scripted responses in order.
///
/// With an empty script every prompt is echoed back. Each call's transcript
/// is recorded for inspection.
#[derive(Debug, Default)]
pub struct MockProvider {
    responses: Vec<MockResponse>,
    current: AtomicUsize,
    received: Mutex<Vec<Vec<Turn>>>,
}

impl MockProvider {
    /// Load a script from a TOML `responses_file`, or echo when `None`
    pub fn new(responses_file: Option<&Path>) -> Result<Self> {
        match responses_file {
            Some(path) => Ok(Self::with_responses(Self::load_responses(path)?)),
            None => Ok(Self::default()),
        }
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> Self {
        Self { responses, ..Self::default() }
    }

    fn load_responses(path: &Path) -> Result<Vec<MockResponse>> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read mock responses {}: {}", path.display(), e)))?;
        let config: MockConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse mock responses: {}", e)))?;
        tracing::debug!(count = config.responses.len(), "loaded mock responses");
        Ok(config.responses)
    }

    /// Number of completion requests received so far
    pub fn call_count(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    /// Transcripts received, oldest first
    pub fn received(&self) -> Vec<Vec<Turn>> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next_response(&self, transcript: &[Turn]) -> MockResponse {
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        if self.responses.is_empty() {
            let prompt = transcript.last().map(|t| t.content.as_str()).unwrap_or_default();
            return MockResponse::Text { content: format!("mock reply to: {prompt}") };
        }

        match self.responses.get(index) {
            Some(response) => response.clone(),
            None => MockResponse::Text {
                content: format!(
                    "No more mock responses configured (requested: {}, available: {})",
                    index + 1,
                    self.responses.len()
                ),
            },
        }
    }
}

#[async_trait::async_trait]
impl CompletionService for MockProvider {
    async fn complete(&self, transcript: &[Turn]) -> Result<Turn> {
        if let Ok(mut received) = self.received.lock() {
            received.push(transcript.to_vec());
        }

        match self.next_response(transcript) {
            MockResponse::Text { content } => Ok(Turn::assistant(content)),
            MockResponse::Error { message } => Err(ProviderError::transport(message).into()),
            MockResponse::Status { status, body } => Err(ProviderError::status(status, body).into()),
            MockResponse::Delay { millis, content } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(Turn::assistant(content))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mock_response_parsing() {
        let toml = r#"
[[responses]]
type = "text"
content = "Hello, world!"

[[responses]]
type = "error"
message = "connection reset"

[[responses]]
type = "status"
status = 429
body = "slow down"

[[responses]]
type = "delay"
millis = 10
content = "eventually"
"#;

        let config: MockConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.responses.len(), 4);
        assert!(matches!(config.responses[0], MockResponse::Text { .. }));
        assert!(matches!(config.responses[1], MockResponse::Error { .. }));
        assert!(matches!(config.responses[2], MockResponse::Status { status: 429, .. }));
        assert!(matches!(config.responses[3], MockResponse::Delay { millis: 10, .. }));
    }

    #[tokio::test]
    async fn test_echo_without_script() {
        let provider = MockProvider::new(None).unwrap();
        let turn = provider.complete(&[Turn::user("ping")]).await.unwrap();
        assert_eq!(turn, Turn::assistant("mock reply to: ping"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_script_is_replayed_in_order() {
        let provider = MockProvider::with_responses(vec![
            MockResponse::Text { content: "first".to_string() },
            MockResponse::Error { message: "boom".to_string() },
            MockResponse::Status { status: 500, body: "oops".to_string() },
        ]);
        let transcript = [Turn::user("q")];

        assert_eq!(provider.complete(&transcript).await.unwrap(), Turn::assistant("first"));

        let err = provider.complete(&transcript).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::Transport(_))));

        let err = provider.complete(&transcript).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::Status { status: 500, .. })));

        let exhausted = provider.complete(&transcript).await.unwrap();
        assert!(exhausted.content.contains("No more mock responses"));
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn test_records_received_transcripts() {
        let provider = MockProvider::default();
        provider.complete(&[Turn::user("a")]).await.unwrap();
        provider
            .complete(&[Turn::user("a"), Turn::assistant("b"), Turn::user("c")])
            .await
            .unwrap();

        let received = provider.received();
        assert_eq!(received.len(), 2);
        assert_eq!(received[1].len(), 3);
    }

    #[test]
    fn test_load_responses_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("responses.toml");
        std::fs::write(&path, "[[responses]]\ntype = \"text\"\ncontent = \"from file\"\n").unwrap();

        let provider = MockProvider::new(Some(&path)).unwrap();
        assert_eq!(provider.responses, vec![MockResponse::Text { content: "from file".to_string() }]);
    }

    #[test]
    fn test_missing_responses_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = MockProvider::new(Some(&temp.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
