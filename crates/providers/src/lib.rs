pub mod adapter;
pub mod mock;
pub mod types;

pub use adapter::{CompletionService, OpenAiProvider, ProviderFactory};
pub use mock::{MockProvider, MockResponse};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Usage};

pub use palaver_core::{Error, ProviderError, Result};
