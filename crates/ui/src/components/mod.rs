pub mod footer;
pub mod history_browser;
pub mod spinner;
pub mod transcript;

pub use footer::Footer;
pub use history_browser::HistoryBrowserView;
pub use spinner::Spinner;
pub use transcript::TranscriptView;
