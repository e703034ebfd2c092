use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("YouTube API error: {0}")]
    Api(#[from] google_youtube3::Error),

    #[error("Authentication failed: {0}")]
    Auth(#[from] google_youtube3::yup_oauth2::Error),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Playlist '{title}' holds {count} videos, the limit is {cap}")]
    CapacityExceeded { title: String, count: usize, cap: usize },

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Refusing to delete protected playlist '{0}'")]
    ProtectedPlaylist(String),

    #[error("The path to the OAuth2 JSON file is not set. Run `playdedup config --oauth2-json <PATH>`.")]
    MissingOAuthJson,

    #[error("Configuration error: {0}")]
    Config(#[from] confy::ConfyError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the remote service rejected the call because the daily quota is used up.
    pub fn is_quota_exceeded(&self) -> bool {
        self.to_string().contains("quotaExceeded")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
