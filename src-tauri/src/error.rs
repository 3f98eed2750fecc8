use thiserror::Error;

#[derive(Debug, Error)]
pub enum LessonKitError {
    #[error("Backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected response from backend: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Preference store error: {0}")]
    Store(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Precondition(String),

    #[error("This generator view is no longer open")]
    StaleView,

    #[error("Internal state error: {0}")]
    State(String),
}

impl LessonKitError {
    pub fn precondition(message: impl Into<String>) -> Self {
        LessonKitError::Precondition(message.into())
    }

    /// HTTP status code when the backend answered with a non-success status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LessonKitError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<LessonKitError> for String {
    fn from(err: LessonKitError) -> Self {
        err.to_string()
    }
}

pub type Result<T> = std::result::Result<T, LessonKitError>;
