use thiserror::Error;

#[derive(Error, Debug)]
pub enum SesplanError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SesplanError {
    /// Maps an HTTP status code and the server's detail message to an error.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 | 422 => SesplanError::Validation(detail),
            401 => SesplanError::Authentication(detail),
            403 => SesplanError::Authorization(detail),
            404 => SesplanError::NotFound(detail),
            409 => SesplanError::Conflict(detail),
            _ => SesplanError::Api { status, detail },
        }
    }

    /// The HTTP status code this error maps to, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SesplanError::Validation(_) => Some(400),
            SesplanError::Authentication(_) => Some(401),
            SesplanError::Authorization(_) => Some(403),
            SesplanError::NotFound(_) => Some(404),
            SesplanError::Conflict(_) => Some(409),
            SesplanError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for "overlapping interval already exists" responses.
    pub fn is_conflict(&self) -> bool {
        matches!(self, SesplanError::Conflict(_))
    }
}

pub type SesplanResult<T> = Result<T, SesplanError>;
