use thiserror::Error;

#[derive(Debug, Error)]
pub enum RwsError {
    #[error("malformed {record} record: {reason}")]
    Malformed { record: &'static str, reason: String },
    #[error("xml error: {0}")]
    Xml(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("invalid service url: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, RwsError>;

impl RwsError {
    pub(crate) fn malformed(record: &'static str, reason: impl Into<String>) -> Self {
        RwsError::Malformed {
            record,
            reason: reason.into(),
        }
    }

    /// True when the service answered 404 for the requested record.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RwsError::Http(err) if err.status() == Some(reqwest::StatusCode::NOT_FOUND))
    }
}
