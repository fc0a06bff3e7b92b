use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid contact type: {0}")]
    InvalidPocKind(String),
    #[error("mailing address is required")]
    MissingAddress,
    #[error("at least one email or phone is required")]
    MissingContactMethod,
}
