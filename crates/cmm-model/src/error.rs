use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown {kind} value: '{value}'")]
    UnknownValue { kind: &'static str, value: String },
    #[error("invalid datetime '{0}', expected YYYY-MM-DD HH:MM:SS")]
    InvalidDateTime(String),
}

impl ModelError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
