use thiserror::Error;

pub type EmissionResult<T> = Result<T, EmissionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmissionError {
    #[error("unsupported unit: `{unit}`")]
    UnsupportedUnit { unit: String },

    #[error("unknown group `{group_key}` in scope `{scope}`")]
    UnknownGroup { scope: String, group_key: String },

    #[error("`{key}` is reserved for configuration and cannot hold groups")]
    ReservedScopeKey { key: String },

    #[error("invalid lookup table: {0}")]
    InvalidTable(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
