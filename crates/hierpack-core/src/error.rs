pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid config section `{section}`: {message}")]
    InvalidConfig { section: String, message: String },

    #[error("column mapping names {count} level columns; at most {max} are supported")]
    TooManyLevelColumns { count: usize, max: usize },

    #[error("expected a JSON array of records, got {found}")]
    NotARecordArray { found: &'static str },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
