pub type GridreelResult<T> = Result<T, GridreelError>;

#[derive(thiserror::Error, Debug)]
pub enum GridreelError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("format error: {0}")]
    Format(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridreelError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}
