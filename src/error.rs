use thiserror::Error;

/// Errors raised by the internal parsers.
///
/// None of these reach callers of the conversion API: every conversion
/// catches them and falls back to passing the offending text through with a
/// reminder. They surface directly only from [`crate::from_json::from_json`]
/// and [`crate::tellraw::validate_tellraw_command`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    #[error("malformed range '{0}'")]
    InvalidRange(String),

    #[error("{message} at offset {offset}")]
    Nbt { message: String, offset: usize },

    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("{0}")]
    InvalidCommand(String),
}

impl ConvertError {
    pub fn nbt(message: impl Into<String>, offset: usize) -> Self {
        ConvertError::Nbt {
            message: message.into(),
            offset,
        }
    }

    /// A stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::InvalidRange(_) => "range-parse-error",
            ConvertError::Nbt { .. } => "nbt-parse-error",
            ConvertError::Json(_) => "json-parse-error",
            ConvertError::InvalidCommand(_) => "tellraw-invalid-command",
        }
    }
}
