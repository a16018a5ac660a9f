use thiserror::Error;

/// Errors produced when wire data does not have the shape the model requires.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("application must have at least one name/publisher pair")]
    EmptyApplication,

    #[error("app_name has {names} entries but publisher has {publishers}")]
    LengthMismatch { names: usize, publishers: usize },

    #[error("invalid category name {name:?}: {reason}")]
    InvalidCategoryName { name: String, reason: String },
}
