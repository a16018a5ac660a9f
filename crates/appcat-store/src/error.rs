use appcat_types::ShapeError;

/// Errors from catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Malformed, empty, or mismatched input.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced category or application pair does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// A category with the same case-insensitive name exists.
    #[error("category already exists: {category}")]
    AlreadyExists { category: String },

    /// The application pair is already present in the category.
    #[error("application {name} ({publisher}) already exists in category {category}")]
    Conflict {
        category: String,
        name: String,
        publisher: String,
    },

    /// A thread panicked while holding the catalog lock.
    #[error("catalog lock poisoned")]
    LockPoisoned,

    /// The snapshot document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while reading or writing a snapshot.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn category_not_found(category: &str) -> Self {
        Self::NotFound {
            what: format!("category {category:?}"),
        }
    }

    pub fn pair_not_found(category: &str, name: &str, publisher: &str) -> Self {
        Self::NotFound {
            what: format!("application {name} ({publisher}) in category {category:?}"),
        }
    }

    /// Coarse classification used by callers that map errors to responses.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::LockPoisoned | Self::Serialization(_) | Self::Io(_) => ErrorKind::Internal,
        }
    }
}

impl From<ShapeError> for CatalogError {
    fn from(err: ShapeError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Classification of a [`CatalogError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    AlreadyExists,
    Conflict,
    Internal,
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
