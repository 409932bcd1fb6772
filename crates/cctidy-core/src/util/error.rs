use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The cancellation token was triggered before or during an I/O
    /// operation.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{context}: {source}")]
    JsonWithContext {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {source}")]
    Toml {
        context: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{}", .0)]
    Custom(String),
}

impl Error {
    fn io_context(e: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            context: context.into(),
            source: e,
        }
    }

    fn json_context(e: serde_json::Error, context: impl Into<String>) -> Self {
        Self::JsonWithContext {
            context: context.into(),
            source: e,
        }
    }

    fn toml_context(e: toml::de::Error, context: impl Into<String>) -> Self {
        Self::Toml {
            context: context.into(),
            source: e,
        }
    }
}

/// Helper trait for creating [Error] with included context around common
/// error types.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T, Error>;

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, Error> {
        self.map_err(|e| Error::io_context(e, context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::io_context(e, f()))
    }
}

impl<T> ErrorContext<T> for Result<T, serde_json::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, Error> {
        self.map_err(|e| Error::json_context(e, context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::json_context(e, f()))
    }
}

impl<T> ErrorContext<T> for Result<T, toml::de::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, Error> {
        self.map_err(|e| Error::toml_context(e, context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::toml_context(e, f()))
    }
}
