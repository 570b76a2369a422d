//! Error types for the application layer.

use thiserror::Error;

/// Errors produced by the framework itself, as opposed to errors a command
/// handler chooses to return.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Input(#[from] rostrum_input::InputError),

    #[error(transparent)]
    Definition(#[from] rostrum_input::DefinitionError),

    #[error(transparent)]
    Markup(#[from] rostrum_markup::MarkupError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Name resolution failed. The message already carries alternatives
    /// ("Did you mean ...") where any were close enough.
    #[error("{0}")]
    CommandNotFound(String),

    #[error("{0}")]
    NamespaceNotFound(String),

    /// Misuse of the framework API, such as an invalid command name.
    #[error("{0}")]
    Logic(String),
}

/// Wraps an error with an explicit process exit code.
///
/// Handlers normally signal failure by returning any error (exit code 1).
/// Returning an `ExitError` instead picks the code:
///
/// ```rust
/// use rostrum::ExitError;
///
/// let err = ExitError::new(3, anyhow::anyhow!("partial failure"));
/// assert_eq!(err.code(), 3);
/// ```
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ExitError {
    code: i32,
    source: anyhow::Error,
}

impl ExitError {
    pub fn new(code: i32, source: anyhow::Error) -> Self {
        Self { code, source }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}
