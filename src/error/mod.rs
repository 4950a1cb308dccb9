//! Error types.

use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// The error type used by selectivity estimators and their collaborators.
#[derive(Debug)]
pub enum SelectivityError {
    /// This error indicates that an estimator or one of its collaborators has been called with an invalid argument.
    Argument(ArgumentError),
    /// This error indicates that one of internal invariants has been violated (e.g. statistics are corrupted).
    Internal(InternalError),
    /// This error indicates that the described feature is not supported.
    Unsupported(String),
}

impl SelectivityError {
    /// Creates an [argument error](SelectivityError::Argument).
    /// This method is a shorthand for `SelectivityError::Argument(ArgumentError::new(message))`.
    pub fn argument<T>(message: T) -> SelectivityError
    where
        T: Into<String>,
    {
        SelectivityError::Argument(ArgumentError::new(message))
    }

    /// Creates an [internal error](SelectivityError::Internal).
    /// This method is a shorthand for `SelectivityError::Internal(InternalError::new(message, None))`.
    pub fn internal<T>(message: T) -> SelectivityError
    where
        T: Into<String>,
    {
        SelectivityError::Internal(InternalError::new(message, None))
    }
}

impl Display for SelectivityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectivityError::Argument(err) => write!(f, "Argument error: {}", err),
            SelectivityError::Internal(err) => write!(f, "Internal error: {}", err),
            SelectivityError::Unsupported(msg) => write!(f, "Not supported: {}", msg),
        }
    }
}

impl Error for SelectivityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SelectivityError::Argument(_) => None,
            SelectivityError::Internal(InternalError { cause: Some(error), .. }) => Some(error),
            SelectivityError::Internal(_) => None,
            SelectivityError::Unsupported(_) => None,
        }
    }
}

impl From<ArgumentError> for SelectivityError {
    fn from(err: ArgumentError) -> Self {
        SelectivityError::Argument(err)
    }
}

impl From<InternalError> for SelectivityError {
    fn from(err: InternalError) -> Self {
        SelectivityError::Internal(err)
    }
}

/// Argument error. See [SelectivityError::Argument].
#[derive(Debug)]
pub struct ArgumentError {
    message: String,
    backtrace: Backtrace,
}

impl ArgumentError {
    /// Creates a new instance of an [ArgumentError].
    pub fn new<T>(message: T) -> Self
    where
        T: Into<String>,
    {
        ArgumentError {
            message: message.into(),
            backtrace: Backtrace::new(),
        }
    }

    /// The backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.message)
    }
}

/// Internal error. See [SelectivityError::Internal].
#[derive(Debug)]
pub struct InternalError {
    message: String,
    cause: Option<Box<SelectivityError>>,
    backtrace: Backtrace,
}

impl InternalError {
    /// Creates an instance of an [InternalError] with the given message and an optional cause.
    /// This method captures a backtrace.
    pub fn new<T>(message: T, err: Option<SelectivityError>) -> Self
    where
        T: Into<String>,
    {
        InternalError {
            message: message.into(),
            cause: err.map(Box::new),
            backtrace: Backtrace::new(),
        }
    }

    /// Creates an instance of an [InternalError] with the given message and cause.
    /// This method captures a backtrace.
    pub fn with_cause<T>(message: T, cause: SelectivityError) -> Self
    where
        T: Into<String>,
    {
        InternalError {
            message: message.into(),
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    /// The message of this error without its cause.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(cause) = self.cause.as_ref() {
            write!(f, " caused by: {}", cause)?
        }
        Ok(())
    }
}
