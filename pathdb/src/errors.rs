use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for pathdb operations.
///
/// Path and query failures inside the in-memory engine are never errors; they
/// are reported by value (`None`, `false`, empty lists). The kinds below cover
/// what is left: configuration, encoding, driver failures and errors raised by
/// transaction handlers.
///
/// # Examples
///
/// ```rust,ignore
/// use pathdb::errors::{StoreError, ErrorKind, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("driver unavailable", ErrorKind::BackendError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The operation is not valid in the current context
    InvalidOperation,
    /// A value has the wrong type for the operation
    InvalidDataType,
    /// Invalid configuration supplied to the builder
    ConfigurationError,
    /// Error encoding or decoding data
    EncodingError,
    /// The requested resource was not found
    NotFound,
    /// Error reported by the remote document driver
    BackendError,
    /// The transaction was aborted by its handler or by the driver
    TransactionAborted,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::TransactionAborted => write!(f, "Transaction aborted"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type of the store.
///
/// `StoreError` carries a message, a kind, an optional cause and the backtrace
/// captured where it was created.
///
/// # Examples
///
/// ```rust,ignore
/// use pathdb::errors::{StoreError, ErrorKind};
///
/// let cause = StoreError::new("connection reset", ErrorKind::BackendError);
/// let err = StoreError::new_with_cause("query failed", ErrorKind::BackendError, cause);
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Arc<Backtrace>,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `StoreError` that keeps `cause` in its error chain.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// `StoreResult<T>` is shorthand for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<std::fmt::Error> for StoreError {
    fn from(err: std::fmt::Error) -> Self {
        StoreError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StoreError {
    fn from(msg: &str) -> Self {
        StoreError::new(msg, ErrorKind::InternalError)
    }
}
