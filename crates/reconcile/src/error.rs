//! Error types for reconciliation operations.
//!
//! Two kinds of failure exist: validation failures raised before any remote
//! call is made, and remote failures returned by a [`ResourceClient`]. Remote
//! failures are carried through verbatim; the categories below exist for
//! callers that want to decide what to tell the user or whether to retry.
//!
//! [`ResourceClient`]: crate::client::ResourceClient

use std::fmt;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for remote client operations.
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Message used when a create-or-update is missing its required fields.
pub const MISSING_NAME_AND_VALUE: &str = "missing required attributes name and value";

/// Message used when a read or delete is missing the resource name.
pub const MISSING_NAME: &str = "missing required attribute name";

/// Categories of errors for user feedback and caller-side retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Required field missing from the declared configuration.
    Validation,
    /// The remote resource does not exist.
    NotFound,
    /// Credentials rejected by the remote API.
    Auth,
    /// Connectivity or server-side failure (transient, retryable).
    Network,
    /// The remote API answered with something we could not parse.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid declaration",
            Self::NotFound => "Resource not found",
            Self::Auth => "Authentication failed",
            Self::Network => "Network connectivity issue",
            Self::Format => "Invalid API response",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Validation => "Add the missing attributes to the declaration and try again",
            Self::NotFound => "The resource may have been deleted outside of catval",
            Self::Auth => "Check the configured username and password",
            Self::Network => "Check the endpoint and your connection, then try again",
            Self::Format => "Verify the endpoint points at a v3 management API",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Failures reported by a remote resource client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No resource exists for the given name and identifier.
    #[error("category value {id:?} not found under {name:?}")]
    NotFound {
        /// Category name used for the lookup.
        name: String,
        /// Identifier used for the lookup.
        id: String,
    },

    /// Credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Non-success HTTP status other than 401/403/404.
    #[error("HTTP {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Error message.
        message: String,
    },

    /// Connection, TLS or timeout failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// The request could not be sent as given.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl RemoteError {
    /// Create a not-found error.
    pub fn not_found(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            name: name.into(),
            id: id.into(),
        }
    }

    /// Whether the remote reported that the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Unauthorized(_) => ErrorCategory::Auth,
            Self::Status { code, .. } if *code >= 500 => ErrorCategory::Network,
            Self::Status { .. } => ErrorCategory::Other,
            Self::Transport(_) => ErrorCategory::Network,
            Self::InvalidResponse(_) => ErrorCategory::Format,
            Self::InvalidRequest(_) => ErrorCategory::Validation,
            Self::Other(_) => ErrorCategory::Other,
        }
    }
}

/// Errors returned by the [`Reconciler`](crate::Reconciler).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Required attribute missing; raised before any remote call.
    #[error("{0}")]
    Validation(&'static str),

    /// Failure returned by the remote client, unchanged.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

impl Error {
    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Remote(err) => err.category(),
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Whether this is a remote not-found failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote(err) if err.is_not_found())
    }
}
