//! Error types and handling for hebdate-core operations.
//!
//! Errors fall into two groups:
//!
//! - **Upstream errors**: failures talking to the converter API
//!   ([`Error::Network`], [`Error::HttpStatus`], [`Error::InvalidResponse`]).
//!   These never escape [`DateFetcher`](crate::DateFetcher); they are folded
//!   into a failed [`HebrewDateResult`](crate::HebrewDateResult) instead.
//! - **Ambient errors**: configuration, cache storage, and serialization
//!   failures surfaced to whoever wires the library together.
//!
//! ```rust
//! use hebdate_core::Error;
//!
//! let err = Error::HttpStatus(500);
//! assert_eq!(err.to_string(), "API returned status code 500");
//! assert_eq!(err.category(), "http_status");
//! assert!(err.is_recoverable());
//! ```

use thiserror::Error;

/// The main error type for hebdate-core operations.
///
/// The `Display` text of the three upstream variants is exactly the message
/// carried by a failed lookup result, so callers logging either one see the
/// same wording.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure: DNS, connection refused, TLS, or timeout.
    ///
    /// Displays the underlying `reqwest` description verbatim.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The converter answered with a status other than `200 OK`.
    #[error("API returned status code {0}")]
    HttpStatus(u16),

    /// The body was not a JSON object carrying a `hebrew` field.
    #[error("Invalid API response format")]
    InvalidResponse,

    /// Configuration is invalid or inaccessible.
    ///
    /// ## Common Causes
    ///
    /// - Invalid TOML syntax in `config.toml`
    /// - Unparseable timezone or base URL
    /// - Config directory cannot be determined
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cache storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization of a cached record failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Check if the error might clear up on the next attempt.
    ///
    /// Timeouts, connection failures and server-side statuses are treated as
    /// transient. A malformed body or bad configuration is not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus(code) => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    /// Get the error category as a string identifier for logging.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::HttpStatus(_) => "http_status",
            Self::InvalidResponse => "invalid_response",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
