//! Error handling for publish-status
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in library code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Types
//!
//! - [`PublishStatusError`] - failures that end a fetch cycle or a command
//! - [`TransportError`] - failures of a single request to an external endpoint
//! - [`ErrorContext`] - wrapper adding details and a suggestion for display
//!
//! Transport errors are almost never fatal. The fetcher and the local path
//! resolver turn them into envelopes and diagnostics, so only two conditions
//! end a fetch cycle: no context document could be obtained
//! ([`PublishStatusError::ContextUnavailable`]) and no current item could be
//! identified in it ([`PublishStatusError::MissingAnchor`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use publish_status::core::{PublishStatusError, user_friendly_error};
//!
//! let error = anyhow::Error::from(PublishStatusError::MissingAnchor);
//! let context = user_friendly_error(error);
//! context.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for publish-status operations.
#[derive(Error, Debug, Clone)]
pub enum PublishStatusError {
    /// The page context document could not be obtained at all.
    #[error("Page context is unavailable: {reason}")]
    ContextUnavailable {
        /// Why the context query failed
        reason: String,
    },

    /// The context document does not identify a current item.
    ///
    /// A report without an anchor item is defined as "nothing found".
    #[error("No current item could be identified in the page context")]
    MissingAnchor,

    /// Configuration file parsing error
    #[error("Invalid configuration file syntax in {file}")]
    ConfigParseError {
        /// Path to the configuration file that failed to parse
        file: String,
        /// Specific reason for the parsing failure
        reason: String,
    },

    /// The live data source client could not be initialised.
    #[error("Live client unavailable after {attempts} attempt(s): {reason}")]
    LiveClientUnavailable {
        /// Number of initialisation attempts made
        attempts: usize,
        /// Last initialisation failure
        reason: String,
    },

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// A failed request against an external endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The HTTP request could not be sent or its body not read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("Endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading a local document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The client for the endpoint is not available.
    #[error("Client unavailable: {reason}")]
    Unavailable {
        /// Why the client is unavailable
        reason: String,
    },
}

/// Error wrapper with user-facing details and a suggestion.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PublishStatusError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PublishStatusError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    ///
    /// Suggestions are displayed in green to draw attention.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error, displayed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Recognizes [`PublishStatusError`], [`TransportError`], [`std::io::Error`]
/// and [`toml::de::Error`]; everything else is shown with its full cause
/// chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ps_error) = error.downcast_ref::<PublishStatusError>() {
        return create_error_context(ps_error.clone());
    }

    if let Some(transport_error) = error.downcast_ref::<TransportError>() {
        let suggestion = match transport_error {
            TransportError::Status { status: 401 | 403, .. } => {
                "Check the authoring token or live API key in your configuration"
            }
            TransportError::Http(_) => "Check the endpoint URLs and your network connection",
            _ => "Run with --verbose to see the request details",
        };
        return ErrorContext::new(PublishStatusError::Other {
            message: transport_error.to_string(),
        })
        .with_suggestion(suggestion);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::NotFound {
            return ErrorContext::new(PublishStatusError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the file exists and the path is correct");
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PublishStatusError::ConfigParseError {
            file: "config.toml".to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in your configuration file")
        .with_details("Run 'pubstatus config init' to write a fresh example configuration");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PublishStatusError::Other {
        message,
    })
}

fn create_error_context(error: PublishStatusError) -> ErrorContext {
    match &error {
        PublishStatusError::ContextUnavailable { .. } => ErrorContext::new(error)
            .with_suggestion(
                "Pass a page context document with --context <FILE>, or '-' to read stdin",
            )
            .with_details(
                "The page context is the JSON document describing the page open in the editor",
            ),

        PublishStatusError::MissingAnchor => ErrorContext::new(error)
            .with_suggestion(
                "Make sure the context contains pageInfo.id (or itemId) for the current page",
            )
            .with_details(
                "Identifiers are read from pageInfo, then siteInfo, then the top level",
            ),

        PublishStatusError::ConfigParseError { file, .. } => {
            let suggestion = format!("Check the TOML syntax in {file}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        PublishStatusError::LiveClientUnavailable { .. } => ErrorContext::new(error)
            .with_suggestion("Check the [live] endpoint in your configuration"),

        _ => ErrorContext::new(error),
    }
}
