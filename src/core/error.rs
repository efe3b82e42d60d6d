//! Error handling for gdscan
//!
//! This module provides the error taxonomy of the scanner and the user-facing error
//! reporting used by the binary. It follows two principles:
//! 1. **Strongly-typed errors** for the resolution engine, so callers can match on
//!    the exact failure (an unknown id, an inconsistent collaborator, bad input)
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`GdscanError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! Library code returns `Result<T, GdscanError>`. Orchestration code (the CLI, the
//! Drive listing) returns [`anyhow::Result`] and attaches context; the binary
//! converts whatever reaches `main` with [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use gdscan::core::{GdscanError, user_friendly_error};
//!
//! let error = GdscanError::NotFound { id: "1AbC".to_string() };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Prints a coloured error with a suggestion to stderr
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for gdscan operations
///
/// # Error Categories
///
/// ## Resolution engine
/// - [`Consistency`] - the fetch collaborator returned a different item than requested
/// - [`NotFound`] - an item id cannot be fetched (unknown or inaccessible)
/// - [`Cycle`] - the parent graph loops back onto an item still being resolved
/// - [`Decode`] - malformed text handed to the name codec
///
/// ## Collaborators
/// - [`Network`] - a Drive API request failed
/// - [`Auth`] - credentials are missing, invalid or could not be refreshed
/// - [`Config`] - the configuration file is invalid
///
/// [`Consistency`]: GdscanError::Consistency
/// [`NotFound`]: GdscanError::NotFound
/// [`Cycle`]: GdscanError::Cycle
/// [`Decode`]: GdscanError::Decode
/// [`Network`]: GdscanError::Network
/// [`Auth`]: GdscanError::Auth
/// [`Config`]: GdscanError::Config
#[derive(Error, Debug)]
pub enum GdscanError {
    /// A fetched record's id does not match the id that was requested.
    ///
    /// This indicates a bug in the fetch collaborator. It is fatal and never
    /// retried; the record is not stored under either id.
    #[error("Fetched item '{returned}' when item '{requested}' was requested")]
    Consistency {
        /// The id passed to the fetch collaborator
        requested: String,
        /// The id carried by the record it returned
        returned: String,
    },

    /// An item id could not be resolved by the fetch collaborator.
    ///
    /// Surfaced to the caller of path resolution; resolution of the item whose
    /// ancestor chain contains this id is aborted and no partial paths are returned.
    #[error("Item '{id}' not found or not accessible")]
    NotFound {
        /// The id that could not be fetched
        id: String,
    },

    /// Malformed encoded text passed to the name codec.
    #[error("Cannot decode '{text}': {reason}")]
    Decode {
        /// The offending encoded text
        text: String,
        /// What was wrong with it
        reason: String,
    },

    /// The parent graph contains a cycle.
    ///
    /// # Fields
    /// - `chain`: the ids on the cycle, starting and ending with the re-entered id
    #[error("Parent cycle detected: {chain}")]
    Cycle {
        /// String representation of the cycle
        chain: String,
    },

    /// Drive API request failed
    #[error("Network error during {operation}: {reason}")]
    Network {
        /// The request that failed
        operation: String,
        /// Reason for the failure
        reason: String,
    },

    /// Authentication or authorization failed
    #[error("Authentication failed: {reason}")]
    Auth {
        /// Reason for the failure
        reason: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The report file already exists and overwriting was not requested
    #[error("File {path} already exists")]
    OutputExists {
        /// Path of the existing file
        path: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` pairs a [`GdscanError`] with optional details and an
/// actionable suggestion. It is what the binary prints when a run aborts.
///
/// ```rust,no_run
/// use gdscan::core::{GdscanError, ErrorContext};
///
/// let context = ErrorContext::new(GdscanError::Auth { reason: "token expired".into() })
///     .with_suggestion("Delete storage.json and run the scan again")
///     .with_details("The stored refresh token was rejected by Google");
///
/// println!("{}", context);
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: GdscanError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: GdscanError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
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

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`GdscanError`] anywhere in the error chain (so errors wrapped with
/// `anyhow::Context` still get tailored suggestions) and [`std::io::Error`].
/// Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let outer = error.to_string();

    if let Some(inner) = error.chain().find_map(|e| e.downcast_ref::<GdscanError>()) {
        let ctx = create_error_context(shallow_copy(inner));
        if outer == inner.to_string() {
            return ctx;
        }
        // Context was attached on top of the typed error: surface it as details
        let details = match &ctx.details {
            Some(details) => format!("{outer}. {details}"),
            None => outer,
        };
        return ctx.with_details(details);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(GdscanError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check the permissions of the output file and configuration directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(GdscanError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let chain = cause_chain(&error);
    let mut message = outer;
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(GdscanError::Other {
        message,
    })
}

fn cause_chain(error: &anyhow::Error) -> Vec<String> {
    error.chain().skip(1).map(std::string::ToString::to_string).collect()
}

/// Rebuild a typed error found by reference in an error chain.
///
/// Variants wrapping foreign errors cannot be cloned, so they collapse to
/// [`GdscanError::Other`] carrying the same message.
fn shallow_copy(error: &GdscanError) -> GdscanError {
    match error {
        GdscanError::Consistency {
            requested,
            returned,
        } => GdscanError::Consistency {
            requested: requested.clone(),
            returned: returned.clone(),
        },
        GdscanError::NotFound {
            id,
        } => GdscanError::NotFound {
            id: id.clone(),
        },
        GdscanError::Decode {
            text,
            reason,
        } => GdscanError::Decode {
            text: text.clone(),
            reason: reason.clone(),
        },
        GdscanError::Cycle {
            chain,
        } => GdscanError::Cycle {
            chain: chain.clone(),
        },
        GdscanError::Network {
            operation,
            reason,
        } => GdscanError::Network {
            operation: operation.clone(),
            reason: reason.clone(),
        },
        GdscanError::Auth {
            reason,
        } => GdscanError::Auth {
            reason: reason.clone(),
        },
        GdscanError::Config {
            message,
        } => GdscanError::Config {
            message: message.clone(),
        },
        GdscanError::OutputExists {
            path,
        } => GdscanError::OutputExists {
            path: path.clone(),
        },
        other => GdscanError::Other {
            message: other.to_string(),
        },
    }
}

/// Map each [`GdscanError`] variant to an [`ErrorContext`] with tailored suggestions.
fn create_error_context(error: GdscanError) -> ErrorContext {
    match &error {
        GdscanError::Consistency {
            ..
        } => ErrorContext::new(error)
            .with_details("The Drive API answered a single-item request with a different item"),

        GdscanError::NotFound {
            id,
        } => {
            let details = format!(
                "Item '{id}' is referenced as a parent folder but cannot be fetched; \
                 the scan stops rather than report incomplete paths"
            );
            ErrorContext::new(error)
                .with_suggestion("Check that the account still has access to the parent folder")
                .with_details(details)
        }

        GdscanError::Decode {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Pass a value taken verbatim from the 'paths' column of a gdscan report",
        ),

        GdscanError::Cycle {
            ..
        } => ErrorContext::new(error)
            .with_details("Drive folders are expected to form a hierarchy without loops"),

        GdscanError::Network {
            ..
        } => ErrorContext::new(error).with_suggestion("Check your internet connection and try again"),

        GdscanError::Auth {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Delete the stored token (storage.json in the configuration directory) and run the scan again to re-authorize",
        ),

        GdscanError::Config {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Fix the configuration file (default: ~/.gdscan/config.toml)"),

        GdscanError::OutputExists {
            ..
        } => ErrorContext::new(error).with_suggestion("Use --overwrite to overwrite it"),

        _ => ErrorContext::new(error),
    }
}
