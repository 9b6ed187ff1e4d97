/*!
 * Error types for Holonet
 */

use holonet_core_interface::{GatewayError, ResourceKind};
use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, HolonetError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

#[derive(Debug)]
pub enum HolonetError {
    /// A reference or cursor URL did not match its expected pattern
    MalformedReference { value: String, expected: &'static str },

    /// The gateway reported a failure (network, decode, non-2xx)
    Transport(GatewayError),

    /// One branch of a concurrent join failed; carries the first failure observed
    Aggregate {
        branches: usize,
        source: Box<HolonetError>,
    },

    /// A field layout names a field the entity does not carry
    MissingField {
        kind: ResourceKind,
        field: &'static str,
    },

    /// A spawned branch panicked or was cancelled by the runtime
    TaskFailed(String),

    /// Configuration error
    Config(String),

    /// I/O error
    Io(io::Error),
}

impl HolonetError {
    /// Wrap `source` as the first observed failure of a join over `branches`
    ///
    /// An aggregate is never nested inside another; the innermost one wins.
    pub fn aggregate(branches: usize, source: HolonetError) -> Self {
        match source {
            aggregate @ HolonetError::Aggregate { .. } => aggregate,
            other => HolonetError::Aggregate {
                branches,
                source: Box::new(other),
            },
        }
    }

    /// The failure at the bottom of any aggregate wrapping
    pub fn root_cause(&self) -> &HolonetError {
        match self {
            HolonetError::Aggregate { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether re-running the operation from scratch could succeed
    pub fn is_retryable(&self) -> bool {
        match self.root_cause() {
            HolonetError::Transport(_) => true,
            HolonetError::TaskFailed(_) => true,
            HolonetError::Io(_) => true,

            HolonetError::MalformedReference { .. } => false,
            HolonetError::MissingField { .. } => false,
            HolonetError::Config(_) => false,
            HolonetError::Aggregate { .. } => false,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_retryable() {
            EXIT_PARTIAL
        } else {
            EXIT_FATAL
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            HolonetError::MalformedReference { .. } => ErrorCategory::Reference,
            HolonetError::Transport(_) => ErrorCategory::Network,
            HolonetError::Aggregate { source, .. } => source.category(),
            HolonetError::MissingField { .. } => ErrorCategory::Layout,
            HolonetError::TaskFailed(_) => ErrorCategory::Concurrency,
            HolonetError::Config(_) => ErrorCategory::Configuration,
            HolonetError::Io(_) => ErrorCategory::IoError,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed reference or cursor URLs
    Reference,
    /// Gateway/transport failures
    Network,
    /// Field layout does not match the entity
    Layout,
    /// Spawned branch failures
    Concurrency,
    /// Configuration errors
    Configuration,
    /// I/O operation errors
    IoError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Reference => write!(f, "reference"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Layout => write!(f, "layout"),
            ErrorCategory::Concurrency => write!(f, "concurrency"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::IoError => write!(f, "io"),
        }
    }
}

impl fmt::Display for HolonetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolonetError::MalformedReference { value, expected } => {
                write!(f, "Malformed reference {:?}: expected {}", value, expected)
            }
            HolonetError::Transport(err) => {
                write!(f, "Transport failure: {}", err)
            }
            HolonetError::Aggregate { branches, source } => {
                write!(f, "1 of {} concurrent fetches failed: {}", branches, source)
            }
            HolonetError::MissingField { kind, field } => {
                write!(f, "{} has no field named {}", kind, field)
            }
            HolonetError::TaskFailed(msg) => {
                write!(f, "Concurrent task failed: {}", msg)
            }
            HolonetError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            HolonetError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for HolonetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HolonetError::Transport(err) => Some(err),
            HolonetError::Aggregate { source, .. } => Some(source.as_ref()),
            HolonetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GatewayError> for HolonetError {
    fn from(err: GatewayError) -> Self {
        HolonetError::Transport(err)
    }
}

impl From<io::Error> for HolonetError {
    fn from(err: io::Error) -> Self {
        HolonetError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HolonetError {
        HolonetError::Transport(GatewayError::Network("connection reset".to_string()))
    }

    #[test]
    fn test_aggregate_does_not_nest() {
        let inner = HolonetError::aggregate(3, transport());
        let outer = HolonetError::aggregate(5, inner);

        match &outer {
            HolonetError::Aggregate { branches, source } => {
                assert_eq!(*branches, 3);
                assert!(matches!(source.as_ref(), HolonetError::Transport(_)));
            }
            other => panic!("expected aggregate, got {:?}", other),
        }
    }

    #[test]
    fn test_retryable_classification() {
        assert!(transport().is_retryable());
        assert!(HolonetError::aggregate(2, transport()).is_retryable());

        let malformed = HolonetError::MalformedReference {
            value: "not a url".to_string(),
            expected: "<scheme>://<host>/api/<kind>/<id>/",
        };
        assert!(!malformed.is_retryable());
        assert_eq!(malformed.exit_code(), EXIT_FATAL);
        assert_eq!(transport().exit_code(), EXIT_PARTIAL);
    }

    #[test]
    fn test_category_follows_root_cause() {
        let err = HolonetError::aggregate(4, transport());
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.category().to_string(), "network");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let err = HolonetError::aggregate(2, transport());
        let source = err.source().expect("aggregate has a source");
        assert!(source.to_string().starts_with("Transport failure"));
    }
}
