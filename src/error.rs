//! Error types for diagram construction and queries

use std::fmt;

/// Errors that can occur while configuring, building or colouring a diagram
///
/// Degenerate geometry (collinear sites, parallel edges, empty cells) never
/// produces an error; those cases resolve to `None` or empty results.
#[derive(Debug, Clone, PartialEq)]
pub enum VoronoiError {
    /// Configuration validation failed
    InvalidConfig(String),
    /// A site coordinate cannot be swept (NaN or infinite)
    InvalidSite {
        /// Index of the offending site in the input list
        index: usize,
        /// What is wrong with it
        reason: String,
    },
    /// Two sites occupy the same position (within `EPSILON`)
    DuplicateSite {
        /// Index of the first occurrence
        first: usize,
        /// Index of the repeated site
        second: usize,
    },
    /// An edge referenced a node that was never added to a colour graph
    UnknownNode(String),
}

impl fmt::Display for VoronoiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoronoiError::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            VoronoiError::InvalidSite { index, reason } => {
                write!(f, "invalid site {}: {}", index, reason)
            }
            VoronoiError::DuplicateSite { first, second } => {
                write!(f, "site {} duplicates site {}", second, first)
            }
            VoronoiError::UnknownNode(node) => write!(f, "unknown graph node: {}", node),
        }
    }
}

impl std::error::Error for VoronoiError {}

/// Result type alias for voronoi operations
pub type Result<T> = std::result::Result<T, VoronoiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = VoronoiError::DuplicateSite { first: 2, second: 7 };
        assert_eq!(err.to_string(), "site 7 duplicates site 2");

        let err = VoronoiError::UnknownNode("42".to_string());
        assert_eq!(err.to_string(), "unknown graph node: 42");
    }
}
