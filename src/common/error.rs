//! Error types for prm_planning

use thiserror::Error;

use crate::common::events::Endpoint;

/// Main error type for the planners
#[derive(Error, Debug)]
pub enum PlanningError {
    /// `plan_path` was called before `init_plan`
    #[error("Planner not initialized")]
    NotInitialized,
    /// A configuration does not match the active degrees of freedom
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Start or goal could not be connected to the roadmap
    #[error("{0} configuration is unreachable from the roadmap")]
    Unreachable(Endpoint),
    /// Neither search found a path between the attached endpoints
    #[error("No path found")]
    NoPath,
    /// An iteration or sampling budget ran out
    #[error("Budget exhausted after {iterations} iterations")]
    BudgetExhausted { iterations: usize },
    /// Attachment produced a handle outside the plausible range
    #[error("Invalid node handle {handle} for roadmap of {nodes} nodes")]
    CorruptHandle { handle: usize, nodes: usize },
    /// The single-use roadmap has already answered a query
    #[error("Roadmap already queried")]
    RoadmapConsumed,
    /// Parameter file could not be decoded
    #[error("Configuration error: {0}")]
    Config(String),
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PlanningError {
    fn from(e: toml::de::Error) -> Self {
        PlanningError::Config(e.to_string())
    }
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::Unreachable(Endpoint::Goal);
        assert_eq!(format!("{}", err), "goal configuration is unreachable from the roadmap");

        let err = PlanningError::DimensionMismatch { what: "start", expected: 3, found: 2 };
        assert_eq!(format!("{}", err), "Dimension mismatch for start: expected 3, found 2");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let err: PlanningError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, PlanningError::Config(_)));
    }
}
