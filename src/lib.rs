//! prm_planning - sampling-based motion planning in Rust
//!
//! This crate provides a multi-query Probabilistic Road-Map planner and a
//! single-query bidirectional tree planner over arbitrary configuration
//! spaces. Collision checking, sampling and the distance metric are
//! supplied by the caller through the traits in [`common`].

// Core modules
pub mod common;
pub mod utils;

// Algorithm modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Configuration, ConfigPath, PlannerParams};
pub use common::{ConfigurationMetric, ValidityOracle, Sampler, RobotModel, ConstraintProjector, TrajectorySink};
pub use common::{MotionPlanner, PlannerEvent, PlannerObserver};
pub use common::{PlanningError, PlanningResult};
pub use path_planning::{RoadmapGraph, IncrementalTree, RoadmapPlanner, SblPlanner};
