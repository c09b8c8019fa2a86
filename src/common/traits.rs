//! Collaborator contracts consumed by the planners, and the planner
//! capability shared by every strategy.

use crate::common::error::PlanningError;
use crate::common::params::PlannerParams;
use crate::common::types::*;

/// Distance between two configurations.
///
/// Expected to be symmetric, non-negative and zero only for equal
/// configurations. Roadmap edge weights and the A* heuristic both come from
/// this metric.
pub trait ConfigurationMetric {
    fn distance(&self, a: &Configuration, b: &Configuration) -> f64;
}

/// Collision/feasibility test for configurations and straight segments
pub trait ValidityOracle {
    /// True when the straight-line interpolation from `a` to `b` is free.
    fn segment_free(&self, a: &Configuration, b: &Configuration) -> bool;

    /// True when a single configuration is free.
    fn config_free(&self, q: &Configuration) -> bool {
        self.segment_free(q, q)
    }
}

/// Source of random configurations
pub trait Sampler {
    /// Draw one configuration; `None` is a transient failure the caller may retry.
    fn sample(&mut self) -> Option<Configuration>;
}

/// The robot being planned for
pub trait RobotModel {
    /// Dimensionality of the configuration space for this planning call
    fn active_dof(&self) -> usize;
}

impl RobotModel for usize {
    fn active_dof(&self) -> usize {
        *self
    }
}

/// Optional in-place adjustment of tree extension candidates
pub trait ConstraintProjector {
    /// Project `candidate` (reached from `from`) onto the constraint set.
    /// Returning false rejects the candidate.
    fn project(&self, from: &Configuration, candidate: &mut Configuration) -> bool;
}

/// Consumer of the final path, one waypoint at a time
pub trait TrajectorySink {
    fn add_point(&mut self, q: &Configuration);
}

impl TrajectorySink for Vec<Configuration> {
    fn add_point(&mut self, q: &Configuration) {
        self.push(q.clone());
    }
}

impl TrajectorySink for ConfigPath {
    fn add_point(&mut self, q: &Configuration) {
        self.push(q.clone());
    }
}

/// Capability shared by the roadmap and the bidirectional tree planner
pub trait MotionPlanner {
    /// Prepare the planner for `robot` with `params`.
    fn init_plan(&mut self, robot: &dyn RobotModel, params: PlannerParams) -> Result<(), PlanningError>;

    /// Plan from `params.start` to `params.goal`, writing waypoints into `sink`.
    fn plan_path(&mut self, sink: &mut dyn TrajectorySink) -> Result<ConfigPath, PlanningError>;

    /// Parameters given to the last successful `init_plan`
    fn parameters(&self) -> Option<&PlannerParams>;
}
