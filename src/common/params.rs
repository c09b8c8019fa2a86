//! Planner parameters shared by the roadmap and tree strategies

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::common::error::{PlanningError, PlanningResult};

/// Parameters for one planning problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerParams {
    /// Start configuration values
    pub start: Vec<f64>,
    /// Goal configuration values
    pub goal: Vec<f64>,
    /// Number of roadmap samples
    pub node_budget: usize,
    /// Maximum metric distance for a roadmap edge
    pub neighbor_threshold: f64,
    /// Tree extension step length
    pub step_length: f64,
    /// Bidirectional growth budget (0 = unbounded)
    pub max_iterations: usize,
    /// Sampler attempts allowed while building the roadmap (0 = unbounded)
    pub max_sample_attempts: usize,
    /// Graphviz dump of the roadmap, written after it is built
    pub roadmap_dump: Option<PathBuf>,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            start: Vec::new(),
            goal: Vec::new(),
            node_budget: 100,
            neighbor_threshold: 5.0,
            step_length: 0.04,
            max_iterations: 10_000,
            max_sample_attempts: 0,
            roadmap_dump: None,
        }
    }
}

impl PlannerParams {
    pub fn from_toml_str(contents: &str) -> PlanningResult<Self> {
        let params: PlannerParams = toml::from_str(contents)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> PlanningResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn with_start(mut self, start: Vec<f64>) -> Self {
        self.start = start;
        self
    }

    pub fn with_goal(mut self, goal: Vec<f64>) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_node_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget;
        self
    }

    pub fn with_neighbor_threshold(mut self, threshold: f64) -> Self {
        self.neighbor_threshold = threshold;
        self
    }

    pub fn with_step_length(mut self, step_length: f64) -> Self {
        self.step_length = step_length;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_roadmap_dump<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.roadmap_dump = Some(path.into());
        self
    }

    pub fn validate(&self) -> PlanningResult<()> {
        if self.node_budget == 0 {
            return Err(PlanningError::InvalidParameter("node_budget must be positive".to_string()));
        }
        if !(self.neighbor_threshold.is_finite() && self.neighbor_threshold > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "neighbor_threshold must be positive, got {}",
                self.neighbor_threshold
            )));
        }
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "step_length must be positive, got {}",
                self.step_length
            )));
        }
        Ok(())
    }

    /// Start and goal must both match the robot's active DOF count.
    pub fn check_dimensions(&self, dof: usize) -> PlanningResult<()> {
        if self.start.len() != dof {
            return Err(PlanningError::DimensionMismatch { what: "start", expected: dof, found: self.start.len() });
        }
        if self.goal.len() != dof {
            return Err(PlanningError::DimensionMismatch { what: "goal", expected: dof, found: self.goal.len() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default() {
        let params = PlannerParams::default();
        assert_eq!(params.node_budget, 100);
        assert_eq!(params.neighbor_threshold, 5.0);
        assert_eq!(params.step_length, 0.04);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_params_from_toml() {
        let params = PlannerParams::from_toml_str(
            r#"
            start = [0.0, 0.0]
            goal = [9.0, 9.0]
            node_budget = 250
            neighbor_threshold = 2.5
            roadmap_dump = "roadmap.dot"
            "#,
        )
        .unwrap();
        assert_eq!(params.start, vec![0.0, 0.0]);
        assert_eq!(params.node_budget, 250);
        assert_eq!(params.neighbor_threshold, 2.5);
        assert_eq!(params.step_length, 0.04);
        assert_eq!(params.roadmap_dump, Some(PathBuf::from("roadmap.dot")));
    }

    #[test]
    fn test_params_reject_bad_values() {
        let err = PlannerParams::from_toml_str("neighbor_threshold = -1.0").unwrap_err();
        assert!(matches!(err, PlanningError::InvalidParameter(_)));

        let err = PlannerParams::from_toml_str("node_budget = \"many\"").unwrap_err();
        assert!(matches!(err, PlanningError::Config(_)));

        assert!(PlannerParams::default().with_step_length(0.0).validate().is_err());
    }

    #[test]
    fn test_check_dimensions() {
        let params = PlannerParams::default().with_start(vec![0.0, 0.0]).with_goal(vec![1.0]);
        assert!(matches!(
            params.check_dimensions(2),
            Err(PlanningError::DimensionMismatch { what: "goal", expected: 2, found: 1 })
        ));
    }
}
