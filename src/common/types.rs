//! Common types used throughout prm_planning

use std::ops::Index;

use itertools::Itertools;
use nalgebra::DVector;

use crate::common::traits::ConfigurationMetric;

/// A point in configuration space, one value per active degree of freedom
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration(DVector<f64>);

impl Configuration {
    pub fn new(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self(DVector::from_column_slice(values))
    }

    pub fn zeros(dof: usize) -> Self {
        Self(DVector::zeros(dof))
    }

    /// Number of degrees of freedom
    pub fn dof(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn as_vector(&self) -> &DVector<f64> {
        &self.0
    }

    /// Component-wise `self - other`
    pub fn difference(&self, other: &Configuration) -> DVector<f64> {
        assert_eq!(self.dof(), other.dof(), "configuration dimension mismatch");
        &self.0 - &other.0
    }

    /// Move from `self` toward `target` by `ratio` of the straight-line difference.
    pub fn step_toward(&self, target: &Configuration, ratio: f64) -> Configuration {
        let delta = target.difference(self);
        Self(&self.0 + delta * ratio)
    }

    pub fn euclidean_distance(&self, other: &Configuration) -> f64 {
        self.difference(other).norm()
    }
}

impl Index<usize> for Configuration {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl From<Vec<f64>> for Configuration {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for Configuration {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}

impl From<DVector<f64>> for Configuration {
    fn from(v: DVector<f64>) -> Self {
        Self(v)
    }
}

/// Path represented as an ordered sequence of configurations, start first
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPath {
    pub waypoints: Vec<Configuration>,
}

impl ConfigPath {
    pub fn new() -> Self {
        Self { waypoints: Vec::new() }
    }

    pub fn from_waypoints(waypoints: Vec<Configuration>) -> Self {
        Self { waypoints }
    }

    pub fn push(&mut self, q: Configuration) {
        self.waypoints.push(q);
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn first(&self) -> Option<&Configuration> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&Configuration> {
        self.waypoints.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.waypoints.iter()
    }

    /// Sum of metric distances between consecutive waypoints
    pub fn total_length<M: ConfigurationMetric + ?Sized>(&self, metric: &M) -> f64 {
        self.waypoints
            .iter()
            .tuple_windows()
            .map(|(a, b)| metric.distance(a, b))
            .sum()
    }

    /// Values of coordinate `axis` along the path, for plotting
    pub fn coords(&self, axis: usize) -> Vec<f64> {
        self.waypoints.iter().map(|q| q[axis]).collect()
    }
}

impl Default for ConfigPath {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EuclideanMetric;

    #[test]
    fn test_configuration_distance() {
        let a = Configuration::new(vec![0.0, 0.0]);
        let b = Configuration::new(vec![3.0, 4.0]);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_step_toward() {
        let a = Configuration::new(vec![0.0, 2.0]);
        let b = Configuration::new(vec![10.0, 2.0]);
        let q = a.step_toward(&b, 0.25);
        assert!((q[0] - 2.5).abs() < 1e-12);
        assert!((q[1] - 2.0).abs() < 1e-12);
        assert_eq!(a.step_toward(&b, 1.0), b);
    }

    #[test]
    #[should_panic]
    fn test_difference_dimension_mismatch_panics() {
        let a = Configuration::new(vec![0.0]);
        let b = Configuration::new(vec![0.0, 1.0]);
        let _ = a.difference(&b);
    }

    #[test]
    fn test_path_total_length() {
        let path = ConfigPath::from_waypoints(vec![
            Configuration::new(vec![0.0, 0.0]),
            Configuration::new(vec![1.0, 0.0]),
            Configuration::new(vec![1.0, 1.0]),
        ]);
        assert!((path.total_length(&EuclideanMetric) - 2.0).abs() < 1e-10);
        assert_eq!(path.coords(1), vec![0.0, 0.0, 1.0]);
    }
}
