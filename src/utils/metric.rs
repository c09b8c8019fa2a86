//! Distance metrics over configurations

use crate::common::{Configuration, ConfigurationMetric};

/// Plain Euclidean distance
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanMetric;

impl ConfigurationMetric for EuclideanMetric {
    fn distance(&self, a: &Configuration, b: &Configuration) -> f64 {
        a.euclidean_distance(b)
    }
}

/// Euclidean distance with one weight per joint
#[derive(Debug, Clone)]
pub struct WeightedEuclideanMetric {
    weights: Vec<f64>,
}

impl WeightedEuclideanMetric {
    pub fn new(weights: Vec<f64>) -> Self {
        assert!(weights.iter().all(|w| *w >= 0.0), "joint weights must be non-negative");
        Self { weights }
    }
}

impl ConfigurationMetric for WeightedEuclideanMetric {
    fn distance(&self, a: &Configuration, b: &Configuration) -> f64 {
        assert_eq!(a.dof(), self.weights.len(), "configuration dimension mismatch");
        a.difference(b)
            .iter()
            .zip(self.weights.iter())
            .map(|(d, w)| w * d * d)
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_metric() {
        let a = Configuration::new(vec![1.0, 1.0, 1.0]);
        let b = Configuration::new(vec![1.0, 3.0, 1.0]);
        assert!((EuclideanMetric.distance(&a, &b) - 2.0).abs() < 1e-12);
        assert_eq!(EuclideanMetric.distance(&a, &a), 0.0);
    }

    #[test]
    fn test_weighted_metric() {
        let metric = WeightedEuclideanMetric::new(vec![4.0, 1.0]);
        let a = Configuration::new(vec![0.0, 0.0]);
        let b = Configuration::new(vec![1.0, 0.0]);
        assert!((metric.distance(&a, &b) - 2.0).abs() < 1e-12);
        assert!((metric.distance(&a, &b) - metric.distance(&b, &a)).abs() < 1e-12);
    }
}
