//! Uniform configuration sampler over an axis-aligned box

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};

use crate::common::{Configuration, PlanningError, PlanningResult, RobotModel, Sampler, ValidityOracle};

/// Draws configurations uniformly inside `[lower, upper]` and rejects the
/// ones the validity oracle reports in collision.
pub struct UniformSampler<V: ValidityOracle> {
    axes: Vec<Uniform<f64>>,
    validity: V,
    rng: StdRng,
}

impl<V: ValidityOracle> UniformSampler<V> {
    pub fn new(lower: &[f64], upper: &[f64], validity: V) -> PlanningResult<Self> {
        if lower.len() != upper.len() {
            return Err(PlanningError::DimensionMismatch {
                what: "sampler bounds",
                expected: lower.len(),
                found: upper.len(),
            });
        }
        if let Some(axis) = lower.iter().zip(upper.iter()).position(|(lo, hi)| !(lo < hi)) {
            return Err(PlanningError::InvalidParameter(format!(
                "empty sampling interval on axis {}: [{}, {}]",
                axis, lower[axis], upper[axis]
            )));
        }

        let axes = lower
            .iter()
            .zip(upper.iter())
            .map(|(&lo, &hi)| Uniform::new(lo, hi))
            .collect();

        Ok(Self { axes, validity, rng: StdRng::from_entropy() })
    }

    /// Reseed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl<V: ValidityOracle> Sampler for UniformSampler<V> {
    fn sample(&mut self) -> Option<Configuration> {
        let rng = &mut self.rng;
        let values: Vec<f64> = self.axes.iter().map(|axis| axis.sample(&mut *rng)).collect();
        let q = Configuration::new(values);
        if self.validity.config_free(&q) {
            Some(q)
        } else {
            None
        }
    }
}

impl<V: ValidityOracle> RobotModel for UniformSampler<V> {
    fn active_dof(&self) -> usize {
        self.axes.len()
    }
}
