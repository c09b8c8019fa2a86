//! Validity oracles for simple worlds

use crate::common::{Configuration, ValidityOracle};

/// Oracle for an empty world: every segment is free
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpace;

impl ValidityOracle for FreeSpace {
    fn segment_free(&self, _a: &Configuration, _b: &Configuration) -> bool {
        true
    }
}

/// Sphere obstacle (center, radius) in configuration space
#[derive(Debug, Clone)]
pub struct SphereObstacle {
    pub center: Configuration,
    pub radius: f64,
}

impl SphereObstacle {
    pub fn new(center: Vec<f64>, radius: f64) -> Self {
        Self { center: Configuration::new(center), radius }
    }
}

/// World of sphere obstacles; segments are checked at a fixed resolution
#[derive(Debug, Clone)]
pub struct SphereWorld {
    obstacles: Vec<SphereObstacle>,
    /// Clearance added to every obstacle radius
    pub robot_radius: f64,
    /// Spacing of the collision checks along a segment
    pub resolution: f64,
}

impl SphereWorld {
    pub fn new(obstacles: Vec<SphereObstacle>, robot_radius: f64, resolution: f64) -> Self {
        assert!(resolution > 0.0, "segment resolution must be positive");
        Self { obstacles, robot_radius, resolution }
    }

    pub fn obstacles(&self) -> &[SphereObstacle] {
        &self.obstacles
    }

    fn point_free(&self, q: &Configuration) -> bool {
        self.obstacles
            .iter()
            .all(|obs| obs.center.euclidean_distance(q) > obs.radius + self.robot_radius)
    }
}

impl ValidityOracle for SphereWorld {
    fn segment_free(&self, a: &Configuration, b: &Configuration) -> bool {
        let d = a.euclidean_distance(b);
        if d == 0.0 {
            return self.point_free(a);
        }

        let n_steps = (d / self.resolution).ceil() as usize;
        (0..=n_steps).all(|i| self.point_free(&a.step_toward(b, i as f64 / n_steps as f64)))
    }

    fn config_free(&self, q: &Configuration) -> bool {
        self.point_free(q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> SphereWorld {
        SphereWorld::new(vec![SphereObstacle::new(vec![5.0, 5.0], 1.0)], 0.5, 0.1)
    }

    #[test]
    fn test_free_space() {
        let a = Configuration::new(vec![0.0]);
        assert!(FreeSpace.segment_free(&a, &Configuration::new(vec![100.0])));
        assert!(FreeSpace.config_free(&a));
    }

    #[test]
    fn test_sphere_world_points() {
        let world = create_test_world();
        assert!(world.config_free(&Configuration::new(vec![0.0, 0.0])));
        assert!(!world.config_free(&Configuration::new(vec![5.0, 6.2])));
        assert!(world.config_free(&Configuration::new(vec![5.0, 6.6])));
    }

    #[test]
    fn test_sphere_world_segments() {
        let world = create_test_world();
        let a = Configuration::new(vec![0.0, 5.0]);
        let b = Configuration::new(vec![10.0, 5.0]);
        assert!(!world.segment_free(&a, &b));

        let c = Configuration::new(vec![0.0, 0.0]);
        let d = Configuration::new(vec![10.0, 0.0]);
        assert!(world.segment_free(&c, &d));
        assert!(world.segment_free(&c, &c));
    }
}
