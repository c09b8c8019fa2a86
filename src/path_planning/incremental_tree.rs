//! Incrementally grown search tree used by the bidirectional planner
//!
//! Nodes are append-only and every parent index points to an earlier node,
//! so walking parents from any node always ends at the root.

use crate::common::{Configuration, ConfigurationMetric, ConstraintProjector, ValidityOracle};

/// Fraction of the step length within which a target counts as connected
const CONNECT_TOLERANCE: f64 = 0.1;
/// Fraction of the step length below which a projected step counts as no progress
const PROGRESS_TOLERANCE: f64 = 0.01;

/// Read-only parameters a tree is built with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeContext {
    /// Extension step length
    pub step_length: f64,
    /// Active degrees of freedom
    pub dof: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub parent: Option<usize>,
    pub config: Configuration,
}

/// Outcome of one `extend` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendStatus {
    /// No node was added
    Failed,
    /// Progress was made but the target was not reached
    Reached,
    /// The tree reached, or came within tolerance of, the target
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extension {
    pub status: ExtendStatus,
    /// Last node touched: the newest node added, or the nearest node when
    /// nothing was added. `None` only for an empty tree.
    pub last: Option<usize>,
}

pub struct IncrementalTree<M: ConfigurationMetric> {
    metric: M,
    context: TreeContext,
    nodes: Vec<TreeNode>,
    best_distance: f64,
}

impl<M: ConfigurationMetric> IncrementalTree<M> {
    pub fn new(metric: M, context: TreeContext) -> Self {
        IncrementalTree {
            metric,
            context,
            nodes: Vec::new(),
            best_distance: 0.0,
        }
    }

    /// Create a tree holding only `root`
    pub fn with_root(metric: M, context: TreeContext, root: Configuration) -> Self {
        let mut tree = Self::new(metric, context);
        tree.add_node(None, root);
        tree
    }

    pub fn add_node(&mut self, parent: Option<usize>, config: Configuration) -> usize {
        assert_eq!(config.dof(), self.context.dof, "configuration dimension mismatch");
        if let Some(p) = parent {
            assert!(p < self.nodes.len(), "parent {} is not an existing node", p);
        }
        self.nodes.push(TreeNode { parent, config });
        self.nodes.len() - 1
    }

    /// Index of the node closest to `target`; also records that distance
    /// as `best_distance`.
    pub fn nearest_node(&mut self, target: &Configuration) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            let d = self.metric.distance(target, &node.config);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }

        best.map(|(i, d)| {
            self.best_distance = d;
            i
        })
    }

    /// Grow the tree from its nearest node toward `target` in straight steps.
    ///
    /// Every step is gated by the optional projector and by the validity
    /// oracle. With `single_step` the call returns `Connected` right after
    /// the first node it adds.
    pub fn extend(
        &mut self,
        target: &Configuration,
        oracle: &dyn ValidityOracle,
        projector: Option<&dyn ConstraintProjector>,
        single_step: bool,
    ) -> Extension {
        let mut last = match self.nearest_node(target) {
            Some(i) => i,
            None => return Extension { status: ExtendStatus::Failed, last: None },
        };
        let step = self.context.step_length;
        let mut added = false;

        loop {
            let current = &self.nodes[last].config;
            let dist = self.metric.distance(target, current);
            if dist <= CONNECT_TOLERANCE * step {
                return Extension { status: ExtendStatus::Connected, last: Some(last) };
            }

            let ratio = if dist > step { step / dist } else { 1.0 };
            let mut candidate = current.step_toward(target, ratio);

            if let Some(projector) = projector {
                if !projector.project(current, &mut candidate)
                    || self.metric.distance(current, &candidate) <= PROGRESS_TOLERANCE * step
                {
                    return Self::stopped(added, last);
                }
            }

            if !oracle.segment_free(current, &candidate) {
                return Self::stopped(added, last);
            }

            last = self.add_node(Some(last), candidate);
            added = true;
            if single_step {
                return Extension { status: ExtendStatus::Connected, last: Some(last) };
            }
        }
    }

    fn stopped(added: bool, last: usize) -> Extension {
        let status = if added { ExtendStatus::Reached } else { ExtendStatus::Failed };
        Extension { status, last: Some(last) }
    }

    /// Node indices from the root down to `index`
    pub fn root_path(&self, index: usize) -> Vec<usize> {
        let mut chain = vec![index];
        let mut current = index;
        while let Some(parent) = self.nodes[current].parent {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }

    /// Configurations from the root down to `index`
    pub fn root_configs(&self, index: usize) -> Vec<Configuration> {
        self.root_path(index).into_iter().map(|i| self.nodes[i].config.clone()).collect()
    }

    pub fn get_config(&self, index: usize) -> &Configuration {
        &self.nodes[index].config
    }

    pub fn last_index(&self) -> Option<usize> {
        self.nodes.len().checked_sub(1)
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distance found by the latest `nearest_node` call
    pub fn best_distance(&self) -> f64 {
        self.best_distance
    }

    pub fn context(&self) -> TreeContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{EuclideanMetric, FreeSpace, SphereObstacle, SphereWorld};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// 1-D world blocked at and beyond `x`
    struct Wall(f64);

    impl ValidityOracle for Wall {
        fn segment_free(&self, a: &Configuration, b: &Configuration) -> bool {
            a[0] < self.0 && b[0] < self.0
        }
    }

    struct RejectAll;

    impl ConstraintProjector for RejectAll {
        fn project(&self, _from: &Configuration, _candidate: &mut Configuration) -> bool {
            false
        }
    }

    /// Pins the candidate back onto its origin, so no progress is made
    struct Stuck;

    impl ConstraintProjector for Stuck {
        fn project(&self, from: &Configuration, candidate: &mut Configuration) -> bool {
            *candidate = from.clone();
            true
        }
    }

    /// Keeps every coordinate after the first at zero
    struct Flatten;

    impl ConstraintProjector for Flatten {
        fn project(&self, _from: &Configuration, candidate: &mut Configuration) -> bool {
            let mut values = candidate.as_slice().to_vec();
            values.iter_mut().skip(1).for_each(|v| *v = 0.0);
            *candidate = Configuration::new(values);
            true
        }
    }

    fn q(values: &[f64]) -> Configuration {
        Configuration::from_slice(values)
    }

    fn tree_1d(step_length: f64) -> IncrementalTree<EuclideanMetric> {
        IncrementalTree::with_root(EuclideanMetric, TreeContext { step_length, dof: 1 }, q(&[0.0]))
    }

    #[test]
    fn test_extend_one_step_before_obstacle() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[10.0]), &Wall(1.5), None, false);

        assert_eq!(ext.status, ExtendStatus::Reached);
        assert_eq!(ext.last, Some(1));
        assert_eq!(tree.len(), 2);
        assert!((tree.get_config(1)[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_extend_in_free_space_connects() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[3.5]), &FreeSpace, None, false);

        assert_eq!(ext.status, ExtendStatus::Connected);
        let last = ext.last.unwrap();
        assert!((tree.get_config(last)[0] - 3.5).abs() < 1e-12);
        assert_eq!(tree.root_path(last), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_extend_within_tolerance_adds_nothing() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[0.05]), &FreeSpace, None, false);
        assert_eq!(ext, Extension { status: ExtendStatus::Connected, last: Some(0) });
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_extend_single_step() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[10.0]), &FreeSpace, None, true);
        assert_eq!(ext, Extension { status: ExtendStatus::Connected, last: Some(1) });
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_extend_blocked_immediately_fails() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[10.0]), &Wall(0.5), None, false);
        assert_eq!(ext, Extension { status: ExtendStatus::Failed, last: Some(0) });
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_extend_empty_tree_fails() {
        let mut tree = IncrementalTree::new(EuclideanMetric, TreeContext { step_length: 1.0, dof: 1 });
        assert!(tree.is_empty());
        let ext = tree.extend(&q(&[1.0]), &FreeSpace, None, false);
        assert_eq!(ext, Extension { status: ExtendStatus::Failed, last: None });
    }

    #[test]
    fn test_projector_rejection_and_no_progress() {
        let mut tree = tree_1d(1.0);
        let ext = tree.extend(&q(&[5.0]), &FreeSpace, Some(&RejectAll as &dyn ConstraintProjector), false);
        assert_eq!(ext.status, ExtendStatus::Failed);

        let ext = tree.extend(&q(&[5.0]), &FreeSpace, Some(&Stuck as &dyn ConstraintProjector), false);
        assert_eq!(ext.status, ExtendStatus::Failed);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_projector_stalls_after_progress() {
        // The projected tree can only move along x, so it stops below the target.
        let context = TreeContext { step_length: 1.0, dof: 2 };
        let mut tree = IncrementalTree::with_root(EuclideanMetric, context, q(&[0.0, 0.0]));
        let ext = tree.extend(&q(&[3.0, 4.0]), &FreeSpace, Some(&Flatten as &dyn ConstraintProjector), false);

        assert_eq!(ext.status, ExtendStatus::Reached);
        let last = tree.get_config(ext.last.unwrap());
        assert!(last[1].abs() < 1e-12);
        assert!((last[0] - 3.0).abs() < 0.05);
    }

    #[test]
    fn test_nearest_node_records_best_distance() {
        let mut tree = tree_1d(1.0);
        tree.add_node(Some(0), q(&[4.0]));
        tree.add_node(Some(1), q(&[8.0]));

        assert_eq!(tree.nearest_node(&q(&[5.0])), Some(1));
        assert!((tree.best_distance() - 1.0).abs() < 1e-12);
        assert_eq!(tree.last_index(), Some(2));
    }

    #[test]
    #[should_panic]
    fn test_add_node_with_future_parent_panics() {
        let mut tree = tree_1d(1.0);
        tree.add_node(Some(3), q(&[1.0]));
    }

    #[test]
    #[should_panic]
    fn test_add_node_wrong_dimension_panics() {
        let mut tree = tree_1d(1.0);
        tree.add_node(Some(0), q(&[1.0, 2.0]));
    }

    #[test]
    fn test_parent_chains_terminate_at_root() {
        let world = SphereWorld::new(
            vec![SphereObstacle::new(vec![5.0, 5.0], 1.5), SphereObstacle::new(vec![2.0, 7.0], 1.0)],
            0.0,
            0.05,
        );
        let context = TreeContext { step_length: 0.5, dof: 2 };
        let mut tree = IncrementalTree::with_root(EuclideanMetric, context, q(&[0.0, 0.0]));
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let target = q(&[rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)]);
            tree.extend(&target, &world, None, rng.gen_bool(0.3));
        }

        for (i, node) in tree.nodes().iter().enumerate() {
            if let Some(p) = node.parent {
                assert!(p < i);
            }
            let chain = tree.root_path(i);
            assert!(chain.len() <= tree.len());
            assert_eq!(chain[0], 0);
            assert_eq!(*chain.last().unwrap(), i);
        }
    }
}
