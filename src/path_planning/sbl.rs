//! Single-query bidirectional tree planner (SBL/RRT-Connect style)
//!
//! One tree grows from the start and one from the goal. Each iteration the
//! active tree extends toward a random sample and the other tree extends
//! toward whatever the active tree reached; the roles swap every iteration.

use std::mem;

use crate::common::*;
use crate::path_planning::incremental_tree::{ExtendStatus, IncrementalTree, TreeContext};

/// Bidirectional tree planner
pub struct SblPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    metric: M,
    oracle: V,
    sampler: S,
    projector: Option<Box<dyn ConstraintProjector>>,
    observer: Box<dyn PlannerObserver>,
    params: Option<PlannerParams>,
    dof: usize,
    trees: Option<(IncrementalTree<M>, IncrementalTree<M>)>,
}

impl<M, V, S> SblPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    pub fn new(metric: M, oracle: V, sampler: S) -> Self {
        SblPlanner {
            metric,
            oracle,
            sampler,
            projector: None,
            observer: Box::new(LogObserver),
            params: None,
            dof: 0,
            trees: None,
        }
    }

    pub fn with_projector(mut self, projector: Box<dyn ConstraintProjector>) -> Self {
        self.projector = Some(projector);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn PlannerObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Tree rooted at the start, after the last `plan_path`
    pub fn start_tree(&self) -> Option<&IncrementalTree<M>> {
        self.trees.as_ref().map(|(start, _)| start)
    }

    /// Tree rooted at the goal, after the last `plan_path`
    pub fn goal_tree(&self) -> Option<&IncrementalTree<M>> {
        self.trees.as_ref().map(|(_, goal)| goal)
    }

    /// One growth round. Returns the meeting node indices in
    /// (active, other) when the other tree connects.
    fn grow(
        active: &mut IncrementalTree<M>,
        other: &mut IncrementalTree<M>,
        target: &Configuration,
        oracle: &dyn ValidityOracle,
        projector: Option<&dyn ConstraintProjector>,
    ) -> Option<(usize, usize)> {
        let own = active.get_config(active.last_index()?).clone();
        active.extend(&own, oracle, projector, false);
        let ext = active.extend(target, oracle, projector, false);
        if ext.status == ExtendStatus::Failed {
            return None;
        }
        let active_last = ext.last?;

        let own = other.get_config(other.last_index()?).clone();
        other.extend(&own, oracle, projector, false);
        let reached = active.get_config(active_last).clone();
        let ext = other.extend(&reached, oracle, projector, false);

        match ext.status {
            ExtendStatus::Connected => Some((active_last, ext.last?)),
            _ => None,
        }
    }
}

impl<M, V, S> MotionPlanner for SblPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    fn init_plan(&mut self, robot: &dyn RobotModel, params: PlannerParams) -> PlanningResult<()> {
        params.validate()?;
        params.check_dimensions(robot.active_dof())?;

        self.dof = robot.active_dof();
        self.params = Some(params);
        self.trees = None;
        Ok(())
    }

    fn plan_path(&mut self, sink: &mut dyn TrajectorySink) -> PlanningResult<ConfigPath> {
        let params = self.params.as_ref().ok_or(PlanningError::NotInitialized)?;
        let context = TreeContext { step_length: params.step_length, dof: self.dof };
        let max_iterations = params.max_iterations;
        let start = Configuration::from_slice(&params.start);
        let goal = Configuration::from_slice(&params.goal);

        let mut active = IncrementalTree::with_root(self.metric.clone(), context, start);
        let mut other = IncrementalTree::with_root(self.metric.clone(), context, goal);
        let mut active_is_start = true;

        let oracle: &dyn ValidityOracle = &self.oracle;
        let projector = self.projector.as_deref();

        let mut iterations = 0;
        let mut failures = 0;
        let joined = loop {
            if max_iterations > 0 && iterations >= max_iterations {
                break None;
            }
            iterations += 1;

            match self.sampler.sample() {
                Some(target) => {
                    if let Some(meeting) = Self::grow(&mut active, &mut other, &target, oracle, projector) {
                        break Some(meeting);
                    }
                }
                None => {
                    failures += 1;
                    self.observer.on_event(&PlannerEvent::SampleRejected { attempts: failures });
                }
            }

            mem::swap(&mut active, &mut other);
            active_is_start = !active_is_start;
        };

        let (start_tree, goal_tree) = if active_is_start { (active, other) } else { (other, active) };
        let result = match joined {
            Some((active_last, other_last)) => {
                let (start_last, goal_last) =
                    if active_is_start { (active_last, other_last) } else { (other_last, active_last) };
                let mut waypoints = start_tree.root_configs(start_last);
                let mut goal_chain = goal_tree.root_configs(goal_last);
                goal_chain.reverse();
                // Both frontiers may sit on the same configuration; keep one.
                let duplicate = match (waypoints.last(), goal_chain.first()) {
                    (Some(a), Some(b)) => self.metric.distance(a, b) == 0.0,
                    _ => false,
                };
                let skip = if duplicate { 1 } else { 0 };
                waypoints.extend(goal_chain.into_iter().skip(skip));

                self.observer.on_event(&PlannerEvent::TreesConnected {
                    iterations,
                    start_tree: start_tree.len(),
                    goal_tree: goal_tree.len(),
                });
                Ok(ConfigPath::from_waypoints(waypoints))
            }
            None => Err(PlanningError::BudgetExhausted { iterations }),
        };
        self.trees = Some((start_tree, goal_tree));

        let path = result?;
        for q in path.iter() {
            sink.add_point(q);
        }
        self.observer.on_event(&PlannerEvent::PlanFinished { waypoints: path.len() });
        Ok(path)
    }

    fn parameters(&self) -> Option<&PlannerParams> {
        self.params.as_ref()
    }
}
