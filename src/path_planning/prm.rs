// Probabilistic Road-Map (PRM) path planning
// author: Atsushi Sakai (@Atsushi_twi)
//         Ryohei Sasaki (@rsasaki0109)
//         Rust port

//! Multi-query roadmap planner.
//!
//! `init_plan` samples the configuration space and connects every sample to
//! its free neighbors. `plan_path` then attaches start and goal to the
//! roadmap and searches it, first with A* and then with Dijkstra.

use std::fs::File;
use std::io::BufWriter;

use crate::common::*;
use crate::path_planning::roadmap_graph::{NodeId, RoadmapGraph, MAX_PREALLOC};

/// Lifecycle of one roadmap query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadmapState {
    Uninitialized,
    RoadmapBuilt,
    StartAttached,
    GoalAttached,
    PathFound,
    NoPath,
}

/// PRM Planner
pub struct RoadmapPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    metric: M,
    oracle: V,
    sampler: S,
    observer: Box<dyn PlannerObserver>,
    params: Option<PlannerParams>,
    roadmap: Option<RoadmapGraph<M>>,
    state: RoadmapState,
    start: Option<NodeId>,
    goal: Option<NodeId>,
}

impl<M, V, S> RoadmapPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    pub fn new(metric: M, oracle: V, sampler: S) -> Self {
        RoadmapPlanner {
            metric,
            oracle,
            sampler,
            observer: Box::new(LogObserver),
            params: None,
            roadmap: None,
            state: RoadmapState::Uninitialized,
            start: None,
            goal: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn PlannerObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> RoadmapState {
        self.state
    }

    pub fn roadmap(&self) -> Option<&RoadmapGraph<M>> {
        self.roadmap.as_ref()
    }

    /// Roadmap handles of the attached start and goal
    pub fn endpoints(&self) -> (Option<NodeId>, Option<NodeId>) {
        (self.start, self.goal)
    }

    /// Draw `node_budget` samples, then connect each to its free neighbors.
    /// Returns the number of roadmap nodes.
    pub fn build_roadmap(&mut self) -> PlanningResult<usize> {
        let params = self.params.as_ref().ok_or(PlanningError::NotInitialized)?;
        let mut graph = RoadmapGraph::new(self.metric.clone(), params.node_budget, params.neighbor_threshold);

        let mut samples = Vec::with_capacity(params.node_budget.min(MAX_PREALLOC));
        let mut failures = 0;
        while samples.len() < params.node_budget {
            match self.sampler.sample() {
                Some(q) => samples.push(q),
                None => {
                    failures += 1;
                    self.observer.on_event(&PlannerEvent::SampleRejected { attempts: failures });
                    if params.max_sample_attempts > 0 && samples.len() + failures >= params.max_sample_attempts {
                        return Err(PlanningError::BudgetExhausted { iterations: samples.len() + failures });
                    }
                }
            }
        }

        for sample in samples {
            let vs = graph.add_node(sample);
            for candidate in graph.find_neighbors(vs) {
                let free = {
                    let a = &graph.nodes()[vs.index()].config;
                    let b = &graph.nodes()[candidate.index()].config;
                    self.oracle.segment_free(a, b)
                };
                if free && !graph.add_edge(vs, candidate) {
                    self.observer.on_event(&PlannerEvent::EdgeRejected { from: vs.index(), to: candidate.index() });
                }
            }
        }

        let nodes = graph.node_count();
        self.observer.on_event(&PlannerEvent::RoadmapBuilt { nodes, edges: graph.edge_count() });

        if let Some(path) = &params.roadmap_dump {
            graph.write_dot(BufWriter::new(File::create(path)?))?;
        }

        self.roadmap = Some(graph);
        self.state = RoadmapState::RoadmapBuilt;
        Ok(nodes)
    }

    /// Insert `config` and connect it to the first neighbor candidate whose
    /// segment is free. Candidates are not ranked by distance.
    pub fn attach(&mut self, endpoint: Endpoint, config: Configuration) -> PlanningResult<NodeId> {
        let graph = self.roadmap.as_mut().ok_or(PlanningError::NotInitialized)?;

        let id = graph.add_node(config);
        let candidates = graph.find_neighbors(id);

        let mut attached = None;
        for &candidate in &candidates {
            let free = self
                .oracle
                .segment_free(&graph.nodes()[candidate.index()].config, &graph.nodes()[id.index()].config);
            if free && graph.add_edge(candidate, id) {
                attached = Some(candidate);
                break;
            }
        }

        let neighbor = match attached {
            Some(neighbor) => neighbor,
            None => {
                self.observer.on_event(&PlannerEvent::EndpointUnreachable { endpoint, candidates: candidates.len() });
                return Err(PlanningError::Unreachable(endpoint));
            }
        };

        if id.index() > 2 * graph.node_count() {
            return Err(PlanningError::CorruptHandle { handle: id.index(), nodes: graph.node_count() });
        }

        self.observer.on_event(&PlannerEvent::EndpointAttached {
            endpoint,
            node: id.index(),
            neighbor: neighbor.index(),
        });
        match endpoint {
            Endpoint::Start => {
                self.start = Some(id);
                self.state = RoadmapState::StartAttached;
            }
            Endpoint::Goal => {
                self.goal = Some(id);
                self.state = RoadmapState::GoalAttached;
            }
        }
        Ok(id)
    }

    /// Search the roadmap between the attached endpoints: A* first,
    /// Dijkstra if A* finds nothing.
    pub fn find_path(&mut self) -> PlanningResult<ConfigPath> {
        let graph = self.roadmap.as_ref().ok_or(PlanningError::NotInitialized)?;
        let start = self.start.ok_or(PlanningError::Unreachable(Endpoint::Start))?;
        let goal = self.goal.ok_or(PlanningError::Unreachable(Endpoint::Goal))?;

        let mut found = graph.find_path_heuristic(start, goal);
        self.observer.on_event(&PlannerEvent::SearchFinished {
            strategy: SearchStrategy::Heuristic,
            found: found.is_some(),
        });

        if found.is_none() {
            found = graph.find_path_uniform_cost(start, goal);
            self.observer.on_event(&PlannerEvent::SearchFinished {
                strategy: SearchStrategy::UniformCost,
                found: found.is_some(),
            });
        }

        match found {
            Some(ids) => {
                self.state = RoadmapState::PathFound;
                Ok(ConfigPath::from_waypoints(graph.configs(&ids)))
            }
            None => {
                self.state = RoadmapState::NoPath;
                Err(PlanningError::NoPath)
            }
        }
    }

    fn query(&mut self, start: Configuration, goal: Configuration) -> PlanningResult<ConfigPath> {
        self.attach(Endpoint::Start, start)?;
        self.attach(Endpoint::Goal, goal)?;
        self.find_path()
    }
}

impl<M, V, S> MotionPlanner for RoadmapPlanner<M, V, S>
where
    M: ConfigurationMetric + Clone,
    V: ValidityOracle,
    S: Sampler,
{
    fn init_plan(&mut self, robot: &dyn RobotModel, params: PlannerParams) -> PlanningResult<()> {
        params.validate()?;
        params.check_dimensions(robot.active_dof())?;

        self.params = Some(params);
        self.roadmap = None;
        self.start = None;
        self.goal = None;
        self.state = RoadmapState::Uninitialized;

        if let Err(e) = self.build_roadmap() {
            self.params = None;
            return Err(e);
        }
        Ok(())
    }

    fn plan_path(&mut self, sink: &mut dyn TrajectorySink) -> PlanningResult<ConfigPath> {
        match self.state {
            RoadmapState::Uninitialized => return Err(PlanningError::NotInitialized),
            RoadmapState::RoadmapBuilt => {}
            _ => return Err(PlanningError::RoadmapConsumed),
        }
        let params = self.params.as_ref().ok_or(PlanningError::NotInitialized)?;
        let start = Configuration::from_slice(&params.start);
        let goal = Configuration::from_slice(&params.goal);

        let path = match self.query(start, goal) {
            Ok(path) => path,
            Err(e) => {
                self.state = RoadmapState::NoPath;
                return Err(e);
            }
        };

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
