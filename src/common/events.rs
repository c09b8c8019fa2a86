//! Planner progress events and observers

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::{debug, info, warn};

/// Which end of the query a roadmap attachment refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Roadmap search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    Heuristic,
    UniformCost,
}

/// Something noteworthy that happened during planning
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// The sampler failed to produce a configuration
    SampleRejected { attempts: usize },
    /// A free segment could not be recorded as an edge
    EdgeRejected { from: usize, to: usize },
    /// Roadmap construction finished
    RoadmapBuilt { nodes: usize, edges: usize },
    /// Start or goal joined the roadmap through `neighbor`
    EndpointAttached { endpoint: Endpoint, node: usize, neighbor: usize },
    /// Start or goal could not join the roadmap
    EndpointUnreachable { endpoint: Endpoint, candidates: usize },
    /// One roadmap search finished
    SearchFinished { strategy: SearchStrategy, found: bool },
    /// The two trees met
    TreesConnected { iterations: usize, start_tree: usize, goal_tree: usize },
    /// A path was handed to the trajectory sink
    PlanFinished { waypoints: usize },
}

/// Receives planner events; never required for correctness
pub trait PlannerObserver {
    fn on_event(&mut self, event: &PlannerEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl PlannerObserver for LogObserver {
    fn on_event(&mut self, event: &PlannerEvent) {
        match event {
            PlannerEvent::SampleRejected { attempts } => debug!("Failed to get a sample (attempt {})", attempts),
            PlannerEvent::EdgeRejected { from, to } => warn!("Failure in adding edge {} -- {}", from, to),
            PlannerEvent::RoadmapBuilt { nodes, edges } => {
                info!("Roadmap built with {} nodes and {} edges", nodes, edges)
            }
            PlannerEvent::EndpointAttached { endpoint, node, neighbor } => {
                info!("Attached {} configuration as node {} via node {}", endpoint, node, neighbor)
            }
            PlannerEvent::EndpointUnreachable { endpoint, candidates } => {
                warn!("{} configuration unreachable ({} neighbor candidates)", endpoint, candidates)
            }
            PlannerEvent::SearchFinished { strategy, found } => debug!("{:?} search found path: {}", strategy, found),
            PlannerEvent::TreesConnected { iterations, start_tree, goal_tree } => info!(
                "Trees connected after {} iterations ({} start nodes, {} goal nodes)",
                iterations, start_tree, goal_tree
            ),
            PlannerEvent::PlanFinished { waypoints } => info!("Plan success, path of {} waypoints", waypoints),
        }
    }
}

/// Keeps every event in memory; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<PlannerEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PlannerEvent> {
        self.events.borrow().clone()
    }

    pub fn count<F: Fn(&PlannerEvent) -> bool>(&self, predicate: F) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl PlannerObserver for EventRecorder {
    fn on_event(&mut self, event: &PlannerEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_clones_share_log() {
        let recorder = EventRecorder::new();
        let mut handle = recorder.clone();
        handle.on_event(&PlannerEvent::RoadmapBuilt { nodes: 3, edges: 2 });
        handle.on_event(&PlannerEvent::SearchFinished { strategy: SearchStrategy::Heuristic, found: false });

        assert_eq!(recorder.events().len(), 2);
        assert_eq!(recorder.count(|e| matches!(e, PlannerEvent::SearchFinished { .. })), 1);
    }

    #[test]
    fn test_log_observer_accepts_all_events() {
        let mut observer = LogObserver;
        observer.on_event(&PlannerEvent::EndpointUnreachable { endpoint: Endpoint::Start, candidates: 0 });
        observer.on_event(&PlannerEvent::PlanFinished { waypoints: 4 });
    }
}
