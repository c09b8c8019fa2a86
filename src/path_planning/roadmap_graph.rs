//! Roadmap graph for Probabilistic Road-Map planning
//!
//! Undirected weighted graph of configurations. Edge weights are metric
//! distances, and an edge is only recorded when its endpoints lie within the
//! neighborhood threshold of each other. Neighbor queries are a brute-force
//! scan over every node; no spatial index is kept.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::io::{self, Write};

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::common::{Configuration, ConfigurationMetric};

/// Upper bound on storage reserved up front for a node budget
pub(crate) const MAX_PREALLOC: usize = 4096;

/// Handle of a roadmap node, unique within its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadmapNode {
    pub id: NodeId,
    pub config: Configuration,
}

/// Undirected edge, reported with `a < b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadmapEdge {
    pub a: NodeId,
    pub b: NodeId,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy)]
struct Adjacent {
    node: NodeId,
    weight: f64,
}

pub struct RoadmapGraph<M: ConfigurationMetric> {
    metric: M,
    max_nodes: usize,
    neighbor_threshold: f64,
    nodes: Vec<RoadmapNode>,
    adjacency: Vec<Vec<Adjacent>>,
    edge_count: usize,
}

impl<M: ConfigurationMetric> RoadmapGraph<M> {
    /// `max_nodes` is a soft budget: `add_node` never refuses a node.
    pub fn new(metric: M, max_nodes: usize, neighbor_threshold: f64) -> Self {
        let reserve = max_nodes.min(MAX_PREALLOC) + 2;
        RoadmapGraph {
            metric,
            max_nodes,
            neighbor_threshold,
            nodes: Vec::with_capacity(reserve),
            adjacency: Vec::with_capacity(reserve),
            edge_count: 0,
        }
    }

    pub fn add_node(&mut self, config: Configuration) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(RoadmapNode { id, config });
        self.adjacency.push(Vec::new());
        id
    }

    /// Record the edge `u -- v`.
    ///
    /// The caller must already know the segment is free. Fails without
    /// touching the graph on self edges, duplicates, or endpoints farther
    /// apart than the neighborhood threshold.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        assert!(self.contains(u) && self.contains(v), "edge endpoint {} or {} not in roadmap", u, v);

        if u == v || self.edge_exists(u, v) {
            return false;
        }

        let weight = self.metric.distance(&self.nodes[u.0].config, &self.nodes[v.0].config);
        if weight > self.neighbor_threshold {
            return false;
        }

        self.adjacency[u.0].push(Adjacent { node: v, weight });
        self.adjacency[v.0].push(Adjacent { node: u, weight });
        self.edge_count += 1;
        true
    }

    pub fn edge_exists(&self, u: NodeId, v: NodeId) -> bool {
        match self.adjacency.get(v.0) {
            Some(adjacent) => adjacent.iter().any(|a| a.node == u),
            None => false,
        }
    }

    /// Nodes within the neighborhood threshold of `id` that do not already
    /// share an edge with it, in insertion order.
    pub fn find_neighbors(&self, id: NodeId) -> Vec<NodeId> {
        if self.nodes.len() < 2 {
            return Vec::new();
        }
        let query = match self.node(id) {
            Some(node) => &node.config,
            None => return Vec::new(),
        };

        self.nodes
            .iter()
            .filter(|n| n.id != id && !self.edge_exists(id, n.id))
            .filter(|n| self.metric.distance(query, &n.config) <= self.neighbor_threshold)
            .map(|n| n.id)
            .collect()
    }

    /// A* search with the metric distance to `goal` as heuristic.
    ///
    /// Stops as soon as `goal` is expanded, which is exact only because edge
    /// weights come from the same metric (the heuristic is consistent).
    /// Equal priorities are expanded in insertion order.
    pub fn find_path_heuristic(&self, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let n = self.nodes.len();
        let mut cost = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<NodeId>> = vec![None; n];
        let mut closed = vec![false; n];
        let mut open = BinaryHeap::new();
        let mut pushed = 0usize;

        cost[start.0] = 0.0;
        open.push(Reverse((OrderedFloat(self.heuristic(start, goal)), pushed, start)));

        while let Some(Reverse((_, _, current))) = open.pop() {
            if closed[current.0] {
                continue;
            }
            if current == goal {
                return Some(Self::trace_parents(&parent, goal));
            }
            closed[current.0] = true;

            for adj in &self.adjacency[current.0] {
                if closed[adj.node.0] {
                    continue;
                }
                let tentative = cost[current.0] + adj.weight;
                if tentative < cost[adj.node.0] {
                    cost[adj.node.0] = tentative;
                    parent[adj.node.0] = Some(current);
                    pushed += 1;
                    let priority = tentative + self.heuristic(adj.node, goal);
                    open.push(Reverse((OrderedFloat(priority), pushed, adj.node)));
                }
            }
        }

        None
    }

    /// Dijkstra shortest path by cumulative edge weight.
    pub fn find_path_uniform_cost(&self, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(start) || !self.contains(goal) {
            return None;
        }

        let (_, predecessor) = self.shortest_path_tree(start);

        // The chain from goal ends at a node that is its own predecessor:
        // the start when reachable, or goal itself otherwise.
        let mut path = vec![goal];
        let mut child = goal;
        while predecessor[child.0] != child {
            child = predecessor[child.0];
            path.push(child);
        }
        if child != start {
            return None;
        }

        path.reverse();
        Some(path)
    }

    /// Distance and predecessor maps of a full Dijkstra run from `source`.
    /// Unreached nodes have infinite distance and are their own predecessor.
    pub fn shortest_path_tree(&self, source: NodeId) -> (Vec<f64>, Vec<NodeId>) {
        let n = self.nodes.len();
        let mut dist = vec![f64::INFINITY; n];
        let mut predecessor: Vec<NodeId> = (0..n).map(NodeId).collect();
        let mut open = BinaryHeap::new();

        dist[source.0] = 0.0;
        open.push(Reverse((OrderedFloat(0.0), source)));

        while let Some(Reverse((OrderedFloat(d), current))) = open.pop() {
            if d > dist[current.0] {
                continue;
            }
            for adj in &self.adjacency[current.0] {
                let alt = d + adj.weight;
                if alt < dist[adj.node.0] {
                    dist[adj.node.0] = alt;
                    predecessor[adj.node.0] = current;
                    open.push(Reverse((OrderedFloat(alt), adj.node)));
                }
            }
        }

        (dist, predecessor)
    }

    fn heuristic(&self, node: NodeId, goal: NodeId) -> f64 {
        self.metric.distance(&self.nodes[node.0].config, &self.nodes[goal.0].config)
    }

    fn trace_parents(parent: &[Option<NodeId>], goal: NodeId) -> Vec<NodeId> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(p) = parent[current.0] {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    }

    /// Total edge weight along `path`, `None` if a hop is not an edge.
    pub fn path_cost(&self, path: &[NodeId]) -> Option<f64> {
        path.iter()
            .tuple_windows()
            .map(|(u, v)| self.edge_weight(*u, *v))
            .sum()
    }

    pub fn edge_weight(&self, u: NodeId, v: NodeId) -> Option<f64> {
        self.adjacency.get(u.0)?.iter().find(|a| a.node == v).map(|a| a.weight)
    }

    pub fn configs(&self, path: &[NodeId]) -> Vec<Configuration> {
        path.iter().map(|id| self.nodes[id.0].config.clone()).collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&RoadmapNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[RoadmapNode] {
        &self.nodes
    }

    pub fn neighbors_of(&self, id: NodeId) -> Vec<NodeId> {
        self.adjacency.get(id.0).map(|adj| adj.iter().map(|a| a.node).collect()).unwrap_or_default()
    }

    pub fn edges(&self) -> Vec<RoadmapEdge> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, adjacent)| {
                adjacent
                    .iter()
                    .filter(move |a| i < a.node.0)
                    .map(move |a| RoadmapEdge { a: NodeId(i), b: a.node, weight: a.weight })
            })
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn neighbor_threshold(&self) -> f64 {
        self.neighbor_threshold
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Write the roadmap in Graphviz format for offline inspection.
    pub fn write_dot<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "graph G {{")?;
        for node in &self.nodes {
            let values = node.config.as_slice().iter().map(|v| format!("{:.4}", v)).join(", ");
            writeln!(out, "{} [node_id={}, label=\"{}\"];", node.id, node.id, values)?;
        }
        for edge in self.edges() {
            writeln!(out, "{}--{} [edge_weight={}];", edge.a, edge.b, edge.weight)?;
        }
        writeln!(out, "}}")
    }
}
