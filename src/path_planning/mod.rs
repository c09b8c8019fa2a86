// Path Planning algorithms module

pub mod roadmap_graph;
pub mod incremental_tree;
pub mod prm;
pub mod sbl;

pub use roadmap_graph::*;
pub use incremental_tree::*;
pub use prm::*;
pub use sbl::*;
