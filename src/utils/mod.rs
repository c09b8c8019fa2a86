//! Reference collaborators and plotting utilities for prm_planning

pub mod metric;
pub mod obstacles;
pub mod sampler;
pub mod visualization;

pub use metric::*;
pub use obstacles::*;
pub use sampler::*;
pub use visualization::{Visualizer, PathStyle, colors};
