//! Common types, traits, and error definitions for prm_planning
//!
//! This module provides the foundational building blocks shared by the
//! roadmap and tree planners.

pub mod types;
pub mod traits;
pub mod error;
pub mod events;
pub mod params;

pub use types::*;
pub use traits::*;
pub use error::*;
pub use events::*;
pub use params::*;
