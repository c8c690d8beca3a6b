//! Services - scoring, classification and reporting
//!
//! - `normalizer` - Raw ratings onto the [0,1] axes
//! - `classifier` - Quadrant assignment, sequential or chunked across threads
//! - `roadmap` - Ordered improvement list
//! - `journey_synthesis` - Per-stage rollup
//! - `store` - Copy-on-write touchpoint catalog
//! - `assessment` - Orchestrates a full run

pub mod assessment;
pub mod classifier;
pub mod journey_synthesis;
pub mod normalizer;
pub mod roadmap;
pub mod store;

pub use assessment::{Assessment, Assessor};
pub use classifier::Thresholds;
pub use normalizer::Normalizer;
pub use roadmap::Roadmap;
pub use store::TouchpointStore;
