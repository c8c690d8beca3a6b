//! Domain models - touchpoints, scales, quadrants and errors
//!
//! This module contains the canonical data types used throughout the system:
//! - `Touchpoint` - a customer-interaction point with normalized scores
//! - `RawTouchpoint` - a research record before normalization
//! - `ClassifiedTouchpoint` - a touchpoint with its quadrant and priority
//! - `Quadrant`, `Channel`, `Scale` - classification vocabulary
//! - `AssessmentError` - validation failures

pub mod error;
pub mod touchpoint;
pub mod types;

// Re-export commonly used types at module level
pub use error::{AssessmentError, Location};
pub use touchpoint::{ClassifiedTouchpoint, RawScore, RawTouchpoint, Touchpoint};
pub use types::{Axis, Channel, Quadrant, Scale, Stage, TouchpointId};
