//! Touchpoint prioritizer library
//!
//! Classifies customer-journey touchpoints into importance/performance
//! quadrants and orders them into an improvement roadmap.
//!
//! ```
//! use touchpoint_prioritizer::domain::touchpoint::Touchpoint;
//! use touchpoint_prioritizer::domain::types::{Channel, Quadrant};
//! use touchpoint_prioritizer::services::classifier::{classify_catalog, Thresholds};
//! use touchpoint_prioritizer::services::roadmap::Roadmap;
//!
//! let catalog = vec![
//!     Touchpoint::new("TC-001", "Onboarding", Channel::Digital, 0.9, 0.2),
//!     Touchpoint::new("TC-002", "Support", Channel::Human, 0.5, 0.5),
//! ];
//! let classified = classify_catalog(&catalog, &Thresholds::default(), &[]).unwrap();
//! let roadmap = Roadmap::build(&classified);
//! assert_eq!(roadmap.items()[0].quadrant, Quadrant::FixFirst);
//! ```

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;
