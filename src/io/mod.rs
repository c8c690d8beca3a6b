//! IO modules - catalog files in, roadmap reports out
//!
//! - `catalog` - Raw touchpoint import (JSON array or JSONL)
//! - `egress` - Roadmap output to file (JSONL format)

pub mod catalog;
pub mod egress;

pub use catalog::load_raw_records;
pub use egress::ReportEgress;
