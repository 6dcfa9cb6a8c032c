//! Source-specific extractors producing the canonical [`DataModel`](crate::DataModel).
//!
//! Extractors fully build the per-table grouping before anything is emitted.

pub mod redcap;
pub mod relational;
