//! Narrative generation over an aggregated record.

pub mod adapter;
pub mod error;
pub mod generator;
pub mod prose;
