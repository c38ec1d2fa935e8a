//! Detection candidates and their suppression.
//!
//! Holds the detection value types and the greedy merge that removes
//! duplicates across detector outputs.

pub mod detection;
pub mod merge;
