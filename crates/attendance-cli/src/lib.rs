//! CLI library components for the attendance report generator.

pub mod logging;
pub mod pipeline;
