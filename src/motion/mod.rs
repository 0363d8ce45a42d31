//! Motion module for pitilt.
//!
//! Provides step planning and the per-axis motion engine.

mod engine;
mod plan;

pub use engine::AxisDriver;
pub use plan::{Direction, StepPlan};
