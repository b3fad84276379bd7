//! Layout computation: breakpoint cascade, column planning and packing.
//!
//! Every pass is a pure function of the configuration and the current
//! measurements; none of these types carry state between passes.

mod breakpoints;
mod packing;
mod planner;

pub use breakpoints::BreakpointTable;
pub use packing::{ItemDescriptor, LayoutResult, PackingEngine, Span, find_slot};
pub use planner::{
    AdaptiveLayout, ColumnPlan, ColumnPlanner, PlanStrategy, clamp_span, derive_adaptive_layout,
};
