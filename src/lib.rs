//! Responsive masonry layout engine.
//!
//! Given a container width, a breakpoint-target width and an ordered list of
//! items (span + rendered height), the engine picks the active breakpoint,
//! derives column geometry and packs every item into the shortest column run.
//! DOM attachment, event observation and style writing stay with the host,
//! which talks to the engine through the traits in [`controller`].

pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;

pub use config::{BreakpointConfig, BreakpointTarget, GlobalLimits, GridSpec, MasonryConfig};
pub use controller::{
    ControllerOptions, ImageState, ItemProvider, LayoutController, LayoutHost,
    MeasurementProvider, PositioningMode, StyleSink, Trigger, WatchPlan,
};
pub use error::{MasonryError, Result};
pub use geometry::{Measurement, Placement};
pub use layout::{
    AdaptiveLayout, BreakpointTable, ColumnPlan, ColumnPlanner, ItemDescriptor, LayoutResult,
    PackingEngine, PlanStrategy, Span, derive_adaptive_layout, find_slot,
};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use registry::{StyleDecl, StyleRegistry, StyleTarget};
pub use render::{CssRenderer, CssSink, RendererSettings};
