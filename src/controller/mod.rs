//! Orchestrates measure → resolve → plan → pack → apply against a host.
//!
//! The controller holds only immutable configuration. Event wiring (DOM
//! ready, image loads, resize observers) belongs to the host's dispatch
//! layer, which calls [`LayoutController::relayout`] for every notification.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde_json::{Value, json};

use crate::config::{BreakpointTarget, MasonryConfig};
use crate::error::{MasonryError, Result};
use crate::geometry::Measurement;
use crate::layout::{
    BreakpointTable, ColumnPlan, ColumnPlanner, ItemDescriptor, LayoutResult, PackingEngine,
};
use crate::logging::{LogLevel, Logger, json_kv};
use crate::metrics::LayoutMetrics;

mod host;

pub use host::{
    ImageState, ItemProvider, LayoutHost, MeasurementProvider, PositioningMode, StyleSink,
};

const LOG_TARGET: &str = "masonry::controller";

/// Why a pass was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Initial,
    DomReady,
    ImageLoaded,
    Resize,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::DomReady => "dom_ready",
            Self::ImageLoaded => "image_loaded",
            Self::Resize => "resize",
            Self::Manual => "manual",
        }
    }
}

/// Optional observability wiring.
#[derive(Clone)]
pub struct ControllerOptions {
    pub logger: Option<Logger>,
    pub metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    /// Target used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_target: "masonry::metrics".to_string(),
        }
    }
}

impl ControllerOptions {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Notifications the dispatch layer must forward as triggers after
/// [`LayoutController::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchPlan {
    pub dom_ready: bool,
    /// Indices (in container order) of images still loading.
    pub pending_images: Vec<usize>,
    pub observe_container: bool,
    /// Number of items whose size changes must trigger a pass.
    pub observed_items: usize,
}

pub struct LayoutController {
    config: MasonryConfig,
    table: BreakpointTable,
    planner: ColumnPlanner,
    packer: PackingEngine,
    target: BreakpointTarget,
    options: ControllerOptions,
    started: Instant,
}

impl LayoutController {
    /// Validate the configuration and bind the host's anchors.
    ///
    /// A missing container is fatal; a missing breakpoint target falls back
    /// to the viewport.
    pub fn attach<H>(config: MasonryConfig, host: &mut H, options: ControllerOptions) -> Result<Self>
    where
        H: LayoutHost + ?Sized,
    {
        config.validate()?;
        if !host.bind_container(&config.container_selector) {
            return Err(MasonryError::ContainerNotFound(
                config.container_selector.clone(),
            ));
        }

        let mut controller = Self {
            table: BreakpointTable::new(config.breakpoints.clone()),
            planner: ColumnPlanner::new(config.limits()),
            packer: PackingEngine::new(),
            target: config.breakpoint_target.clone(),
            config,
            options,
            started: Instant::now(),
        };

        if !host.bind_target(&controller.target) {
            controller.log(
                LogLevel::Warn,
                "breakpoint_target_missing",
                vec![json_kv("target", describe_target(&controller.target))],
            );
            controller.target = BreakpointTarget::Viewport;
            host.bind_target(&controller.target);
        }

        let items = host.bind_items(&controller.config.item_selector);
        controller.log_debug("attached", || {
            let thresholds: Vec<f64> = controller
                .table
                .configs()
                .iter()
                .map(|config| config.threshold)
                .collect();
            vec![
                json_kv("items", json!(items)),
                json_kv("breakpoints", json!(thresholds)),
            ]
        });

        Ok(controller)
    }

    pub fn config(&self) -> &MasonryConfig {
        &self.config
    }

    pub fn breakpoints(&self) -> &BreakpointTable {
        &self.table
    }

    /// Breakpoint target in effect after fallback.
    pub fn target(&self) -> &BreakpointTarget {
        &self.target
    }

    pub fn positioning_mode(&self) -> PositioningMode {
        PositioningMode::from_flag(self.config.apply_positioning_mode)
    }

    /// First pass plus one pass per already-loaded image, then mark the
    /// container initialized.
    pub fn initialize<H>(&self, host: &mut H) -> Result<WatchPlan>
    where
        H: LayoutHost + ?Sized,
    {
        self.relayout(host, Trigger::Initial)?;

        let mut pending_images = Vec::new();
        for (index, state) in host.image_states().into_iter().enumerate() {
            match state {
                ImageState::Complete => {
                    self.relayout(host, Trigger::ImageLoaded)?;
                }
                ImageState::Pending => pending_images.push(index),
            }
        }

        host.mark_initialized()?;

        let plan = WatchPlan {
            dom_ready: true,
            pending_images,
            observe_container: true,
            observed_items: host.item_count(),
        };
        self.log(
            LogLevel::Info,
            "initialized",
            vec![
                json_kv("items", json!(plan.observed_items)),
                json_kv("pending_images", json!(plan.pending_images.len())),
            ],
        );
        Ok(plan)
    }

    /// Full recomputation from the host's current state.
    pub fn relayout<H>(&self, host: &mut H, trigger: Trigger) -> Result<LayoutResult>
    where
        H: LayoutHost + ?Sized,
    {
        let measurement = host.measure();
        let plan = self.plan(measurement);

        let result = if plan.is_active() {
            let spans: Vec<u32> = (0..host.item_count())
                .map(|index| host.declared_span(index).get())
                .collect();
            let widths: Vec<f64> = spans
                .iter()
                .map(|span| plan.width_for_span(*span).unwrap_or_default())
                .collect();
            host.presize(&widths)?;

            // Heights depend on the widths just written, so read them afterwards.
            let items: Vec<ItemDescriptor> = spans
                .iter()
                .enumerate()
                .map(|(index, span)| ItemDescriptor::new(*span, host.measured_height(index)))
                .collect();
            self.packer.pack(&plan, &items)
        } else {
            LayoutResult::Reset
        };

        let changed = host.apply(&result, self.positioning_mode())?;
        self.record_pass(&result, changed);
        self.log_debug("relayout", || {
            vec![
                json_kv("trigger", trigger.as_str()),
                json_kv("reset", result.is_reset()),
                json_kv("items", json!(result.placements().len())),
                json_kv("container_height", json!(result.container_height())),
                json_kv("changed", json!(changed)),
            ]
        });
        Ok(result)
    }

    /// Host-free pipeline for callers that already hold measured items.
    pub fn compute(&self, measurement: Measurement, items: &[ItemDescriptor]) -> LayoutResult {
        self.packer.pack(&self.plan(measurement), items)
    }

    /// One pass per trigger, in order; returns the last result.
    pub fn run_scripted<H, I>(&self, host: &mut H, triggers: I) -> Result<Option<LayoutResult>>
    where
        H: LayoutHost + ?Sized,
        I: IntoIterator<Item = Trigger>,
    {
        let mut last = None;
        for trigger in triggers {
            last = Some(self.relayout(host, trigger)?);
        }
        Ok(last)
    }

    /// Log a metrics snapshot if both a logger and metrics are configured.
    pub fn emit_metrics(&self) {
        if let (Some(logger), Some(metrics)) =
            (self.options.logger.as_ref(), self.options.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let event = guard
                    .snapshot(self.started.elapsed())
                    .to_log_event(&self.options.metrics_target);
                let _ = logger.log_event(event);
            }
        }
    }

    fn plan(&self, measurement: Measurement) -> ColumnPlan {
        self.log_debug("measured", || {
            vec![
                json_kv("container_width", measurement.container_width),
                json_kv("target_width", measurement.target_width),
            ]
        });

        let active = self.table.resolve(measurement.target_width);
        self.log_debug("breakpoint_resolved", || {
            vec![json_kv("threshold", json!(active.map(|c| c.threshold)))]
        });

        let plan = self.planner.plan(active, measurement.container_width);
        self.log_debug("column_plan", || {
            vec![
                json_kv("strategy", plan.strategy.as_str()),
                json_kv("columns", json!(plan.column_count)),
                json_kv("gap_horizontal", plan.horizontal_gap),
                json_kv("gap_vertical", plan.vertical_gap),
                json_kv("widths", json!(plan.column_widths)),
            ]
        });
        plan
    }

    fn record_pass(&self, result: &LayoutResult, changed: usize) {
        let Some(metrics) = self.options.metrics.as_ref() else {
            return;
        };
        if let Ok(mut guard) = metrics.lock() {
            match result {
                LayoutResult::Reset => guard.record_reset(),
                LayoutResult::Placed { items, .. } => guard.record_placed(items.len()),
            }
            if changed == 0 {
                guard.record_apply_skipped();
            }
        }
    }

    fn log_debug<F>(&self, message: &str, fields: F)
    where
        F: FnOnce() -> Vec<(String, Value)>,
    {
        if self.config.debug_logging {
            self.log(LogLevel::Debug, message, fields());
        }
    }

    fn log(&self, level: LogLevel, message: &str, fields: Vec<(String, Value)>) {
        if let Some(logger) = self.options.logger.as_ref() {
            let _ = logger.log_with_fields(level, LOG_TARGET, message, fields.into_iter().collect());
        }
    }
}

fn describe_target(target: &BreakpointTarget) -> Value {
    match target {
        BreakpointTarget::Viewport => json!("viewport"),
        BreakpointTarget::Selector(selector) => json!(selector),
    }
}
