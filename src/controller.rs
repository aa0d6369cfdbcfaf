// Reactive Controller - four pure bindings + event dispatcher
//
// Every binding maps control value(s) to exactly one figure and reads the
// shared table only. The dispatcher owns the event → handler mapping; no UI
// framework is involved.

use crate::aggregate::{points_by_sub_category, sales_by_category, sales_by_date, sales_by_segment};
use crate::chart::{Background, Figure};
use crate::dataset::TransactionTable;
use crate::layout::{
    Control, DashboardLayout, BAR_GRAPH, BG_BUTTON, CATEGORY_RADIO, DATE_RANGE, LINE_GRAPH,
    PIE_GRAPH, REGION_DROPDOWN, SCATTER_GRAPH,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

pub const LINE_TITLE: &str = "Ventas en el tiempo";
pub const SCATTER_TITLE: &str = "Ventas vs Ganancias";

// ============================================================================
// BINDINGS
// ============================================================================

/// Summed sales per order date within [start, end]
pub fn update_line(table: &TransactionTable, start: NaiveDate, end: NaiveDate) -> Figure {
    let series = sales_by_date(table, start, end);
    Figure::line(LINE_TITLE, &series)
}

/// Summed sales per category for one region
pub fn update_bar(table: &TransactionTable, region: &str) -> Figure {
    let bars = sales_by_category(table, region);
    Figure::bar(&format!("Ventas por Categoría - Región {}", region), &bars)
}

/// Sales per customer segment for one category (summed per segment)
pub fn update_pie(table: &TransactionTable, category: &str) -> Figure {
    let slices = sales_by_segment(table, category);
    Figure::pie(&format!("Segmentos - {}", category), &slices)
}

/// Profit vs sales for every record; background follows click parity
pub fn update_scatter(table: &TransactionTable, n_clicks: u64) -> Figure {
    let groups = points_by_sub_category(table);
    Figure::scatter(SCATTER_TITLE, &groups, Background::from_clicks(n_clicks))
}

// ============================================================================
// EVENTS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("no binding for event '{0}'")]
    UnknownEvent(String),

    #[error("invalid value for '{event}': {reason}")]
    InvalidValue { event: String, reason: String },
}

/// Value carried by a control event, as the browser sends it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ControlValue {
    Clicks(u64),
    Selection(String),
    DateRange { start_date: String, end_date: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlEvent {
    pub event: String,
    pub value: ControlValue,
}

impl ControlEvent {
    pub fn new(event: impl Into<String>, value: ControlValue) -> Self {
        ControlEvent {
            event: event.into(),
            value,
        }
    }

    /// The event a control emits for its current (initial) value
    pub fn from_control(control: &Control) -> Self {
        let value = match control {
            Control::DateRange {
                start_date,
                end_date,
                ..
            } => ControlValue::DateRange {
                start_date: start_date.to_string(),
                end_date: end_date.to_string(),
            },
            Control::Dropdown { value, .. } | Control::RadioItems { value, .. } => {
                ControlValue::Selection(value.clone())
            }
            Control::Button { n_clicks, .. } => ControlValue::Clicks(*n_clicks),
        };
        ControlEvent::new(control.id(), value)
    }
}

/// New figure for one graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub output: String,
    pub figure: Figure,
}

/// Date pickers send either `YYYY-MM-DD` or an ISO datetime
pub fn parse_control_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

// ============================================================================
// DISPATCHER
// ============================================================================

type Handler = fn(&TransactionTable, &ControlValue) -> Result<Figure, BindingError>;

#[derive(Clone, Copy)]
struct Binding {
    output: &'static str,
    handler: Handler,
}

fn invalid(event: &str, reason: impl Into<String>) -> BindingError {
    BindingError::InvalidValue {
        event: event.to_string(),
        reason: reason.into(),
    }
}

fn on_date_range(table: &TransactionTable, value: &ControlValue) -> Result<Figure, BindingError> {
    match value {
        ControlValue::DateRange {
            start_date,
            end_date,
        } => {
            let start = parse_control_date(start_date)
                .ok_or_else(|| invalid(DATE_RANGE, format!("bad start_date '{}'", start_date)))?;
            let end = parse_control_date(end_date)
                .ok_or_else(|| invalid(DATE_RANGE, format!("bad end_date '{}'", end_date)))?;
            Ok(update_line(table, start, end))
        }
        _ => Err(invalid(DATE_RANGE, "expected {start_date, end_date}")),
    }
}

fn on_region(table: &TransactionTable, value: &ControlValue) -> Result<Figure, BindingError> {
    match value {
        ControlValue::Selection(region) => Ok(update_bar(table, region)),
        _ => Err(invalid(REGION_DROPDOWN, "expected a region name")),
    }
}

fn on_category(table: &TransactionTable, value: &ControlValue) -> Result<Figure, BindingError> {
    match value {
        ControlValue::Selection(category) => Ok(update_pie(table, category)),
        _ => Err(invalid(CATEGORY_RADIO, "expected a category name")),
    }
}

fn on_background_click(table: &TransactionTable, value: &ControlValue) -> Result<Figure, BindingError> {
    match value {
        ControlValue::Clicks(n_clicks) => Ok(update_scatter(table, *n_clicks)),
        _ => Err(invalid(BG_BUTTON, "expected a click count")),
    }
}

/// Routes named control events to their binding over one shared table
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<TransactionTable>,
    bindings: HashMap<&'static str, Binding>,
}

impl Dispatcher {
    pub fn new(table: Arc<TransactionTable>) -> Self {
        let bindings = HashMap::from([
            (DATE_RANGE, Binding { output: LINE_GRAPH, handler: on_date_range as Handler }),
            (REGION_DROPDOWN, Binding { output: BAR_GRAPH, handler: on_region as Handler }),
            (CATEGORY_RADIO, Binding { output: PIE_GRAPH, handler: on_category as Handler }),
            (BG_BUTTON, Binding { output: SCATTER_GRAPH, handler: on_background_click as Handler }),
        ]);

        Self { table, bindings }
    }

    pub fn table(&self) -> &TransactionTable {
        &self.table
    }

    /// Event ids this dispatcher answers, sorted
    pub fn events(&self) -> Vec<&'static str> {
        let mut events: Vec<&'static str> = self.bindings.keys().copied().collect();
        events.sort_unstable();
        events
    }

    /// Graph id an event re-renders
    pub fn output_for(&self, event: &str) -> Option<&'static str> {
        self.bindings.get(event).map(|b| b.output)
    }

    fn binding(&self, event: &str) -> Result<Binding, BindingError> {
        self.bindings
            .get(event)
            .copied()
            .ok_or_else(|| BindingError::UnknownEvent(event.to_string()))
    }

    fn render(&self, event: &str, binding: Binding, value: &ControlValue) -> Result<ChartUpdate, BindingError> {
        let figure = (binding.handler)(&self.table, value)?;

        debug!(
            event = %event,
            output = binding.output,
            points = figure.point_count(),
            "rendered chart"
        );

        Ok(ChartUpdate {
            output: binding.output.to_string(),
            figure,
        })
    }

    pub fn dispatch(&self, event: &ControlEvent) -> Result<ChartUpdate, BindingError> {
        let binding = self.binding(&event.event)?;
        self.render(&event.event, binding, &event.value)
    }

    /// Like `dispatch`, for a value still in raw JSON form. The event is
    /// resolved first, so an unknown event is reported whatever the value.
    pub fn dispatch_json(&self, event: &str, value: serde_json::Value) -> Result<ChartUpdate, BindingError> {
        let binding = self.binding(event)?;
        let value: ControlValue =
            serde_json::from_value(value).map_err(|e| invalid(event, e.to_string()))?;
        self.render(event, binding, &value)
    }

    /// Render every graph from the layout's initial control values.
    /// A failing binding yields its own error and leaves the others intact.
    pub fn initial_updates(&self, layout: &DashboardLayout) -> Vec<Result<ChartUpdate, BindingError>> {
        layout
            .panels()
            .map(|panel| {
                let event = ControlEvent::from_control(&panel.control);
                let result = self.dispatch(&event);
                if let Err(e) = &result {
                    warn!(graph = %panel.graph_id, error = %e, "initial render failed");
                }
                result
            })
            .collect()
    }
}
