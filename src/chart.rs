// Chart Renderers - figure specifications consumed by Plotly.js
//
// A Figure is plain data (traces + layout). The browser hands it to
// Plotly.react unchanged, so field names follow the Plotly JSON schema.

use crate::aggregate::{DailySales, LabeledSales, SubCategoryPoints};
use chrono::NaiveDate;
use serde::Serialize;

/// Paper colour used when the scatter background is toggled on
pub const LIGHT_GREY: &str = "lightgrey";

// ============================================================================
// FIGURE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    /// Used for both line series and point clouds; `mode` tells them apart
    Scatter(XyTrace),
    Bar(XyTrace),
    Pie(PieTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XyTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,

    pub x: AxisValues,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

/// X values: calendar dates, category labels or plain numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AxisValues {
    Dates(Vec<NaiveDate>),
    Labels(Vec<String>),
    Numbers(Vec<f64>),
}

impl AxisValues {
    pub fn len(&self) -> usize {
        match self {
            AxisValues::Dates(v) => v.len(),
            AxisValues::Labels(v) => v.len(),
            AxisValues::Numbers(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,

    /// None keeps the plotting library's default background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Title { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangeslider: Option<RangeSlider>,
}

impl Axis {
    fn titled(text: &str) -> Self {
        Axis {
            title: Title::new(text),
            rangeslider: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: Title,
}

// ============================================================================
// BACKGROUND
// ============================================================================

/// Scatter background; flips on every click of the toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Default,
    LightGrey,
}

impl Background {
    /// Odd click counts select light grey; only parity matters
    pub fn from_clicks(n_clicks: u64) -> Self {
        if n_clicks % 2 == 1 {
            Background::LightGrey
        } else {
            Background::Default
        }
    }

    fn paper_color(self) -> Option<String> {
        match self {
            Background::Default => None,
            Background::LightGrey => Some(LIGHT_GREY.to_string()),
        }
    }
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Figure {
    /// Number of data points across all traces
    pub fn point_count(&self) -> usize {
        self.data
            .iter()
            .map(|trace| match trace {
                Trace::Scatter(t) | Trace::Bar(t) => t.x.len(),
                Trace::Pie(p) => p.labels.len(),
            })
            .sum()
    }

    /// Summed sales over time, with a range slider on the date axis
    pub fn line(title: &str, series: &[DailySales]) -> Figure {
        let trace = XyTrace {
            name: None,
            mode: Some(TraceMode::Lines),
            x: AxisValues::Dates(series.iter().map(|p| p.date).collect()),
            y: series.iter().map(|p| p.sales).collect(),
        };

        Figure {
            data: vec![Trace::Scatter(trace)],
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: Some(Axis {
                    title: Title::new("Order Date"),
                    rangeslider: Some(RangeSlider { visible: true }),
                }),
                yaxis: Some(Axis::titled("Sales")),
                legend: None,
                paper_bgcolor: None,
            },
        }
    }

    /// One bar per category
    pub fn bar(title: &str, bars: &[LabeledSales]) -> Figure {
        let trace = XyTrace {
            name: None,
            mode: None,
            x: AxisValues::Labels(bars.iter().map(|b| b.label.clone()).collect()),
            y: bars.iter().map(|b| b.sales).collect(),
        };

        Figure {
            data: vec![Trace::Bar(trace)],
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: Some(Axis::titled("Category")),
                yaxis: Some(Axis::titled("Sales")),
                legend: None,
                paper_bgcolor: None,
            },
        }
    }

    /// One slice per label; values are already summed
    pub fn pie(title: &str, slices: &[LabeledSales]) -> Figure {
        let trace = PieTrace {
            labels: slices.iter().map(|s| s.label.clone()).collect(),
            values: slices.iter().map(|s| s.sales).collect(),
        };

        Figure {
            data: vec![Trace::Pie(trace)],
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: None,
                yaxis: None,
                legend: None,
                paper_bgcolor: None,
            },
        }
    }

    /// Sales vs profit point cloud, one coloured trace per sub-category
    pub fn scatter(title: &str, groups: &[SubCategoryPoints], background: Background) -> Figure {
        let data = groups
            .iter()
            .map(|g| {
                Trace::Scatter(XyTrace {
                    name: Some(g.sub_category.clone()),
                    mode: Some(TraceMode::Markers),
                    x: AxisValues::Numbers(g.sales.clone()),
                    y: g.profit.clone(),
                })
            })
            .collect();

        Figure {
            data,
            layout: FigureLayout {
                title: Title::new(title),
                xaxis: Some(Axis::titled("Sales")),
                yaxis: Some(Axis::titled("Profit")),
                legend: Some(Legend {
                    title: Title::new("Sub-Category"),
                }),
                paper_bgcolor: background.paper_color(),
            },
        }
    }
}
