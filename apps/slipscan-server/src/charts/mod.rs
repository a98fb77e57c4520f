//! Comparison charts
//!
//! One bar chart and one pie chart per numeric column of the attribute
//! table. Each chart is returned as an encoded PNG together with the data
//! it plots, so callers can report labels and percentages alongside the
//! image URL.

mod font;
pub mod palette;
mod render;

use image::DynamicImage;
use serde::Serialize;
use thiserror::Error;

use crate::extraction::NumericSeries;
use crate::imaging;

pub use render::{BAR_CANVAS, PIE_CANVAS};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("No values to plot for {0}")]
    EmptySeries(String),

    #[error("Values for {0} sum to zero")]
    ZeroTotal(String),

    #[error("Failed to load chart font: {0}")]
    Font(String),

    #[error("Failed to encode chart: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

impl ChartKind {
    /// Storage folder for this kind
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Bar => "bar_charts",
            Self::Pie => "pie_charts",
        }
    }
}

/// Object key for a chart under a request prefix
pub fn chart_key(prefix: &str, kind: ChartKind, column: &str) -> String {
    format!("{}/{}/{}_comparison.png", prefix, kind.folder(), column)
}

pub fn chart_title(column: &str) -> String {
    format!("{} Comparison", column)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarPoint {
    pub label: String,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<BarPoint>,
}

impl BarChart {
    pub fn from_series(series: &NumericSeries) -> Result<Self, ChartError> {
        if series.points.is_empty() {
            return Err(ChartError::EmptySeries(series.column.clone()));
        }

        Ok(Self {
            title: chart_title(&series.column),
            x_label: "Images".to_string(),
            y_label: series.column.clone(),
            points: series
                .points
                .iter()
                .map(|(label, value)| BarPoint {
                    label: label.clone(),
                    value: *value,
                })
                .collect(),
        })
    }

    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.value).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub percent: f64,
    /// Percentage as printed on the slice, e.g. `25.0%`
    pub percent_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn from_series(series: &NumericSeries) -> Result<Self, ChartError> {
        if series.points.is_empty() {
            return Err(ChartError::EmptySeries(series.column.clone()));
        }

        let total: u128 = series.points.iter().map(|(_, v)| *v as u128).sum();
        if total == 0 {
            return Err(ChartError::ZeroTotal(series.column.clone()));
        }

        let slices = series
            .points
            .iter()
            .map(|(label, value)| {
                let percent = *value as f64 / total as f64 * 100.0;
                PieSlice {
                    label: label.clone(),
                    value: *value,
                    percent,
                    percent_label: format!("{:.1}%", percent),
                }
            })
            .collect();

        Ok(Self {
            title: chart_title(&series.column),
            slices,
        })
    }

    pub fn percentages(&self) -> Vec<f64> {
        self.slices.iter().map(|s| s.percent).collect()
    }
}

/// One plotted value as reported to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
}

/// A rendered chart
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    pub column: String,
    pub kind: ChartKind,
    pub png: Vec<u8>,
    pub points: Vec<ChartPoint>,
}

pub fn render_bar(series: &NumericSeries) -> Result<ChartArtifact, ChartError> {
    let chart = BarChart::from_series(series)?;
    let png = encode(render::draw_bar(&chart)?)?;

    Ok(ChartArtifact {
        column: series.column.clone(),
        kind: ChartKind::Bar,
        png,
        points: chart
            .points
            .into_iter()
            .map(|p| ChartPoint {
                label: p.label,
                value: p.value,
                percent: None,
            })
            .collect(),
    })
}

pub fn render_pie(series: &NumericSeries) -> Result<ChartArtifact, ChartError> {
    let chart = PieChart::from_series(series)?;
    let png = encode(render::draw_pie(&chart)?)?;

    Ok(ChartArtifact {
        column: series.column.clone(),
        kind: ChartKind::Pie,
        png,
        points: chart
            .slices
            .into_iter()
            .map(|s| ChartPoint {
                label: s.label,
                value: s.value,
                percent: Some(s.percent),
            })
            .collect(),
    })
}

fn encode(img: image::RgbImage) -> Result<Vec<u8>, ChartError> {
    imaging::encode_png(&DynamicImage::ImageRgb8(img)).map_err(|e| ChartError::Encode(e.to_string()))
}
