// Render plan handed from the assembler to the renderer

use crate::coerce::Series;
use crate::config::Params;
use serde::Serialize;

/// What the renderer draws for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Bar,
    Histogram,
    Line,
    Scatter,
    Density,
    Boxplot,
}

/// The first call of a plan sets up the canvas; the rest draw onto it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Overlay,
}

/// Concrete data of one call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CallData {
    /// Labelled bar lengths
    Bars { labels: Vec<String>, values: Vec<f64> },
    /// Raw observations to be binned
    Values { values: Vec<f64> },
    /// Aligned x/y series; a point is drawn only where both are present
    Xy { x: Series, y: Series },
    /// One box of a box plot
    Distribution { label: String, values: Vec<f64> },
}

/// One plot-construction call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderCall {
    pub kind: PlotKind,
    pub role: Role,
    pub data: CallData,
    pub params: Params,
}

impl RenderCall {
    pub fn primary(kind: PlotKind, data: CallData, params: Params) -> Self {
        Self {
            kind,
            role: Role::Primary,
            data,
            params,
        }
    }

    pub fn overlay(kind: PlotKind, data: CallData, name: Option<String>) -> Self {
        Self {
            kind,
            role: Role::Overlay,
            data,
            params: Params {
                name,
                ..Params::default()
            },
        }
    }
}
