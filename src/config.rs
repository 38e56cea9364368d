// Plot parameters and per-document processing options

use crate::error::PlotError;
use crate::palette::ColorSpec;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which side of a histogram bin is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BinClosed {
    #[default]
    Left,
    Right,
}

/// How multi-series commands pair up x and y series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SeriesFormat {
    /// Series 0 is the x axis shared by every following y series
    #[default]
    Xyy,
    /// Series come in (x, y) pairs
    Xyxy,
}

/// User-facing plot parameters.
///
/// Every field is optional; `None` means "let the renderer decide". The
/// assembler fills some of them from headers, but only on a copy and only
/// where the user left them unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylabel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<BinClosed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canvas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xlim: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ylim: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Params {
    /// Load parameters from a JSON object on disk
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Field-wise union; values already set on `self` win
    pub fn or(self, fallback: Params) -> Params {
        Params {
            title: self.title.or(fallback.title),
            width: self.width.or(fallback.width),
            height: self.height.or(fallback.height),
            border: self.border.or(fallback.border),
            margin: self.margin.or(fallback.margin),
            padding: self.padding.or(fallback.padding),
            color: self.color.or(fallback.color),
            xlabel: self.xlabel.or(fallback.xlabel),
            ylabel: self.ylabel.or(fallback.ylabel),
            labels: self.labels.or(fallback.labels),
            symbol: self.symbol.or(fallback.symbol),
            xscale: self.xscale.or(fallback.xscale),
            nbins: self.nbins.or(fallback.nbins),
            closed: self.closed.or(fallback.closed),
            canvas: self.canvas.or(fallback.canvas),
            xlim: self.xlim.or(fallback.xlim),
            ylim: self.ylim.or(fallback.ylim),
            grid: self.grid.or(fallback.grid),
            name: self.name.or(fallback.name),
        }
    }

    /// Names of set fields this renderer does not draw with
    pub fn unused_by_renderer(&self) -> Vec<&'static str> {
        let mut unused = Vec::new();
        if self.symbol.is_some() {
            unused.push("symbol");
        }
        if self.canvas.is_some() {
            unused.push("canvas");
        }
        if self.padding.is_some() {
            unused.push("padding");
        }
        if self.xscale.is_some() {
            unused.push("xscale");
        }
        unused
    }
}

/// Options that control how a document is read, independent of the plot
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentOptions {
    pub delimiter: u8,
    pub headers: bool,
    pub transpose: bool,
    pub fmt: SeriesFormat,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            headers: false,
            transpose: false,
            fmt: SeriesFormat::Xyy,
        }
    }
}

/// Validate a delimiter option: it must be exactly one byte
pub fn parse_delimiter(value: &str) -> Result<u8, PlotError> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(PlotError::config(format!(
            "delimiter must be a single byte, got '{}'",
            value.escape_default()
        ))),
    }
}
