// The closed set of plot commands

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Every plot the tool can build from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotCommand {
    Bar,
    Count,
    Histogram,
    Line,
    Lines,
    Scatter,
    Density,
    Boxplot,
}

impl PlotCommand {
    pub const ALL: [PlotCommand; 8] = [
        PlotCommand::Bar,
        PlotCommand::Count,
        PlotCommand::Histogram,
        PlotCommand::Line,
        PlotCommand::Lines,
        PlotCommand::Scatter,
        PlotCommand::Density,
        PlotCommand::Boxplot,
    ];

    /// Canonical name followed by accepted aliases
    pub fn names(self) -> &'static [&'static str] {
        match self {
            PlotCommand::Bar => &["barplot", "bar"],
            PlotCommand::Count => &["count", "c"],
            PlotCommand::Histogram => &["histogram", "hist"],
            PlotCommand::Line => &["lineplot", "line"],
            PlotCommand::Lines => &["lineplots", "lines"],
            PlotCommand::Scatter => &["scatter", "s"],
            PlotCommand::Density => &["density", "d"],
            PlotCommand::Boxplot => &["boxplot", "box"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    /// Bar and count tally the first series when counting is on
    pub fn counts_by_default(self) -> bool {
        matches!(self, PlotCommand::Count)
    }
}

impl fmt::Display for PlotCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotCommand::ALL
            .into_iter()
            .find(|c| c.names().contains(&s))
            .ok_or_else(|| format!("unrecognized command '{}'", s))
    }
}
