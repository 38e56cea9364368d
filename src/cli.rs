// Command-line surface

use crate::command::PlotCommand;
use crate::config::{parse_delimiter, BinClosed, DocumentOptions, Params, SeriesFormat};
use crate::error::PlotError;
use crate::palette::ColorSpec;
use crate::parser::{color_arg, limits_arg};
use crate::runtime::Job;
use crate::{OutputFormat, RenderOptions};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tabplot", version)]
#[command(about = "Plot delimited tabular data read from stdin", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bar chart of labels (first series) and values (second series)
    #[command(visible_alias = "bar")]
    Barplot(BarArgs),
    /// Bar chart of how often each value of the first series occurs
    #[command(visible_alias = "c")]
    Count(BarArgs),
    /// Histogram of the first series
    #[command(visible_alias = "hist")]
    Histogram(HistogramArgs),
    /// Line plot of one series, or of x against y
    #[command(visible_alias = "line")]
    Lineplot(XyArgs),
    /// Several lines sharing one canvas
    #[command(visible_alias = "lines")]
    Lineplots(XyArgs),
    /// Scatter plot of one or more y series
    #[command(visible_alias = "s")]
    Scatter(XyArgs),
    /// Density plot of one or more y series
    #[command(visible_alias = "d")]
    Density(XyArgs),
    /// One box per series
    #[command(visible_alias = "box")]
    Boxplot(BoxArgs),
    /// List the named colors
    Colors {
        /// Print names only
        #[arg(long)]
        names: bool,
    },
}

/// Options every plot command accepts
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Field delimiter (a single byte)
    #[arg(short, long, default_value = "\t")]
    pub delimiter: String,

    /// Treat the first row (or first column with --transpose) as headers
    #[arg(short = 'H', long)]
    pub headers: bool,

    /// Read series from rows instead of columns
    #[arg(short = 'T', long)]
    pub transpose: bool,

    /// How x and y series are paired
    #[arg(long, value_enum, default_value_t = SeriesFormat::Xyy)]
    pub fmt: SeriesFormat,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(short, long)]
    pub xlabel: Option<String>,

    #[arg(short, long)]
    pub ylabel: Option<String>,

    /// Image width in pixels
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Border style; `none` hides axes and grid
    #[arg(short, long)]
    pub border: Option<String>,

    #[arg(short, long)]
    pub margin: Option<u32>,

    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Color name or palette index
    #[arg(short, long, value_parser = color_arg)]
    pub color: Option<ColorSpec>,

    /// Show tick labels
    #[arg(long, overrides_with = "no_labels")]
    pub labels: bool,

    /// Hide tick labels
    #[arg(long, overrides_with = "labels")]
    pub no_labels: bool,

    /// Write plot to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Re-emit the input to FILE, or to stdout without one
    #[arg(short = 'O', long = "pass", value_name = "FILE")]
    pub pass: Option<Option<PathBuf>>,

    /// Image format
    #[arg(long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// JSON file with default plot parameters
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose logging and a dump of the render plan
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args, Debug, Clone)]
pub struct BarArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Count occurrences of each value in the first series
    #[arg(short = 'C', long)]
    pub count: bool,

    #[arg(long)]
    pub symbol: Option<String>,

    #[arg(long)]
    pub xscale: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HistogramArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Number of bins
    #[arg(short, long)]
    pub nbins: Option<usize>,

    /// Closed side of each bin
    #[arg(long, value_enum)]
    pub closed: Option<BinClosed>,

    #[arg(long, value_parser = limits_arg, allow_hyphen_values = true)]
    pub xlim: Option<(f64, f64)>,

    #[arg(long)]
    pub symbol: Option<String>,

    #[arg(long)]
    pub xscale: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct XyArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// x axis limits as LOW,HIGH
    #[arg(long, value_parser = limits_arg, allow_hyphen_values = true)]
    pub xlim: Option<(f64, f64)>,

    /// y axis limits as LOW,HIGH
    #[arg(long, value_parser = limits_arg, allow_hyphen_values = true)]
    pub ylim: Option<(f64, f64)>,

    /// Draw grid lines (true or false)
    #[arg(long)]
    pub grid: Option<bool>,

    #[arg(long)]
    pub canvas: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BoxArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Value axis limits as LOW,HIGH
    #[arg(long, value_parser = limits_arg, allow_hyphen_values = true)]
    pub xlim: Option<(f64, f64)>,
}

/// Where the plot and the pass-through copy go
#[derive(Debug, Clone, PartialEq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
}

/// Fully resolved invocation of a plot command
#[derive(Debug, Clone)]
pub struct Invocation {
    pub job: Job,
    pub render: RenderOptions,
    pub output: Sink,
    pub pass: Option<Sink>,
}

impl CommonArgs {
    fn params(&self) -> Params {
        Params {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            border: self.border.clone(),
            margin: self.margin,
            padding: self.padding,
            color: self.color.clone(),
            xlabel: self.xlabel.clone(),
            ylabel: self.ylabel.clone(),
            labels: match (self.labels, self.no_labels) {
                (_, true) => Some(false),
                (true, false) => Some(true),
                _ => None,
            },
            ..Params::default()
        }
    }

    /// Build the process-wide settings. CLI values win over the config file.
    fn invocation(&self, command: PlotCommand, count: bool, specific: Params) -> Result<Invocation> {
        let delimiter = parse_delimiter(&self.delimiter)?;

        let mut params = self.params().or(specific);
        if let Some(path) = &self.config {
            params = params.or(Params::from_json_file(path)?);
        }

        let output = match &self.output {
            Some(path) => Sink::File(path.clone()),
            None => Sink::Stdout,
        };
        let pass = self.pass.as_ref().map(|target| match target {
            Some(path) => Sink::File(path.clone()),
            None => Sink::Stdout,
        });
        if output == Sink::Stdout && pass == Some(Sink::Stdout) {
            return Err(PlotError::config(
                "plot and pass-through cannot both go to stdout; use --output or give --pass a file",
            )
            .into());
        }

        Ok(Invocation {
            job: Job {
                command,
                document: DocumentOptions {
                    delimiter,
                    headers: self.headers,
                    transpose: self.transpose,
                    fmt: self.fmt,
                },
                params,
                count,
                debug: self.debug,
            },
            render: RenderOptions {
                format: self.format,
                ..RenderOptions::default()
            },
            output,
            pass,
        })
    }
}

impl Commands {
    /// Common flags of a plot command; `None` for `colors`
    pub fn common(&self) -> Option<&CommonArgs> {
        match self {
            Commands::Barplot(a) | Commands::Count(a) => Some(&a.common),
            Commands::Histogram(a) => Some(&a.common),
            Commands::Lineplot(a) | Commands::Lineplots(a) | Commands::Scatter(a) | Commands::Density(a) => {
                Some(&a.common)
            }
            Commands::Boxplot(a) => Some(&a.common),
            Commands::Colors { .. } => None,
        }
    }

    /// Resolve a plot command into its invocation; `None` for `colors`
    pub fn invocation(&self) -> Option<Result<Invocation>> {
        let (command, common, count, specific) = match self {
            Commands::Barplot(a) => (PlotCommand::Bar, &a.common, a.count, bar_params(a)),
            Commands::Count(a) => (PlotCommand::Count, &a.common, true, bar_params(a)),
            Commands::Histogram(a) => (
                PlotCommand::Histogram,
                &a.common,
                false,
                Params {
                    nbins: a.nbins,
                    closed: a.closed,
                    xlim: a.xlim,
                    symbol: a.symbol.clone(),
                    xscale: a.xscale.clone(),
                    ..Params::default()
                },
            ),
            Commands::Lineplot(a) => (PlotCommand::Line, &a.common, false, xy_params(a)),
            Commands::Lineplots(a) => (PlotCommand::Lines, &a.common, false, xy_params(a)),
            Commands::Scatter(a) => (PlotCommand::Scatter, &a.common, false, xy_params(a)),
            Commands::Density(a) => (PlotCommand::Density, &a.common, false, xy_params(a)),
            Commands::Boxplot(a) => (
                PlotCommand::Boxplot,
                &a.common,
                false,
                Params {
                    xlim: a.xlim,
                    ..Params::default()
                },
            ),
            Commands::Colors { .. } => return None,
        };
        Some(common.invocation(command, count, specific))
    }
}

fn bar_params(a: &BarArgs) -> Params {
    Params {
        symbol: a.symbol.clone(),
        xscale: a.xscale.clone(),
        ..Params::default()
    }
}

fn xy_params(a: &XyArgs) -> Params {
    Params {
        xlim: a.xlim,
        ylim: a.ylim,
        grid: a.grid,
        canvas: a.canvas.clone(),
        ..Params::default()
    }
}
