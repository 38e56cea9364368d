// Document loop: read, plan, render, pass through

use crate::assemble::{assemble, PlotRequest};
use crate::command::PlotCommand;
use crate::config::{DocumentOptions, Params};
use crate::error::PlotError;
use crate::graph::Renderer;
use crate::ir::RenderCall;
use crate::normalize::{normalize, Orientation};
use crate::table::parse_table;
use anyhow::{Context, Result};
use std::io::{self, Read, Write};

/// Process-wide settings; never modified once the loop starts
#[derive(Debug, Clone)]
pub struct Job {
    pub command: PlotCommand,
    pub document: DocumentOptions,
    pub params: Params,
    pub count: bool,
    pub debug: bool,
}

/// Yields whole documents until the input is exhausted
pub trait DocumentSource {
    fn next_document(&mut self) -> io::Result<Option<Vec<u8>>>;
}

/// Reads everything up to end of stream as one document
pub struct StreamSource<R> {
    reader: R,
}

impl<R: Read> StreamSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> DocumentSource for StreamSource<R> {
    fn next_document(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        Ok(if bytes.is_empty() { None } else { Some(bytes) })
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub documents: usize,
    pub rendered: usize,
    pub empty: usize,
    pub failed: usize,
}

impl Summary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Turn one document's bytes into a render plan
pub fn plan_document(job: &Job, bytes: &[u8]) -> Result<Vec<RenderCall>, PlotError> {
    let text = std::str::from_utf8(bytes).map_err(|e| PlotError::Parse {
        line: line_of(bytes, e.valid_up_to()),
        message: "input is not valid UTF-8".to_string(),
    })?;

    let table = parse_table(text, job.document.delimiter)?;
    let normalized = normalize(
        table,
        job.document.headers,
        Orientation::from_transpose(job.document.transpose),
    );
    if normalized.is_empty() {
        return Err(PlotError::EmptyDocument);
    }
    log::debug!(
        "document has {} series{}",
        normalized.series.len(),
        if normalized.headers.is_some() { " with headers" } else { "" }
    );

    let request = PlotRequest {
        command: job.command,
        series: normalized.series,
        headers: normalized.headers,
        params: job.params.clone(),
        count: job.count || job.command.counts_by_default(),
        fmt: job.document.fmt,
    };
    assemble(&request)
}

/// 1-based line containing byte `offset`
fn line_of(bytes: &[u8], offset: usize) -> u64 {
    bytes[..offset].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}

/// Run every document from `source` through the pipeline.
///
/// Document-level failures are logged and counted; only I/O failures on
/// the sinks abort the loop.
pub fn run<S, R>(
    job: &Job,
    source: &mut S,
    renderer: &R,
    output: &mut dyn Write,
    mut pass: Option<&mut dyn Write>,
) -> Result<Summary>
where
    S: DocumentSource + ?Sized,
    R: Renderer + ?Sized,
{
    let mut summary = Summary::default();

    while let Some(bytes) = source.next_document().context("Failed to read input")? {
        summary.documents += 1;
        log::info!("document {}: {} bytes", summary.documents, bytes.len());

        match render_document(job, renderer, &bytes) {
            Ok(image) => {
                output.write_all(&image).context("Failed to write plot")?;
                output.flush().context("Failed to flush plot output")?;
                summary.rendered += 1;
            }
            Err(e) if is_empty_document(&e) => {
                log::warn!("document {}: {}", summary.documents, e);
                summary.empty += 1;
            }
            Err(e) => {
                log::error!("document {}: {:#}", summary.documents, e);
                summary.failed += 1;
            }
        }

        if let Some(sink) = pass.as_mut() {
            sink.write_all(&bytes).context("Failed to write pass-through")?;
            sink.flush().context("Failed to flush pass-through")?;
        }
    }

    if summary.documents == 0 {
        log::info!("no input");
    }
    Ok(summary)
}

fn render_document<R>(job: &Job, renderer: &R, bytes: &[u8]) -> Result<Vec<u8>>
where
    R: Renderer + ?Sized,
{
    let calls = plan_document(job, bytes)?;
    if job.debug {
        match serde_json::to_string_pretty(&calls) {
            Ok(json) => log::debug!("render plan:\n{}", json),
            Err(e) => log::warn!("could not serialize render plan: {}", e),
        }
    }
    renderer.render(&calls).context("Failed to render plot")
}

fn is_empty_document(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<PlotError>(), Some(PlotError::EmptyDocument))
}
