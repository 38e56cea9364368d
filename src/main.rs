use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tabplot::cli::{Cli, Commands, Sink};
use tabplot::graph::Canvas;
use tabplot::palette;
use tabplot::runtime::{self, StreamSource};

fn main() {
    let cli = Cli::parse();

    let debug = cli.command.common().is_some_and(|c| c.debug);
    let default_level = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Ok(false) when at least one document failed
fn run(cli: Cli) -> Result<bool> {
    if let Commands::Colors { names } = cli.command {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for line in palette::color_listing(names) {
            writeln!(handle, "{}", line).context("Failed to write color list")?;
        }
        return Ok(true);
    }

    let Some(invocation) = cli.command.invocation() else {
        return Ok(true);
    };
    let invocation = invocation?;

    let mut output = open_sink(&invocation.output)?;
    let mut pass = invocation.pass.as_ref().map(open_sink).transpose()?;

    let canvas = Canvas::new(invocation.render.clone());
    let mut source = StreamSource::new(io::stdin().lock());
    let summary = runtime::run(
        &invocation.job,
        &mut source,
        &canvas,
        &mut output,
        pass.as_mut().map(|p| p as &mut dyn Write),
    )?;

    log::info!(
        "{} document(s): {} rendered, {} empty, {} failed",
        summary.documents,
        summary.rendered,
        summary.empty,
        summary.failed
    );
    Ok(summary.success())
}

fn open_sink(sink: &Sink) -> Result<Box<dyn Write>> {
    Ok(match sink {
        Sink::Stdout => Box::new(io::stdout().lock()),
        Sink::File(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
    })
}
