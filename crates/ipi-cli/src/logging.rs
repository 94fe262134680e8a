use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{Layer, filter::LevelFilter, fmt, prelude::*};

/// Maps `-v` repetitions and `-q` to the most verbose level that gets through.
fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
}

/// Plain-text layer for `--log-file`, with targets and thread ids for post-mortem reading.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file.map(File::create).transpose().map_err(CliError::Io)?;

    tracing_subscriber::registry()
        .with(level_for(verbosity, quiet))
        .with(console_layer())
        .with(file.map(file_layer))
        .init();

    Ok(())
}
