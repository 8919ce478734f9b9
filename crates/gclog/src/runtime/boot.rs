//! Boot: logging init, config load, one parse, JSON report.

use std::fs::File;
use std::io::{self, BufReader, Write};

use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::cli::Cli;
use crate::conf::ReaderConfig;
use crate::error::{GcLogError, GcLogResult};
use crate::model::ModelSummary;
use crate::parser::metrics::MetricsSnapshot;
use crate::parser::{GcFormat, TracingSink, WarningSink};
use crate::reader::GcLogReader;

/// Initialise the tracing / logging subsystem. Logs go to stderr so the
/// report on stdout stays machine-readable.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gclog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[derive(Debug, Serialize)]
struct Report {
    summary: ModelSummary,
    warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<MetricsSnapshot>,
}

/// Resolve configuration from the CLI, parse the log, print the report.
pub fn run(cli: Cli) -> GcLogResult<()> {
    let mut config = ReaderConfig::load(cli.config.as_deref())?;
    if let Some(format) = &cli.format {
        config.format = Some(format.parse::<GcFormat>().map_err(GcLogError::Config)?);
    }
    info!(
        "Reader configuration: format={:?}, detection_sample_size={}, max_line_size={}",
        config.format, config.detection_sample_size, config.max_line_size
    );

    let file = File::open(&cli.log).map_err(|e| {
        error!("Failed to open {}: {}", cli.log.display(), e);
        e
    })?;

    let mut reader = GcLogReader::new(config, TracingSink::new());
    let model = reader.read(BufReader::new(file))?;

    let warnings = reader.sink().count();
    if warnings > 0 {
        warn!("{} line(s) in {} could not be parsed", warnings, cli.log.display());
    }

    let report = Report {
        summary: model.summary(),
        warnings,
        metrics: cli.metrics.then(|| reader.metrics()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
