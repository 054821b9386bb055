use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("failed to open log file: {0}")]
	Io(#[from] std::io::Error),
	#[error("invalid log filter: {0}")]
	Filter(#[from] tracing_subscriber::filter::ParseError),
	#[error("failed to install subscriber: {0}")]
	Init(#[from] tracing_subscriber::util::TryInitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
	Stderr,
	Discard,
}

/// `RUST_LOG` overrides `filter`. A log file takes precedence over
/// `fallback`.
pub fn init_logging(filter: &str, log_file: Option<&Path>, fallback: LogTarget) -> Result<(), LoggingError> {
	let filter = match EnvFilter::try_from_default_env() {
		Ok(filter) => filter,
		Err(_) => EnvFilter::try_new(filter)?,
	};

	let writer = match log_file {
		Some(path) => {
			let file = OpenOptions::new().create(true).append(true).open(path)?;
			BoxMakeWriter::new(Mutex::new(file))
		}
		None => match fallback {
			LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
			LogTarget::Discard => BoxMakeWriter::new(std::io::sink),
		},
	};

	tracing_subscriber::registry()
		.with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(log_file.is_none()))
		.with(filter)
		.try_init()?;

	Ok(())
}
