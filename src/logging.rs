//! Tracing subscriber setup: stdout plus an optional daily-rotated log file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{LogFormat, LoggingConfig};

/// Keeps the non-blocking writers alive. Dropping it flushes and stops them,
/// so `main` must hold it for the lifetime of the process.
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

fn fmt_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_writer(writer).boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer().with_ansi(ansi).with_writer(writer).boxed(),
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init(cfg: &LoggingConfig) -> anyhow::Result<LogGuards> {
    let mut guards = Vec::with_capacity(2);
    let mut layers: Vec<BoxedLayer> = Vec::with_capacity(2);

    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);
    layers.push(fmt_layer(cfg.format, stdout_nb, true));

    if let Some(dir) = &cfg.directory {
        std::fs::create_dir_all(dir)?;
        let file_appender = tracing_appender::rolling::daily(dir, "mftracker.log");
        let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
        guards.push(file_guard);
        layers.push(fmt_layer(cfg.format, file_nb, false));
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    tracing_subscriber::registry().with(layers).with(env_filter).try_init()?;

    Ok(LogGuards { _guards: guards })
}
