use std::io::{self, Stderr};

use tracing_subscriber::{fmt, layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::config::LoggingConfig;

/// Слой форматирования: JSON или человекочитаемый, в stderr.
pub fn build_formatter_from_config<S>(config: &LoggingConfig) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let writer: fn() -> Stderr = io::stderr;

    if config.json {
        let layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(config.with_target);
        Box::new(layer)
    } else {
        let layer = fmt::layer()
            .with_writer(writer)
            .with_ansi(config.ansi)
            .with_target(config.with_target);
        Box::new(layer)
    }
}
