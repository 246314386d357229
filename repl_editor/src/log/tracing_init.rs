// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic as _;
use tracing::dispatcher;
use tracing_core::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt as _, registry::LookupSpan,
                         util::SubscriberInitExt as _};

use super::{DisplayPreference, TracingConfig, WriterConfig};
use crate::log::rolling_file_appender_impl;

/// Avoid gnarly type annotations by using a macro to create the `fmt` layer.
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
    };
}

/// Type alias for a boxed layer.
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// Installs the global subscriber for `tracing_config`. Does nothing for
/// [`WriterConfig::None`].
///
/// # Errors
///
/// Returns an error if the log file can't be opened, or if a global subscriber is
/// already installed.
pub fn try_initialize_logging_global(tracing_config: TracingConfig) -> miette::Result<()> {
    if tracing_config.writer_config == WriterConfig::None {
        return Ok(());
    }
    let layers = try_create_layers(tracing_config)?;
    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .into_diagnostic()
}

/// Installs the subscriber for the current thread only, until the returned guard is
/// dropped. Handy in tests.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_initialize_logging_thread_local(
    tracing_config: TracingConfig,
) -> miette::Result<dispatcher::DefaultGuard> {
    let layers = try_create_layers(tracing_config)?;
    Ok(tracing_subscriber::registry().with(layers).set_default())
}

/// The level filter, then a layer per writer in the config.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_create_layers(
    tracing_config: TracingConfig,
) -> miette::Result<Vec<Box<DynLayer<tracing_subscriber::Registry>>>> {
    let level_filter = tracing_config.get_level_filter();
    let writer_config = tracing_config.get_writer_config();

    let mut return_it: Vec<Box<DynLayer<tracing_subscriber::Registry>>> =
        vec![Box::new(level_filter)];
    if let Some(layer) = try_create_display_layer(level_filter, &writer_config) {
        return_it.push(layer);
    }
    if let Some(layer) = try_create_file_layer(level_filter, &writer_config)? {
        return_it.push(layer);
    }
    Ok(return_it)
}

/// This erases the concrete type of the writer, and returns a boxed layer.
pub fn try_create_display_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> Option<Box<DynLayer<S>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();
    match writer_config {
        WriterConfig::Display(preference) | WriterConfig::DisplayAndFile(preference, _) => {
            let layer: Box<DynLayer<S>> = match preference {
                DisplayPreference::Stdout => Box::new(
                    fmt_layer
                        .with_writer(std::io::stdout)
                        .with_filter(level_filter),
                ),
                DisplayPreference::Stderr => Box::new(
                    fmt_layer
                        .with_writer(std::io::stderr)
                        .with_filter(level_filter),
                ),
            };
            Some(layer)
        }
        WriterConfig::None | WriterConfig::File(_) => None,
    }
}

/// This erases the concrete type of the writer, and returns a boxed layer.
///
/// # Errors
///
/// Returns an error if the log file can't be opened.
pub fn try_create_file_layer<S>(
    level_filter: LevelFilter,
    writer_config: &WriterConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let fmt_layer = create_fmt!();
    Ok(match writer_config {
        WriterConfig::File(file_path) | WriterConfig::DisplayAndFile(_, file_path) => {
            let file = rolling_file_appender_impl::try_create(file_path)?;
            let layer: Box<DynLayer<S>> =
                Box::new(fmt_layer.with_writer(file).with_filter(level_filter));
            Some(layer)
        }
        WriterConfig::None | WriterConfig::Display(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn temp_log_file(dir: &tempfile::TempDir) -> String {
        dir.path().join("test.log").to_str().unwrap().to_string()
    }

    #[test]
    fn test_layers_per_writer() {
        let dir = tempfile::tempdir().unwrap();

        let config = TracingConfig::new_display(DisplayPreference::Stderr, LevelFilter::DEBUG);
        pretty_assertions::assert_eq!(try_create_layers(config).unwrap().len(), 2);

        let config = TracingConfig {
            writer_config: WriterConfig::DisplayAndFile(
                DisplayPreference::Stdout,
                temp_log_file(&dir),
            ),
            level_filter: LevelFilter::DEBUG,
        };
        pretty_assertions::assert_eq!(try_create_layers(config).unwrap().len(), 3);

        let config = TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
        };
        pretty_assertions::assert_eq!(try_create_layers(config).unwrap().len(), 1);
    }

    #[test]
    fn test_file_logging_thread_local() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = temp_log_file(&dir);
        let config = TracingConfig::new_file(Some(file_path.clone()), LevelFilter::INFO);
        {
            let _guard = try_initialize_logging_thread_local(config).unwrap();
            tracing::info!(message = "hello from the editor");
            tracing::debug!(message = "filtered out");
        }
        let content = std::fs::read_to_string(&file_path).unwrap();
        assert!(content.contains("hello from the editor"));
        assert!(!content.contains("filtered out"));
    }

    #[test]
    #[serial]
    fn test_none_writer_installs_nothing() {
        let config = TracingConfig {
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
        };
        assert!(try_initialize_logging_global(config).is_ok());
    }
}
