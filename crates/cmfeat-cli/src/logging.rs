use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing::Subscriber;
use tracing_subscriber::{
    Layer, filter::LevelFilter, fmt, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Warnings by default; each `-v` steps down to INFO, DEBUG and then TRACE.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
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
        .with_target(false)
        .compact()
}

/// Plain-text log file; records thread ids because featurization runs on the
/// rayon pool.
fn file_layer<S>(path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = File::create(path)?;
    Ok(fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let file = log_file.map(file_layer).transpose()?;

    tracing_subscriber::registry()
        .with(level_filter(verbosity, quiet))
        .with(console_layer())
        .with(file)
        .try_init()
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use serial_test::serial;
    use tracing::{debug, info, trace};
    use tracing_subscriber::Registry;

    #[test]
    fn verbosity_maps_to_level() {
        assert_eq!(level_filter(0, false), LevelFilter::WARN);
        assert_eq!(level_filter(1, false), LevelFilter::INFO);
        assert_eq!(level_filter(2, false), LevelFilter::DEBUG);
        assert_eq!(level_filter(9, false), LevelFilter::TRACE);
        assert_eq!(level_filter(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn log_file_gets_thread_ids_and_respects_level() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("featurize.log");

        let subscriber = tracing_subscriber::registry()
            .with(level_filter(2, false))
            .with(file_layer(&log_path).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            info!(molecules = 3, "Featurizing batch.");
            debug!("Built 3 Coulomb matrices.");
            trace!("Dropped at DEBUG.");
        });

        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("Featurizing batch."));
        assert!(content.contains("molecules=3"));
        assert!(content.contains("Built 3 Coulomb matrices."));
        assert!(!content.contains("Dropped at DEBUG."));
        assert!(content.contains("ThreadId"));
    }

    #[test]
    fn unwritable_log_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = file_layer::<Registry>(dir.path());
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    #[serial]
    fn global_subscriber_installs_once() {
        assert!(setup_logging(1, false, None).is_ok());
        assert!(matches!(
            setup_logging(1, false, None),
            Err(CliError::Other(_))
        ));
    }
}
