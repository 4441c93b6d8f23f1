//! Tracing setup for orgfit binaries.
//!
//! stdout carries JSON results, so logs never go there: they go to stderr, or to a daily
//! rotated file under `ORGFIT_LOG_DIR`. Every event of an invocation sits inside a
//! [`run_span`] carrying the run ID that also stamps shortlist entries.

use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `ORGFIT_LOG_DIR`
    pub log_dir: Option<PathBuf>,
    /// `ORGFIT_LOG_INCLUDE_BACKTRACE`
    pub include_backtrace: bool,
    /// Used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            include_backtrace: false,
            default_filter: "info".into(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_dir: lookup("ORGFIT_LOG_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            include_backtrace: lookup("ORGFIT_LOG_INCLUDE_BACKTRACE")
                .is_some_and(|value| value == "1" || value.eq_ignore_ascii_case("true")),
            ..Self::default()
        }
    }
}

pub fn log_file_name(app_name: &str) -> String {
    format!("{app_name}.log")
}

/// Route panics through `tracing`. Installed once per process; later calls are no-ops.
pub fn install_tracing_panic_hook(app_name: &'static str, config: &LoggingConfig) {
    static INSTALLED: OnceLock<()> = OnceLock::new();
    let include_backtrace = config.include_backtrace;

    INSTALLED.get_or_init(|| {
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()));
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload not string".into());

            tracing::error!(
                application = app_name,
                location = location.as_deref().unwrap_or("unknown"),
                panic_message = %message,
                "panic captured"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn rotating_file_writer(app_name: &str, dir: &PathBuf) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(dir) {
        eprintln!("failed to create {} ({err}); logging to stderr", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, log_file_name(app_name));
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(non_blocking))
}

/// Install the global subscriber. Filtering follows `RUST_LOG`.
pub fn init_tracing_subscriber(app_name: &'static str, config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match config
        .log_dir
        .as_ref()
        .and_then(|dir| rotating_file_writer(app_name, dir))
    {
        Some(writer) => {
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
}

/// Root span of one invocation. Enter it right after [`init_tracing_subscriber`].
pub fn run_span(app_name: &'static str, run_id: &str) -> Span {
    tracing::info_span!("run", application = app_name, run_id = %run_id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn config_defaults_to_stderr_without_backtrace() {
        let config = LoggingConfig::from_lookup(lookup(&[]));
        assert_eq!(config, LoggingConfig::default());
    }

    #[test]
    fn config_reads_log_dir_and_backtrace_flag() {
        let config = LoggingConfig::from_lookup(lookup(&[
            ("ORGFIT_LOG_DIR", "/var/log/orgfit"),
            ("ORGFIT_LOG_INCLUDE_BACKTRACE", "TRUE"),
        ]));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/orgfit")));
        assert!(config.include_backtrace);

        let blank = LoggingConfig::from_lookup(lookup(&[
            ("ORGFIT_LOG_DIR", "  "),
            ("ORGFIT_LOG_INCLUDE_BACKTRACE", "no"),
        ]));
        assert_eq!(blank.log_dir, None);
        assert!(!blank.include_backtrace);
    }

    #[test]
    fn log_file_is_named_after_the_app() {
        assert_eq!(log_file_name("orgfit"), "orgfit.log");
    }

    #[test]
    fn run_span_is_recorded_under_a_subscriber() {
        let subscriber = tracing_subscriber::registry();
        tracing::subscriber::with_default(subscriber, || {
            let span = run_span("orgfit", "01HZY5D8V2Q1N6X7J3K4M5P6R7");
            assert!(!span.is_disabled());
            assert_eq!(span.metadata().map(|m| m.name()), Some("run"));
        });
    }
}
