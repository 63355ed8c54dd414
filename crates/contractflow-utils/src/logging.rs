//! Logging and observability infrastructure for contractflow
//!
//! Structured logging via `tracing`. Library crates only emit events; the
//! binary (or an embedding application) decides whether to install a
//! subscriber through [`init_tracing`].

use std::io::IsTerminal;
use tracing::{Level, info, span, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Filter directives used when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "contractflow=debug,info"
    } else {
        "contractflow=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// Honours `RUST_LOG` when present. Otherwise uses [`default_filter`].
/// Verbose mode adds targets and span close events to each line.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(use_color())
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .compact();

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                layer
                    .with_target(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.with_target(false))
            .try_init()?;
    }

    Ok(())
}

/// Span covering all operations on one open project workspace.
pub fn workspace_span(project_id: &str) -> tracing::Span {
    span!(Level::INFO, "workspace", project_id = %project_id)
}

/// Log a completed workflow transition.
pub fn log_transition(kind: &str, from: &str, to: &str) {
    info!(kind = %kind, from = %from, to = %to, "Workflow transition");
}

/// Log a refused workflow transition.
pub fn log_refused_transition(kind: &str, from: &str, reason: &str) {
    warn!(kind = %kind, from = %from, reason = %reason, "Workflow transition refused");
}
