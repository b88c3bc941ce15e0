//! Logging facility.
//!
//! The subscriber is installed once per process by [`init`]. Everything an
//! invocation logs goes through the [`InvocationLog`] handed to each
//! component when it is built, so log lines are scoped to the invocation that
//! produced them rather than to whatever span happens to be current.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_PRODUCTION_FILTER: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// JSON lines on stderr, info level unless `RUST_LOG` says otherwise
    Production,
    /// No output
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = |default: &str| {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
        };

        let installed = match profile {
            Profile::Production => tracing_subscriber::registry()
                .with(filter(DEFAULT_PRODUCTION_FILTER))
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(false)
                        .with_ansi(false)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };

        if let Err(e) = installed {
            eprintln!("logging already initialized: {}", e);
        }
    });
}

/// Per-invocation logging handle.
///
/// Cloning is cheap; every clone refers to the same span.
#[derive(Debug, Clone)]
pub struct InvocationLog {
    span: Span,
}

impl InvocationLog {
    pub fn new(function: &'static str, request_id: &str) -> Self {
        let span = tracing::info_span!(
            "invocation",
            function,
            request_id = %request_id,
            org = tracing::field::Empty
        );
        Self { span }
    }

    /// Handle whose events are not attached to any invocation.
    pub fn detached() -> Self {
        Self { span: Span::none() }
    }

    pub fn record_org(&self, org: &str) {
        self.span.record("org", org);
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for InvocationLog {
    fn default() -> Self {
        Self::detached()
    }
}
