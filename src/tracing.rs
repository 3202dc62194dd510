use time::{format_description, UtcOffset};
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const VAR_NAME: &str = "TRACE";

// Timestamps in local time, to 5 sub-second digits.
fn local_timer() -> OffsetTime<Vec<format_description::BorrowedFormatItem<'static>>> {
    let time_format =
        format_description::parse("[hour]:[minute]:[second].[subsecond digits:5]")
            .unwrap_or_default();
    let time_offset =
        crate::util::date::local_utc_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(time_offset, time_format)
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// Nothing is logged unless TRACE is set. It takes EnvFilter directives:
///
///   TRACE=debug                                  everything at debug
///   TRACE=brokerage_qif::brokerage::action=debug the classifier only
///   TRACE=info,brokerage_qif::qif=trace          writer at trace
///
/// See the tracing_subscriber EnvFilter docs for the full syntax.
pub fn setup_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_env(VAR_NAME))
        .with_timer(local_timer())
        .finish();

    // Only the first call in a process installs anything. Tests call this
    // once per run.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Adds a directive to TRACE. Has no effect after setup_tracing.
pub fn enable_trace_env(directive: &str) {
    let value = match std::env::var(VAR_NAME) {
        Ok(existing) if !existing.is_empty() => format!("{existing},{directive}"),
        _ => directive.to_string(),
    };
    std::env::set_var(VAR_NAME, value);
}
