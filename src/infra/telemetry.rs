use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr; stdout carries rendered listings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "postdeck_feed_request_total",
            Unit::Count,
            "Total number of read API requests, by endpoint and outcome."
        );
        describe_histogram!(
            "postdeck_feed_request_ms",
            Unit::Milliseconds,
            "Read API request latency in milliseconds."
        );
        describe_counter!(
            "postdeck_search_scheduled_total",
            Unit::Count,
            "Total number of search timers scheduled."
        );
        describe_counter!(
            "postdeck_search_cancelled_total",
            Unit::Count,
            "Total number of search timers cancelled before firing."
        );
        describe_counter!(
            "postdeck_search_fired_total",
            Unit::Count,
            "Total number of search timers that fired a request."
        );
    });
}
