use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::listing::LISTING_STALE_DISCARDED_TOTAL;
use crate::application::session::SESSION_REJECTED_TOTAL;
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;
use super::http::API_REQUESTS_TOTAL;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber writing to stderr.
///
/// Stdout is left to command output.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
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
            API_REQUESTS_TOTAL,
            Unit::Count,
            "Total number of Post-API and login requests, by method and outcome."
        );
        describe_counter!(
            SESSION_REJECTED_TOTAL,
            Unit::Count,
            "Total number of sessions cleared because the server rejected the token."
        );
        describe_counter!(
            LISTING_STALE_DISCARDED_TOTAL,
            Unit::Count,
            "Total number of listing results dropped because a newer fetch superseded them."
        );
    });
}
