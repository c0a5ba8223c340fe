use std::sync::Once;

use metrics::{Unit, describe_counter};
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
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    // Rendered HTML and feeds go to stdout, so logs stay on stderr.
    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(std::io::stderr)
            .compact()
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
            "atelier_render_blocks_skipped_total",
            Unit::Count,
            "Total number of portable-text blocks skipped as unsupported."
        );
        describe_counter!(
            "atelier_cms_fetch_total",
            Unit::Count,
            "Total number of CMS queries issued, labelled by query."
        );
        describe_counter!(
            "atelier_cms_fetch_failed_total",
            Unit::Count,
            "Total number of CMS queries that failed, labelled by query."
        );
        describe_counter!(
            "atelier_cms_records_skipped_total",
            Unit::Count,
            "Total number of CMS list records dropped because they failed to decode."
        );
    });
}
