//! OpenTelemetry tracer provider setup.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};

use crate::config::observability::ObservabilityConfig;

use super::ObservabilityError;

pub(super) fn build_tracer_provider(
    config: &ObservabilityConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let resource = Resource::builder_empty()
        .with_service_name(config.otel_service_name.clone())
        .with_attributes([
            KeyValue::new("service.version", config.otel_service_version.clone()),
            KeyValue::new(
                "deployment.environment.name",
                config.otel_deployment_environment.clone(),
            ),
        ])
        .build();

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otel_exporter_otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(
            config.otel_exporter_otlp_timeout_seconds,
        ))
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            sample_ratio(config.otel_trace_sample_ratio),
        ))))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build())
}

fn sample_ratio(configured: f64) -> f64 {
    if configured.is_nan() {
        return 1.0;
    }

    configured.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::sample_ratio;

    #[test]
    fn sample_ratios_are_clamped_to_a_probability() {
        assert!((sample_ratio(1.5) - 1.0).abs() < f64::EPSILON);
        assert!(sample_ratio(-0.5).abs() < f64::EPSILON);
        assert!((sample_ratio(0.25) - 0.25).abs() < f64::EPSILON);
        assert!((sample_ratio(f64::NAN) - 1.0).abs() < f64::EPSILON);
    }
}
