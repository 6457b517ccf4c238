//! Load phase metrics: object uploads to the transformed and raw buckets.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct LoadMetrics;

impl LoadMetrics {
    pub fn record_upload(bytes: u64) {
        ::metrics::counter!(phase_metric!(counter, "load", "objects_uploaded")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "load", "upload_bytes")).record(bytes as f64);
    }

    pub fn record_upload_error() {
        ::metrics::counter!(phase_metric!(counter, "load", "upload_errors")).increment(1);
    }

    pub fn record_relocated() {
        ::metrics::counter!(phase_metric!(counter, "load", "artifacts_relocated")).increment(1);
    }
}

impl PhaseMetrics for LoadMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "load", "objects_uploaded"));
        let _ = counter!(phase_metric!(counter, "load", "upload_errors"));
        let _ = counter!(phase_metric!(counter, "load", "artifacts_relocated"));
        let _ = histogram!(phase_metric!(histogram, "load", "upload_bytes"));
    }

    fn phase_name() -> &'static str {
        "load"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "load", "objects_uploaded"),
                metric_type: MetricType::Counter,
                help: "Objects written to remote storage",
            },
            MetricDoc {
                name: phase_metric!(counter, "load", "upload_errors"),
                metric_type: MetricType::Counter,
                help: "Failed object writes",
            },
            MetricDoc {
                name: phase_metric!(counter, "load", "artifacts_relocated"),
                metric_type: MetricType::Counter,
                help: "Raw artifacts moved to the raw bucket and removed locally",
            },
            MetricDoc {
                name: phase_metric!(histogram, "load", "upload_bytes"),
                metric_type: MetricType::Histogram,
                help: "Size of uploaded objects",
            },
        ]
    }
}
