//! Transform phase metrics. Row and column counts of the normalized dataset
//! are the monitoring signal downstream consumers alert on.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct TransformMetrics;

impl TransformMetrics {
    pub fn record_chunk(rows_read: usize, rows_dropped: usize) {
        ::metrics::counter!(phase_metric!(counter, "transform", "chunks_processed")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "transform", "rows_read")).increment(rows_read as u64);
        ::metrics::counter!(phase_metric!(counter, "transform", "rows_dropped"))
            .increment(rows_dropped as u64);
    }

    pub fn record_output_shape(rows: usize, columns: usize) {
        ::metrics::gauge!(phase_metric!(gauge, "transform", "output_rows")).set(rows as f64);
        ::metrics::gauge!(phase_metric!(gauge, "transform", "output_columns")).set(columns as f64);
    }

    pub fn record_schema_error() {
        ::metrics::counter!(phase_metric!(counter, "transform", "schema_errors")).increment(1);
    }

    pub fn record_duration(secs: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "transform", "duration_seconds")).record(secs);
    }
}

impl PhaseMetrics for TransformMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge, histogram};

        let _ = counter!(phase_metric!(counter, "transform", "chunks_processed"));
        let _ = counter!(phase_metric!(counter, "transform", "rows_read"));
        let _ = counter!(phase_metric!(counter, "transform", "rows_dropped"));
        let _ = counter!(phase_metric!(counter, "transform", "schema_errors"));
        let _ = gauge!(phase_metric!(gauge, "transform", "output_rows"));
        let _ = gauge!(phase_metric!(gauge, "transform", "output_columns"));
        let _ = histogram!(phase_metric!(histogram, "transform", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "transform"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "transform", "chunks_processed"),
                metric_type: MetricType::Counter,
                help: "Artifact chunks normalized",
            },
            MetricDoc {
                name: phase_metric!(counter, "transform", "rows_read"),
                metric_type: MetricType::Counter,
                help: "Rows read back from the local raw artifact",
            },
            MetricDoc {
                name: phase_metric!(counter, "transform", "rows_dropped"),
                metric_type: MetricType::Counter,
                help: "Rows dropped for a missing required value",
            },
            MetricDoc {
                name: phase_metric!(counter, "transform", "schema_errors"),
                metric_type: MetricType::Counter,
                help: "Runs aborted on a missing column or unparseable date",
            },
            MetricDoc {
                name: phase_metric!(gauge, "transform", "output_rows"),
                metric_type: MetricType::Gauge,
                help: "Rows in the last normalized dataset",
            },
            MetricDoc {
                name: phase_metric!(gauge, "transform", "output_columns"),
                metric_type: MetricType::Gauge,
                help: "Columns in the last normalized dataset",
            },
            MetricDoc {
                name: phase_metric!(histogram, "transform", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of the transform step",
            },
        ]
    }
}
