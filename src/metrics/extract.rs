//! Extract phase metrics: streaming the source into the local artifact.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ExtractMetrics;

impl ExtractMetrics {
    pub fn record_chunk_written(rows: usize) {
        ::metrics::counter!(phase_metric!(counter, "extract", "chunks_written")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "extract", "rows_written")).increment(rows as u64);
    }

    pub fn record_artifact_bytes(bytes: u64) {
        ::metrics::gauge!(phase_metric!(gauge, "extract", "artifact_bytes")).set(bytes as f64);
    }

    pub fn record_duration(secs: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "extract", "duration_seconds")).record(secs);
    }

    pub fn record_failure() {
        ::metrics::counter!(phase_metric!(counter, "extract", "failures")).increment(1);
    }
}

impl PhaseMetrics for ExtractMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge, histogram};

        let _ = counter!(phase_metric!(counter, "extract", "chunks_written"));
        let _ = counter!(phase_metric!(counter, "extract", "rows_written"));
        let _ = counter!(phase_metric!(counter, "extract", "failures"));
        let _ = gauge!(phase_metric!(gauge, "extract", "artifact_bytes"));
        let _ = histogram!(phase_metric!(histogram, "extract", "duration_seconds"));
    }

    fn phase_name() -> &'static str {
        "extract"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "extract", "chunks_written"),
                metric_type: MetricType::Counter,
                help: "Chunks appended to the local raw artifact",
            },
            MetricDoc {
                name: phase_metric!(counter, "extract", "rows_written"),
                metric_type: MetricType::Counter,
                help: "Source rows written to the local raw artifact",
            },
            MetricDoc {
                name: phase_metric!(counter, "extract", "failures"),
                metric_type: MetricType::Counter,
                help: "Extract runs that aborted",
            },
            MetricDoc {
                name: phase_metric!(gauge, "extract", "artifact_bytes"),
                metric_type: MetricType::Gauge,
                help: "Size of the last local raw artifact",
            },
            MetricDoc {
                name: phase_metric!(histogram, "extract", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time of the extract step",
            },
        ]
    }
}
