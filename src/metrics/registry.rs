//! Registration of every phase's metrics, with name conflict detection.

use crate::metrics::{MetricDoc, PhaseMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<super::ExtractMetrics>(&mut all_metrics);
    register_phase_metrics::<super::TransformMetrics>(&mut all_metrics);
    register_phase_metrics::<super::LoadMetrics>(&mut all_metrics);

    info!("Registered {} metrics across all phases", all_metrics.len());
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if extract_phase_from_metric_name(doc.name) != phase_name {
            warn!("Metric '{}' is not prefixed with phase '{}'", doc.name, phase_name);
        }
        if all_metrics.contains_key(doc.name) {
            warn!("Metric name conflict: '{}' registered twice", doc.name);
            continue;
        }
        debug!("  - {} ({:?}): {}", doc.name, doc.metric_type, doc.help);
        all_metrics.insert(doc.name, doc);
    }
}

/// "redfin_extract_rows_written_total" -> "extract"
fn extract_phase_from_metric_name(metric_name: &str) -> &str {
    if let Some(stripped) = metric_name.strip_prefix("redfin_") {
        if let Some(next_underscore) = stripped.find('_') {
            return &stripped[..next_underscore];
        }
    }
    "unknown"
}
