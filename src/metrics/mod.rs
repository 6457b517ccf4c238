//! Phase-organized metrics for the ETL run
//!
//! Each pipeline step records into its own submodule so names stay unique and
//! ownership is obvious. Names follow `redfin_{phase}_{metric}[_total]`.

pub mod extract;
pub mod load;
pub mod registry;
pub mod transform;

pub use extract::ExtractMetrics;
pub use load::LoadMetrics;
pub use transform::TransformMetrics;

use std::sync::{Once, OnceLock};
use tracing::{info, warn};

static INIT: Once = Once::new();
static HANDLE: OnceLock<metrics_exporter_prometheus::PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder and register every phase metric.
///
/// Idempotent. No HTTP listener is started: a batch run is too short-lived to
/// be scraped, so the snapshot is rendered in-process and pushed instead.
pub fn init_metrics() {
    INIT.call_once(|| {
        match metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                if HANDLE.set(handle).is_err() {
                    warn!("Prometheus handle already set");
                }
                registry::register_all_metrics();
                info!("Prometheus recorder installed");
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
            }
        }
    });
}

pub fn get_handle() -> Option<&'static metrics_exporter_prometheus::PrometheusHandle> {
    HANDLE.get()
}

/// Implemented by each phase's metrics collection
pub trait PhaseMetrics {
    /// Register all metrics for this phase
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Build a phase-scoped metric name at compile time
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("redfin_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("redfin_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("redfin_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
