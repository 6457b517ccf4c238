use tracing::{info, warn};

/// Push the in-process metrics snapshot to a Prometheus Pushgateway.
///
/// Env:
/// - REDFIN_PUSHGATEWAY_URL: base URL (e.g. http://localhost:9091). Unset skips the push.
///
/// A failed push is logged and never fails the run.
pub async fn push_to_pushgateway(instance: &str) {
    let base = match std::env::var("REDFIN_PUSHGATEWAY_URL") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => {
            info!("pushgateway: REDFIN_PUSHGATEWAY_URL not configured, skipping push");
            return;
        }
    };

    let Some(handle) = crate::metrics::get_handle() else {
        warn!("pushgateway: metrics recorder not installed, nothing to push");
        return;
    };
    let body = handle.render();

    let push_url = pushgateway_url(&base, instance);
    info!("pushgateway: pushing {} bytes to {}", body.len(), push_url);

    let client = reqwest::Client::new();
    match client
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await
    {
        Ok(r) if r.status().is_success() => {
            info!("pushgateway: pushed metrics for instance={}", instance);
        }
        Ok(r) => {
            warn!(
                "pushgateway: push failed with status={} for instance={}",
                r.status().as_u16(),
                instance
            );
        }
        Err(e) => {
            warn!("pushgateway: push request failed: {} for instance={}", e, instance);
        }
    }
}

fn pushgateway_url(base: &str, instance: &str) -> String {
    format!(
        "{}/metrics/job/redfin_etl/instance/{}",
        base.trim_end_matches('/'),
        instance
    )
}
