use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::info;

/// Batch-level timing for one campaign workflow run. Events land on the
/// `campaign.timing` target, which the logging setup routes to its own file.
#[derive(Debug)]
pub struct WorkflowTimer {
    workflow: String,
    started_at: DateTime<Utc>,
    started_perf: Instant,
    completed: bool,
}

impl WorkflowTimer {
    pub fn start(workflow: &str) -> Self {
        let timer = WorkflowTimer {
            workflow: workflow.to_string(),
            started_at: Utc::now(),
            started_perf: Instant::now(),
            completed: false,
        };
        info!(
            target: "campaign.timing",
            "event=workflow_started workflow={} started_at={}",
            timer.workflow,
            timer.started_at.to_rfc3339()
        );
        timer
    }

    pub fn complete(&mut self, variants: usize) {
        self.finish("success", variants, None);
    }

    pub fn fail(&mut self, detail: &str) {
        self.finish("error", 0, Some(detail.to_string()));
    }

    fn finish(&mut self, status: &str, variants: usize, detail: Option<String>) {
        if self.completed {
            return;
        }
        self.completed = true;
        let completed_at = Utc::now();
        let duration = self.started_perf.elapsed().as_secs_f64();
        info!(
            target: "campaign.timing",
            "event=workflow_completed workflow={} started_at={} completed_at={} duration_s={:.3} status={} variants={} detail={}",
            self.workflow,
            self.started_at.to_rfc3339(),
            completed_at.to_rfc3339(),
            duration,
            status,
            variants,
            detail.unwrap_or_default()
        );
    }
}

pub async fn log_api_timing<T, E, F, Fut>(
    provider: &str,
    operation: &str,
    metadata: Option<JsonValue>,
    call: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let started_at = Utc::now();
    let started_perf = Instant::now();
    let metadata_text = metadata
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "{}".to_string());
    info!(
        target: "campaign.timing",
        "event=api_request provider={} operation={} started_at={} metadata={}",
        provider,
        operation,
        started_at.to_rfc3339(),
        metadata_text
    );

    let result = call().await;
    let status = if result.is_err() { "error" } else { "success" };

    let completed_at = Utc::now();
    let duration = started_perf.elapsed().as_secs_f64();
    info!(
        target: "campaign.timing",
        "event=api_response provider={} operation={} completed_at={} duration_s={:.3} status={} metadata={}",
        provider,
        operation,
        completed_at.to_rfc3339(),
        duration,
        status,
        metadata_text
    );

    result
}
