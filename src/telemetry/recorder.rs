use super::{UsageRecord, UsageSink};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fire-and-forget dispatcher in front of an optional [`UsageSink`].
#[derive(Clone, Default)]
pub struct TelemetryRecorder {
    sink: Option<Arc<dyn UsageSink>>,
}

impl TelemetryRecorder {
    pub fn new(sink: Option<Arc<dyn UsageSink>>) -> Self {
        Self { sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Dispatch a record on a detached task.
    ///
    /// Returns immediately. The insert runs on its own task so a panicking
    /// sink is contained and observed by the watcher task, which only logs.
    /// Must be called from within a Tokio runtime.
    pub fn record(&self, record: UsageRecord) {
        let Some(sink) = self.sink.clone() else {
            return;
        };

        let model = record.model_name.clone();
        let status = record.status;
        let insert = tokio::spawn(async move { sink.insert(record).await });

        tokio::spawn(async move {
            match insert.await {
                Ok(Ok(())) => {
                    debug!(model = model.as_str(), status = status.as_str(), "usage recorded");
                }
                Ok(Err(e)) => {
                    warn!(model = model.as_str(), error = %e, "failed to record usage");
                }
                Err(join_err) => {
                    warn!(model = model.as_str(), error = %join_err, "usage sink task aborted");
                }
            }
        });
    }
}
