use super::{UsageRecord, UsageSink};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// In-memory sink for testing.
pub struct InMemoryUsageSink {
    records: Arc<RwLock<Vec<UsageRecord>>>,
    max_records: usize,
}

impl InMemoryUsageSink {
    pub fn new(max: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            max_records: max.max(1),
        }
    }

    pub fn records(&self) -> Vec<UsageRecord> {
        self.records
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut records) = self.records.write() {
            records.clear();
        }
    }
}

impl Default for InMemoryUsageSink {
    fn default() -> Self {
        Self::new(1_000)
    }
}

#[async_trait]
impl UsageSink for InMemoryUsageSink {
    async fn insert(&self, record: UsageRecord) -> anyhow::Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| anyhow::anyhow!("usage record store poisoned"))?;
        records.push(record);
        if records.len() > self.max_records {
            records.remove(0);
        }
        Ok(())
    }
}

/// Sink that only logs records, for local debugging.
#[derive(Debug, Default)]
pub struct TracingUsageSink;

#[async_trait]
impl UsageSink for TracingUsageSink {
    async fn insert(&self, record: UsageRecord) -> anyhow::Result<()> {
        info!(
            model = record.model_name.as_str(),
            status = record.status.as_str(),
            tokens_used = record.tokens_used.unwrap_or(0),
            user_id = record.user_id.as_deref().unwrap_or(""),
            note_id = record.note_id.as_deref().unwrap_or(""),
            error = record.error_message.as_deref().unwrap_or(""),
            "usage record"
        );
        Ok(())
    }
}

/// Composite sink for multiple destinations.
///
/// Every child receives the record; the first child error is returned after
/// all children have been tried.
#[derive(Default)]
pub struct CompositeUsageSink {
    sinks: Vec<Arc<dyn UsageSink>>,
}

impl CompositeUsageSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(mut self, sink: Arc<dyn UsageSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl UsageSink for CompositeUsageSink {
    async fn insert(&self, record: UsageRecord) -> anyhow::Result<()> {
        let mut first_err = None;
        for (idx, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = sink.insert(record.clone()).await {
                warn!(sink_index = idx, error = %e, "usage sink insert failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
