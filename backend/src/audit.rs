//! Best-effort audit side channel. Every property mutation produces one
//! entry, but a failed write must never fail or roll back the mutation it
//! describes; the failure is logged and swallowed here. The trait seam
//! exists so the sink can be swapped (e.g. for a durable queue) without
//! touching the lifecycle code.

use crate::db::DbPool;
use crate::models::{NewPropertyLog, PropertyLog};

#[derive(Debug)]
pub struct AuditError(pub String);

pub trait AuditSink: Send + Sync {
    fn record(&self, entry: NewPropertyLog) -> Result<(), AuditError>;
}

/// Writes entries to the `property_logs` table on its own pooled
/// connection, deliberately outside the caller's transaction.
pub struct DieselAuditSink {
    pool: DbPool,
}

impl DieselAuditSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AuditSink for DieselAuditSink {
    fn record(&self, entry: NewPropertyLog) -> Result<(), AuditError> {
        let mut conn = self
            .pool
            .get()
            .map_err(|err| AuditError(format!("audit connection unavailable: {}", err)))?;
        PropertyLog::create(&mut conn, &entry)
            .map_err(|err| AuditError(format!("audit insert failed: {}", err)))?;
        Ok(())
    }
}

/// The single swallow point for audit failures.
pub fn record_best_effort(sink: &dyn AuditSink, entry: NewPropertyLog) {
    let action = entry.action_type;
    let property_id = entry.property_id;
    if let Err(AuditError(reason)) = sink.record(entry) {
        log::warn!(
            "audit write dropped for {:?} on property {}: {}",
            action,
            property_id,
            reason
        );
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Captures entries for assertions.
    #[derive(Default)]
    pub struct RecordingSink {
        pub entries: Mutex<Vec<NewPropertyLog>>,
    }

    impl AuditSink for RecordingSink {
        fn record(&self, entry: NewPropertyLog) -> Result<(), AuditError> {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    /// Always fails, to exercise the swallow path.
    pub struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _entry: NewPropertyLog) -> Result<(), AuditError> {
            Err(AuditError("simulated audit outage".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{FailingSink, RecordingSink};
    use super::*;
    use crate::models::LogAction;
    use uuid::Uuid;

    fn entry() -> NewPropertyLog {
        NewPropertyLog {
            property_id: Uuid::new_v4(),
            property_title: "Test listing".to_string(),
            user_id: Uuid::new_v4(),
            user_email: "agent@example.com".to_string(),
            action_type: LogAction::Create,
            details: None,
        }
    }

    #[test]
    fn failures_are_swallowed() {
        // Must not panic or propagate anything.
        record_best_effort(&FailingSink, entry());
    }

    #[test]
    fn successful_writes_reach_the_sink_once() {
        let sink = RecordingSink::default();
        record_best_effort(&sink, entry());
        assert_eq!(sink.entries.lock().unwrap().len(), 1);
    }
}
