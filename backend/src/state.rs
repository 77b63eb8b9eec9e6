use std::sync::Arc;

use crate::audit::AuditSink;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::uploads::ImageStore;

/// Everything a handler needs, constructed once in `main`. No component
/// reaches for ambient globals; the pool, the image store and the audit
/// sink all arrive through here.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub images: Arc<dyn ImageStore>,
    pub audit: Arc<dyn AuditSink>,
}
