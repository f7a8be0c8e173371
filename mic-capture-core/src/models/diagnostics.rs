use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::WorkerFault;

/// Lifecycle of the sampling worker within one session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkerStatus {
    #[default]
    NotStarted,
    SettingUp,
    Sampling,
    /// Setup failed and the worker returned.
    Exited(WorkerFault),
    /// Setup failed and the worker is parked until the session is stopped.
    Halted(WorkerFault),
    Stopped,
}

/// Counters for debugging capture sessions.
#[derive(Debug, Clone, Default)]
pub struct CaptureDiagnostics {
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub worker_status: WorkerStatus,
    pub blocks_acquired: u64,
    pub bytes_acquired: u64,
    pub frames_pushed: u64,
    pub bytes_pushed: u64,
    /// Encode calls that produced no output or reported an error.
    pub frames_dropped: u64,
    pub last_encode_result: Option<i32>,
}

impl CaptureDiagnostics {
    pub(crate) fn for_new_session() -> Self {
        Self {
            session_id: Some(Uuid::new_v4()),
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }
}
