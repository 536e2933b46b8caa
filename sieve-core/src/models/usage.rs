use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One provider call, for cost accounting.
///
/// The arbiter accumulates these; callers drain and persist them. Recording
/// never fails and never blocks arbitration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub provider: String,
    pub model: String,
    pub endpoint: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub success: bool,
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}
