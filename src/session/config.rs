use std::time::Duration;

use crate::engine::Codec;

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier, used for log correlation and permission
    /// prompts (e.g. "session-7f3a...")
    pub session_id: String,

    /// Codec used when `start` is given no hint
    pub default_codec: Codec,

    /// Telemetry tick interval
    /// Default: 20 ms (perceptible UI animation granularity)
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            default_codec: Codec::default(),
            tick_interval: Duration::from_millis(20),
        }
    }
}
