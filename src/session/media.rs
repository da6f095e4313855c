use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::track::TrackDescriptor;

/// Finalized descriptor of a completed recording, handed to `on_stopped`.
#[derive(Debug, Clone)]
pub struct RecordedMedia {
    /// The track the recording was made against.
    pub track: TrackDescriptor,

    /// Final duration reported by the capture engine.
    pub duration: Duration,

    /// When the recording stopped.
    pub recorded_at: DateTime<Utc>,
}
