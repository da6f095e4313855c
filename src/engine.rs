use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::track::TrackDescriptor;

/// Codec hint forwarded to the capture engine.
///
/// The engine owns codec negotiation; unsupported values are its to reject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Codec {
    #[default]
    Aac,
    Opus,
    CafOpus,
    Mp3,
    Vorbis,
    Pcm,
}

/// Microphone capture backend trait
///
/// Performs the actual recording and encoding. The session drives it through
/// this narrow command surface and never reaches past it; codec correctness,
/// platform audio APIs, and file I/O all live behind the implementation.
#[async_trait::async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Begin capturing to the track's destination.
    async fn start(&mut self, track: &TrackDescriptor, codec: Codec) -> Result<()>;

    /// Stop capturing. Returns the final recorded duration.
    async fn stop(&mut self) -> Result<Duration>;

    /// Current input level in decibels.
    fn current_level(&self) -> Result<f32>;

    /// Get engine name for logging
    fn name(&self) -> &str;
}
