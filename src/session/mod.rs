//! Recording session management
//!
//! This module provides the `RecordingSession` abstraction that owns:
//! - The recording lifecycle state machine (idle, requesting permission,
//!   recording)
//! - Permission gating via an injected async authority
//! - Driving the capture engine (start/stop/level queries)
//! - The telemetry broadcast to presentation-side subscribers
//! - Clean teardown under cancellation, disposal, and collaborator failure

mod config;
mod media;
mod session;
mod state;

pub use config::SessionConfig;
pub use media::RecordedMedia;
pub use session::{RecordingSession, StartOutcome};
pub use state::SessionState;
