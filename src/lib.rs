//! Microphone recording session core
//!
//! Owns the recording lifecycle (idle, requesting permission, recording),
//! serializes start/stop against an abstract capture engine, gates the start
//! behind an async permission authority, and broadcasts live decibel and
//! duration telemetry to any number of subscribers.
//!
//! The actual microphone capture and encoding live behind the
//! [`CaptureEngine`] trait; visual presentation consumes the telemetry via
//! [`DispositionStream`] and the start/stop hooks.

pub mod engine;
pub mod error;
pub mod permission;
pub mod session;
pub mod telemetry;
pub mod track;

pub use engine::{CaptureEngine, Codec};
pub use error::SessionError;
pub use permission::{AllowAll, PermissionAuthority, PermissionContext, PermissionFn};
pub use session::{
    RecordedMedia, RecordingSession, SessionConfig, SessionState, StartOutcome,
};
pub use telemetry::{Disposition, DispositionStream};
pub use track::{Destination, TrackDescriptor};
