use thiserror::Error;

/// Failures surfaced by `RecordingSession::start` and `stop`.
///
/// Wrong-state calls (`start` while not idle, `stop` while not recording)
/// are not errors; they are absorbed as benign no-ops. Permission denial is
/// likewise not an error. Every variant here leaves the session idle.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The permission authority itself failed, as distinct from denying.
    #[error("permission request failed: {0}")]
    PermissionRequestFailed(#[source] anyhow::Error),

    /// The capture engine rejected the start request.
    #[error("capture engine failed to start: {0}")]
    CaptureStartFailed(#[source] anyhow::Error),

    /// The capture engine failed while stopping. The session is still forced
    /// back to idle; teardown never wedges on this.
    #[error("capture engine failed to stop: {0}")]
    CaptureStopFailed(#[source] anyhow::Error),
}
