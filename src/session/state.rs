/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not recording, no permission request pending.
    Idle,
    /// Waiting on the permission authority before the engine may start.
    RequestingPermission,
    /// The capture engine has acknowledged a successful start.
    Recording,
}
