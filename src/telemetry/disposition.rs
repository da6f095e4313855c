use std::time::Duration;

/// One instant of recording telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disposition {
    /// Input level in decibels (clamped to >= 0).
    pub decibels: f32,
    /// Elapsed time since recording started.
    pub duration: Duration,
}

impl Disposition {
    /// Seed value emitted to subscribers before recording starts.
    pub const ZERO: Disposition = Disposition {
        decibels: 0.0,
        duration: Duration::ZERO,
    };

    pub fn new(decibels: f32, duration: Duration) -> Self {
        Self {
            decibels: decibels.max(0.0),
            duration,
        }
    }
}

impl Default for Disposition {
    fn default() -> Self {
        Self::ZERO
    }
}
