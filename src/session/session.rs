use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::config::SessionConfig;
use super::media::RecordedMedia;
use super::state::SessionState;
use crate::engine::{CaptureEngine, Codec};
use crate::error::SessionError;
use crate::permission::{PermissionAuthority, PermissionContext};
use crate::telemetry::{DispositionStream, TelemetryBroadcaster};
use crate::track::TrackDescriptor;

/// What a `start` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Recording began; `on_start` has fired.
    Started,
    /// The session was not idle (or was disposed); nothing happened.
    Ignored,
    /// The permission authority declined; the session is idle again.
    PermissionDenied,
}

type StartHook = Box<dyn Fn() + Send + Sync>;
type StopHook = Box<dyn Fn(&RecordedMedia) + Send + Sync>;

/// State shared between the session, in-flight `start` futures, and
/// disposal. Lock is never held across an await.
struct Gate {
    state: SessionState,
    /// Bumped on every transition attempt and on disposal, so a permission
    /// grant that lands after disposal can be recognized and ignored.
    generation: u64,
    disposed: bool,
}

/// A recording session that gates capture behind a permission check, drives
/// the capture engine, and broadcasts live telemetry to subscribers.
///
/// One logical owner per session: callers serialize `start`/`stop`/`dispose`
/// (e.g. from a single UI event loop). Internally the pending permission
/// request, the telemetry tick task, and engine calls interleave
/// cooperatively.
pub struct RecordingSession {
    /// Session configuration
    config: SessionConfig,

    /// The destination this session records to
    track: TrackDescriptor,

    /// Capture engine, exclusively owned by this session
    engine: Arc<Mutex<Box<dyn CaptureEngine>>>,

    /// Optional permission gate; absent means every request is granted
    authority: Option<Arc<dyn PermissionAuthority>>,

    /// Lifecycle state machine
    gate: Arc<StdMutex<Gate>>,

    /// Telemetry fan-out while recording
    telemetry: TelemetryBroadcaster,

    /// Final duration of the most recent completed recording
    last_duration: StdMutex<Duration>,

    on_start: Option<StartHook>,
    on_stopped: Option<StopHook>,
}

impl RecordingSession {
    /// Create a session with default configuration.
    pub fn new(track: TrackDescriptor, engine: Box<dyn CaptureEngine>) -> Self {
        Self::with_config(SessionConfig::default(), track, engine)
    }

    pub fn with_config(
        config: SessionConfig,
        track: TrackDescriptor,
        engine: Box<dyn CaptureEngine>,
    ) -> Self {
        info!(
            "Creating recording session: {} ({}, engine: {})",
            config.session_id,
            track.destination_summary(),
            engine.name()
        );

        Self {
            config,
            track,
            engine: Arc::new(Mutex::new(engine)),
            authority: None,
            gate: Arc::new(StdMutex::new(Gate {
                state: SessionState::Idle,
                generation: 0,
                disposed: false,
            })),
            telemetry: TelemetryBroadcaster::new(),
            last_duration: StdMutex::new(Duration::ZERO),
            on_start: None,
            on_stopped: None,
        }
    }

    /// Install a permission authority. Must be done before `start`.
    pub fn set_authority(&mut self, authority: Arc<dyn PermissionAuthority>) {
        self.authority = Some(authority);
    }

    /// Hook invoked once per successful start, after the engine confirms.
    pub fn set_on_start(&mut self, hook: impl Fn() + Send + Sync + 'static) {
        self.on_start = Some(Box::new(hook));
    }

    /// Hook invoked when a recording stops, after telemetry has been joined.
    pub fn set_on_stopped(&mut self, hook: impl Fn(&RecordedMedia) + Send + Sync + 'static) {
        self.on_stopped = Some(Box::new(hook));
    }

    /// Start recording
    ///
    /// No-op (`Ignored`) unless the session is idle; only one permission
    /// request is ever in flight. Dropping the returned future while the
    /// permission request is pending returns the session to idle without
    /// touching the engine.
    pub async fn start(&self, codec_hint: Option<Codec>) -> Result<StartOutcome, SessionError> {
        let generation = {
            let mut gate = self.gate.lock().unwrap();
            if gate.disposed || gate.state != SessionState::Idle {
                warn!(
                    "Ignoring start for session {}: not idle",
                    self.config.session_id
                );
                return Ok(StartOutcome::Ignored);
            }
            gate.state = SessionState::RequestingPermission;
            gate.generation += 1;
            gate.generation
        };

        // Rolls the state back to idle if this future is dropped or errors
        // out before the engine confirms a start.
        let mut rollback = Rollback::new(Arc::clone(&self.gate), generation);

        let granted = match &self.authority {
            Some(authority) => {
                let ctx = PermissionContext {
                    session_id: self.config.session_id.clone(),
                    destination: self.track.destination_summary(),
                };
                match authority.request(&ctx, &self.track).await {
                    Ok(granted) => granted,
                    Err(e) => {
                        warn!(
                            "Permission request failed for session {}: {}",
                            self.config.session_id, e
                        );
                        return Err(SessionError::PermissionRequestFailed(e));
                    }
                }
            }
            None => true,
        };

        if !granted {
            info!(
                "Permission denied for session {}",
                self.config.session_id
            );
            return Ok(StartOutcome::PermissionDenied);
        }

        // A disposal while the request was pending wins over a late grant.
        {
            let gate = self.gate.lock().unwrap();
            if gate.disposed || gate.generation != generation {
                return Ok(StartOutcome::Ignored);
            }
        }

        let started = Instant::now();
        let start_result = {
            let mut engine = self.engine.lock().await;
            engine.start(&self.track, codec_hint.unwrap_or(self.config.default_codec))
                .await
        };

        if let Err(e) = start_result {
            error!(
                "Capture engine failed to start for session {}: {}",
                self.config.session_id, e
            );
            return Err(SessionError::CaptureStartFailed(e));
        }

        let disposed_during_start = {
            let mut gate = self.gate.lock().unwrap();
            if gate.disposed || gate.generation != generation {
                true
            } else {
                gate.state = SessionState::Recording;
                false
            }
        };
        if disposed_during_start {
            // Disposed while the engine was starting; unwind the start.
            let mut engine = self.engine.lock().await;
            if let Err(e) = engine.stop().await {
                warn!(
                    "Engine unwind after dispose failed for session {}: {}",
                    self.config.session_id, e
                );
            }
            return Ok(StartOutcome::Ignored);
        }
        rollback.disarm();

        self.telemetry.reset();
        self.telemetry
            .begin(
                Arc::clone(&self.engine),
                self.config.tick_interval,
                started,
            )
            .await;

        if let Some(hook) = &self.on_start {
            hook();
        }

        info!("Recording session started: {}", self.config.session_id);

        Ok(StartOutcome::Started)
    }

    /// Stop recording
    ///
    /// No-op (`Ok(None)`) unless recording. Telemetry is stopped and joined
    /// first, so no tick lands after `on_stopped`. An engine stop failure is
    /// surfaced but the session is still forced back to idle.
    pub async fn stop(&self) -> Result<Option<RecordedMedia>, SessionError> {
        {
            let gate = self.gate.lock().unwrap();
            if gate.state != SessionState::Recording {
                return Ok(None);
            }
        }

        info!("Stopping recording session: {}", self.config.session_id);

        self.telemetry.stop().await;
        let last_tick = self.telemetry.latest();

        let stop_result = {
            let mut engine = self.engine.lock().await;
            engine.stop().await
        };

        {
            let mut gate = self.gate.lock().unwrap();
            gate.state = SessionState::Idle;
            gate.generation += 1;
        }

        let duration = match &stop_result {
            Ok(final_duration) => *final_duration,
            // Engine lost; the broadcaster's last tick is the best figure left.
            Err(_) => last_tick.duration,
        };
        *self.last_duration.lock().unwrap() = duration;

        let media = RecordedMedia {
            track: self.track.clone(),
            duration,
            recorded_at: chrono::Utc::now(),
        };

        if let Some(hook) = &self.on_stopped {
            hook(&media);
        }

        match stop_result {
            Ok(_) => {
                info!("Recording session stopped: {}", self.config.session_id);
                Ok(Some(media))
            }
            Err(e) => {
                error!(
                    "Capture engine failed to stop for session {}: {}",
                    self.config.session_id, e
                );
                Err(SessionError::CaptureStopFailed(e))
            }
        }
    }

    /// Dispose of the session: forces a stop if recording, cancels a pending
    /// permission request's effect, and rejects further starts. Idempotent.
    pub async fn dispose(&self) {
        let was_recording = {
            let mut gate = self.gate.lock().unwrap();
            if gate.disposed {
                return;
            }
            gate.disposed = true;
            gate.generation += 1;
            match gate.state {
                SessionState::Recording => true,
                _ => {
                    gate.state = SessionState::Idle;
                    false
                }
            }
        };

        info!("Disposing recording session: {}", self.config.session_id);

        if was_recording {
            if let Err(e) = self.stop().await {
                error!(
                    "Stop during dispose failed for session {}: {}",
                    self.config.session_id, e
                );
            }
        }
    }

    /// Subscribe to the telemetry feed. The first value a subscriber sees is
    /// the latest snapshot (the zero seed before recording starts).
    pub fn dispositions(&self) -> DispositionStream {
        self.telemetry.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.gate.lock().unwrap().state
    }

    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Recording
    }

    /// Last known recording duration: live while recording, the final
    /// engine-reported figure after a stop.
    pub fn duration(&self) -> Duration {
        if self.is_recording() {
            self.telemetry.latest().duration
        } else {
            *self.last_duration.lock().unwrap()
        }
    }

    pub fn track(&self) -> &TrackDescriptor {
        &self.track
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        let gate = self.gate.lock();
        if let Ok(gate) = gate {
            if gate.state == SessionState::Recording {
                warn!(
                    "Session {} dropped while recording; call dispose() for a clean stop",
                    self.config.session_id
                );
            }
        }
        self.telemetry.abort();
    }
}

/// Resets a pending `RequestingPermission` back to `Idle` on drop, unless
/// disarmed after a confirmed engine start. Generation-checked so it never
/// clobbers a state some later call owns.
struct Rollback {
    gate: Arc<StdMutex<Gate>>,
    generation: u64,
    armed: bool,
}

impl Rollback {
    fn new(gate: Arc<StdMutex<Gate>>, generation: u64) -> Self {
        Self {
            gate,
            generation,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for Rollback {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut gate) = self.gate.lock() {
            if gate.generation == self.generation
                && gate.state == SessionState::RequestingPermission
            {
                gate.state = SessionState::Idle;
            }
        }
    }
}
