// Shared test doubles for the session tests: a scripted capture engine and
// a scripted permission authority, both instrumented with call counters.
#![allow(dead_code)]

use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mic_session::{CaptureEngine, Codec, PermissionAuthority, PermissionContext, TrackDescriptor};

/// Route session logs through the test harness. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Shared counters for observing engine calls from the test body.
#[derive(Clone, Default)]
pub struct EngineProbe {
    pub starts: Arc<AtomicUsize>,
    pub stops: Arc<AtomicUsize>,
}

impl EngineProbe {
    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

pub struct MockEngine {
    probe: EngineProbe,
    level: f32,
    start_delay: Duration,
    fail_start: bool,
    fail_stop: bool,
    fail_level: bool,
    started: Option<Instant>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            probe: EngineProbe::default(),
            level: 42.0,
            start_delay: Duration::ZERO,
            fail_start: false,
            fail_stop: false,
            fail_level: false,
            started: None,
        }
    }

    pub fn probe(&self) -> EngineProbe {
        self.probe.clone()
    }

    pub fn level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    pub fn slow_start(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn fail_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn fail_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }

    pub fn fail_level(mut self) -> Self {
        self.fail_level = true;
        self
    }
}

#[async_trait::async_trait]
impl CaptureEngine for MockEngine {
    async fn start(&mut self, _track: &TrackDescriptor, _codec: Codec) -> Result<()> {
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }
        if self.fail_start {
            anyhow::bail!("mock engine refused to start");
        }
        self.probe.starts.fetch_add(1, Ordering::SeqCst);
        self.started = Some(Instant::now());
        Ok(())
    }

    async fn stop(&mut self) -> Result<Duration> {
        self.probe.stops.fetch_add(1, Ordering::SeqCst);
        let elapsed = self.started.take().map(|s| s.elapsed()).unwrap_or_default();
        if self.fail_stop {
            anyhow::bail!("mock engine refused to stop");
        }
        Ok(elapsed)
    }

    fn current_level(&self) -> Result<f32> {
        if self.fail_level {
            anyhow::bail!("mock engine level query failed");
        }
        Ok(self.level)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Scripted authority: grants or denies after an optional delay, or fails
/// outright. Counts how many times it was consulted.
pub struct MockAuthority {
    grant: bool,
    fail: bool,
    delay: Duration,
    pub calls: Arc<AtomicUsize>,
}

impl MockAuthority {
    pub fn granting() -> Self {
        Self {
            grant: true,
            fail: false,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn denying() -> Self {
        Self {
            grant: false,
            ..Self::granting()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::granting()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PermissionAuthority for MockAuthority {
    async fn request(&self, _ctx: &PermissionContext, _track: &TrackDescriptor) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            anyhow::bail!("mock authority exploded");
        }
        Ok(self.grant)
    }
}
