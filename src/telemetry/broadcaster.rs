use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use super::disposition::Disposition;
use crate::engine::CaptureEngine;

/// Periodic publisher of `Disposition` snapshots while a session records.
///
/// Backed by a `watch` channel: one internal producer, any number of
/// read-only consumers, latest value replayed on subscribe.
pub(crate) struct TelemetryBroadcaster {
    tx: watch::Sender<Disposition>,

    /// Whether the tick task should keep running
    ticking: Arc<AtomicBool>,

    /// Handle for the tick task
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl TelemetryBroadcaster {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Disposition::ZERO);
        Self {
            tx,
            ticking: Arc::new(AtomicBool::new(false)),
            task_handle: Mutex::new(None),
        }
    }

    /// Reset the replayed value to the zero seed.
    pub fn reset(&self) {
        self.tx.send_replace(Disposition::ZERO);
    }

    /// Latest published value (the zero seed if nothing was published yet).
    pub fn latest(&self) -> Disposition {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> DispositionStream {
        DispositionStream {
            rx: self.tx.subscribe(),
            seeded: false,
        }
    }

    /// Start ticking: poll the engine level every `period` and publish a
    /// snapshot. A failed level query skips that tick and keeps going.
    pub async fn begin(
        &self,
        engine: Arc<Mutex<Box<dyn CaptureEngine>>>,
        period: Duration,
        started: Instant,
    ) {
        self.ticking.store(true, Ordering::SeqCst);

        let tx = self.tx.clone();
        let ticking = Arc::clone(&self.ticking);

        let task = tokio::spawn(async move {
            info!("Telemetry tick task started");

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick fires immediately; swallow it so the
            // seed value stays the first thing a subscriber sees.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if !ticking.load(Ordering::SeqCst) {
                    break;
                }

                let level = {
                    let engine = engine.lock().await;
                    engine.current_level()
                };

                match level {
                    Ok(decibels) => {
                        tx.send_replace(Disposition::new(decibels, started.elapsed()));
                    }
                    Err(e) => {
                        warn!("Level query failed, skipping tick: {}", e);
                    }
                }
            }

            info!("Telemetry tick task stopped");
        });

        let mut handle = self.task_handle.lock().await;
        *handle = Some(task);
    }

    /// Stop ticking and join the task, so no snapshot can be published once
    /// this returns.
    pub async fn stop(&self) {
        self.ticking.store(false, Ordering::SeqCst);

        let mut handle = self.task_handle.lock().await;
        if let Some(task) = handle.take() {
            if let Err(e) = task.await {
                error!("Telemetry task panicked: {}", e);
            }
        }
    }

    /// Abort the tick task without waiting. Only for non-async teardown.
    pub fn abort(&self) {
        self.ticking.store(false, Ordering::SeqCst);
        if let Ok(mut handle) = self.task_handle.try_lock() {
            if let Some(task) = handle.take() {
                task.abort();
            }
        }
    }
}

/// Subscriber handle for a session's telemetry feed.
///
/// The first `next()` yields the current value immediately (the zero seed if
/// recording has not produced a tick yet); later calls wait for changes.
pub struct DispositionStream {
    rx: watch::Receiver<Disposition>,
    seeded: bool,
}

impl DispositionStream {
    /// Next snapshot, or `None` once the session has been dropped.
    pub async fn next(&mut self) -> Option<Disposition> {
        if !self.seeded {
            self.seeded = true;
            return Some(*self.rx.borrow());
        }

        match self.rx.changed().await {
            Ok(()) => Some(*self.rx.borrow_and_update()),
            Err(_) => None,
        }
    }

    /// Most recent snapshot without waiting.
    pub fn latest(&self) -> Disposition {
        *self.rx.borrow()
    }
}
