//! Live recording telemetry
//!
//! While a session records, a broadcaster polls the capture engine's input
//! level on a fixed cadence and fans `Disposition` snapshots out to any
//! number of subscribers. This is a live feed, not a durable log: ticks with
//! no subscriber are dropped, and late subscribers see only the latest value.

mod broadcaster;
mod disposition;

pub(crate) use broadcaster::TelemetryBroadcaster;
pub use broadcaster::DispositionStream;
pub use disposition::Disposition;
