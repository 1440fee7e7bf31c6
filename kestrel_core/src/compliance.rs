// kestrel_core/src/compliance.rs

use crate::event;

/// Append-only observer of executed trades for audit purposes.
/// Recording never gates publication: the execution handler invokes
/// `record_trade` only after the fill event is already on the queue.
pub trait ComplianceRecorder {
    fn record_trade(&mut self, fill_event: &event::FillEvent) -> anyhow::Result<()>;
}
