// kestrel_core/src/execution.rs

//! Interface for order execution simulation.
//! Allows swapping between simulated and real brokers.
//!
//! The ExecutionHandler trait defines the contract for executing orders.
//! The NaiveExecutionHandler in the application crate implements this trait
//! for backtesting; latency- or slippage-aware variants plug in behind the
//! same contract.

use crate::event;

/// Defines the interface for an execution handler.
/// All execution handlers must implement this trait.
pub trait ExecutionHandler {
    /// Executes an order carried by an event from the shared queue.
    /// Events of any other kind are ignored without error, so the handler
    /// can be handed every event the queue carries.
    /// # Arguments
    /// * `event` - The event popped from the shared queue.
    /// # Returns
    /// * `anyhow::Result<()>` indicating success or failure.
    fn execute_order(&mut self, event: &dyn event::Event) -> anyhow::Result<()>;

}
