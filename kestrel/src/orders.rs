// kestrel/src/orders.rs

//! Order intent schedule.
//! Stands in for the upstream portfolio component: once the feed clock
//! reaches an intent's time, the intent is sent onto the shared queue as
//! an ORDER event.

use kestrel_core::event;
use kestrel_core::settings;

#[derive(Debug, Clone)]
struct ScheduledOrder {
    at: chrono::DateTime<chrono::Utc>,
    symbol: String,
    action: event::OrderAction,
    quantity: u64,
}

pub struct OrderSchedule {
    event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
    pending: std::collections::VecDeque<ScheduledOrder>,
}

impl OrderSchedule {
    pub fn new(
        event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
        order_settings: &[settings::OrderSettings],
    ) -> anyhow::Result<Self> {
        let mut pending = Vec::new();
        for order in order_settings {
            pending.push(ScheduledOrder {
                at: settings::parse_datetime(&order.at)?,
                symbol: order.symbol.clone(),
                action: order.action,
                quantity: order.quantity,
            });
        }

        // Stable sort: same-time intents keep their settings order.
        pending.sort_by_key(|order| order.at);

        anyhow::Ok(
            Self {
                event_sender,
                pending: pending.into(),
            }
        )
    }

    /// Emits every pending intent due at `current_datetime` onto the queue.
    /// # Arguments
    /// * `current_datetime` - The feed clock after the latest market update.
    /// # Returns
    /// * `anyhow::Result<usize>` with the number of orders emitted.
    pub fn emit_due(
        &mut self,
        current_datetime: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<usize> {
        let mut emitted = 0;

        while self.pending.front().is_some_and(|order| order.at <= current_datetime) {
            if let Some(order) = self.pending.pop_front() {
                self.event_sender.send(Box::new(event::OrderEvent::new(
                    order.symbol,
                    order.action,
                    order.quantity,
                )))
                .map_err(|e| anyhow::anyhow!("Failed to send OrderEvent: {}", e))?;

                emitted += 1;
            }
        }

        anyhow::Ok(emitted)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

}
