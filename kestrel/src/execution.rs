// kestrel/src/execution.rs

//! Naive simulated execution handler.
//! Converts ORDER events into FILL events without latency, slippage,
//! partial fills or rejection, pricing every order off the most recent
//! observation known to the price handler.

use kestrel_core::event;
use kestrel_core::execution;
use kestrel_core::commission;
use kestrel_core::compliance;
use kestrel_core::price_handler;

pub struct NaiveExecutionHandler {
    event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
    price_handler: std::sync::Arc<parking_lot::RwLock<dyn price_handler::PriceHandler>>,
    exchange: String,
    commission_model: Box<dyn commission::CommissionModel>,
    compliance: Option<Box<dyn compliance::ComplianceRecorder>>,
}

impl NaiveExecutionHandler {
    pub fn new(
        event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
        price_handler: std::sync::Arc<parking_lot::RwLock<dyn price_handler::PriceHandler>>,
        exchange: String,
        commission_model: Box<dyn commission::CommissionModel>,
        compliance: Option<Box<dyn compliance::ComplianceRecorder>>,
    ) -> anyhow::Result<Self> {
        anyhow::Ok(
            Self {
                event_sender,
                price_handler,
                exchange,
                commission_model,
                compliance,
            }
        )
    }
}

impl execution::ExecutionHandler for NaiveExecutionHandler {
    fn execute_order(&mut self, event: &dyn event::Event) -> anyhow::Result<()> {
        let order = match event.get_order_event_params() {
            Some(order) => order,
            None => return anyhow::Ok(()),
        };

        let symbol = &order.symbol;
        let (timeindex, quote) = {
            let price_handler = self.price_handler.read();
            let timeindex = price_handler.get_last_timestamp(symbol)
                .ok_or_else(|| anyhow::anyhow!("No timestamp for symbol '{}' during order execution", symbol))?;
            let quote = price_handler.get_current_quote(symbol)
                .ok_or_else(|| anyhow::anyhow!("No price for symbol '{}' during order execution", symbol))?;
            (timeindex, quote)
        };

        // A buy crosses the spread to the ask, a sell hits the bid; a
        // bar-oriented source settles both sides at the last close.
        let execution_price = match quote {
            price_handler::PriceQuote::Tick { bid, ask } => {
                match order.action {
                    event::OrderAction::Buy => ask,
                    event::OrderAction::Sell => bid,
                }
            }
            price_handler::PriceQuote::Bar { close } => close,
        };

        let commission = self.commission_model.calculate(order.quantity, execution_price);

        let fill_event = event::FillEvent::new(
            timeindex,
            symbol.clone(),
            order.action,
            order.quantity,
            self.exchange.clone(),
            execution_price,
            commission,
        );

        tracing::debug!(
            "Filled {} {} {} @ {} (commission {})",
            fill_event.action.as_str(),
            fill_event.quantity,
            fill_event.symbol,
            fill_event.price,
            fill_event.commission,
        );

        self.event_sender.send(Box::new(fill_event.clone()))
            .map_err(|e| anyhow::anyhow!("Failed to send FillEvent: {}", e))?;

        // Recording runs after the fill is published; a journal error must
        // not unpublish the fill.
        if let Some(compliance) = self.compliance.as_mut() {
            compliance.record_trade(&fill_event)?;
        }

        anyhow::Ok(())
    }

}
