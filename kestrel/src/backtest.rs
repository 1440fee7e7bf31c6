// kestrel/src/backtest.rs

//! Backtest driver.
//! Advances the price feed one observation at a time and dispatches the
//! events it finds on the shared queue until the feed is exhausted.

use anyhow::Context;
use rust_decimal::Decimal;

use kestrel_core::event;
use kestrel_core::execution;
use kestrel_core::price_handler;

use crate::orders;

/// Running totals over the fills produced by a simulation.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    pub orders: usize,
    pub fills: usize,
    pub notional: Decimal,
    pub total_commission: Decimal,
}

impl ExecutionSummary {
    pub fn new() -> Self {
        Self {
            orders: 0,
            fills: 0,
            notional: Decimal::ZERO,
            total_commission: Decimal::ZERO,
        }
    }

    fn record_fill(&mut self, fill_event: &event::FillEvent) {
        self.fills += 1;
        self.notional += fill_event.price * Decimal::from(fill_event.quantity);
        self.total_commission += fill_event.commission;
    }

}

pub struct Backtest {
    mode: String,
    price_handler: std::sync::Arc<parking_lot::RwLock<dyn price_handler::PriceHandler>>,
    event_receiver: std::sync::mpsc::Receiver<Box<dyn event::Event>>,
    order_schedule: orders::OrderSchedule,
    execution_handler: Box<dyn execution::ExecutionHandler>,
    summary: ExecutionSummary,
}

impl Backtest {
    pub fn new(
        mode: &str,
        price_handler: std::sync::Arc<parking_lot::RwLock<dyn price_handler::PriceHandler>>,
        event_receiver: std::sync::mpsc::Receiver<Box<dyn event::Event>>,
        order_schedule: orders::OrderSchedule,
        execution_handler: Box<dyn execution::ExecutionHandler>,
    ) -> Self {
        Backtest {
            mode: mode.to_string(),
            price_handler,
            event_receiver,
            order_schedule,
            execution_handler,
            summary: ExecutionSummary::new(),
        }
    }

    fn run_backtest(&mut self) -> anyhow::Result<()> {
        loop {
            if self.price_handler.read().get_continue_backtest() {
                self.price_handler.write().update()?;
            } else {
                break;
            }

            loop {
                match self.event_receiver.try_recv() {
                    Ok(event_box) => {
                        match event_box.event_type() {
                            "MARKET" => {
                                let current_datetime = self.price_handler.read().get_current_datetime();
                                if let Some(current_datetime) = current_datetime {
                                    if self.mode == "Debug" {
                                        tracing::debug!("Market update at {}", current_datetime);
                                    }

                                    let emitted = self.order_schedule.emit_due(current_datetime)?;
                                    self.summary.orders += emitted;
                                }
                            }
                            "ORDER" => {
                                if self.mode == "Debug" {
                                    tracing::debug!("Start event, {:?}", event_box);
                                }

                                self.execution_handler.execute_order(event_box.as_ref())?;

                                if self.mode == "Debug" {
                                    tracing::debug!("Finish event, {:?}", event_box);
                                }
                            }
                            "FILL" => {
                                if let Some(fill_event) = event_box.get_fill_event_params() {
                                    if self.mode == "Debug" {
                                        tracing::debug!("Fill event, {:?}", fill_event);
                                    }

                                    self.summary.record_fill(fill_event);
                                }
                            }
                            _ => {
                                tracing::warn!("Received unknown event type: {}", event_box.event_type());
                            }
                        }
                    }
                    Err(std::sync::mpsc::TryRecvError::Empty) => {
                        break;
                    }
                    Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                        tracing::error!("Event channel disconnected.");
                        self.price_handler.write().set_continue_backtest(false);
                        break;
                    }
                }
            }
        }

        anyhow::Ok(())
    }

    pub fn simulate_trading(mut self) -> anyhow::Result<ExecutionSummary> {
        self.run_backtest()
            .context("Backtest simulation failed")?;

        tracing::info!(
            "Backtest finished: {} orders, {} fills, notional {}, commission {}",
            self.summary.orders,
            self.summary.fills,
            self.summary.notional,
            self.summary.total_commission,
        );

        anyhow::Ok(self.summary)
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use kestrel_core::commission;
    use kestrel_core::settings;
    use kestrel_core::price_handler::PriceQuote;

    use crate::testing;
    use crate::execution::NaiveExecutionHandler;

    fn order_settings(at: &str, symbol: &str, action: event::OrderAction, quantity: u64) -> settings::OrderSettings {
        settings::OrderSettings {
            at: at.to_string(),
            symbol: symbol.to_string(),
            action,
            quantity,
        }
    }

    #[test]
    fn runs_orders_through_to_fills_in_intent_order() {
        let (event_sender, event_receiver) = std::sync::mpsc::channel();

        let t0 = settings::parse_datetime("2016-02-01 10:00:00").unwrap();
        let t1 = settings::parse_datetime("2016-02-01 10:00:05").unwrap();

        let price_handler = testing::shared(
            testing::MockPriceHandler::new()
                .with_quote("MSFT", t0, PriceQuote::Tick { bid: dec!(50.20), ask: dec!(50.25) })
                .with_quote("AAPL", t0, PriceQuote::Tick { bid: dec!(101.30), ask: dec!(101.37) })
                .with_feed(event_sender.clone(), vec![t0, t1]),
        );

        let recorded = testing::RecordingCompliance::shared();
        let execution_handler = NaiveExecutionHandler::new(
            event_sender.clone(),
            std::sync::Arc::clone(&price_handler),
            "ARCA".to_string(),
            Box::new(commission::FlatCommission::new(dec!(1.00))),
            Some(Box::new(testing::RecordingCompliance::new(recorded.clone()))),
        ).unwrap();

        let order_schedule = orders::OrderSchedule::new(
            event_sender,
            &[
                order_settings("2016-02-01 10:00:00", "MSFT", event::OrderAction::Buy, 100),
                order_settings("2016-02-01 10:00:05", "AAPL", event::OrderAction::Sell, 50),
            ],
        ).unwrap();

        let backtest = Backtest::new(
            "Backtest",
            price_handler,
            event_receiver,
            order_schedule,
            Box::new(execution_handler),
        );

        let summary = backtest.simulate_trading().unwrap();

        assert_eq!(summary.orders, 2);
        assert_eq!(summary.fills, 2);
        // 100 * 50.25 + 50 * 101.30
        assert_eq!(summary.notional, dec!(10090.00));
        assert_eq!(summary.total_commission, dec!(2.00));

        // Fills were journaled in the order the intents fired.
        let recorded = recorded.lock();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].symbol, "MSFT");
        assert_eq!(recorded[0].price, dec!(50.25));
        assert_eq!(recorded[1].symbol, "AAPL");
        assert_eq!(recorded[1].price, dec!(101.30));
    }

    #[test]
    fn run_without_orders_produces_no_fills() {
        let (event_sender, event_receiver) = std::sync::mpsc::channel();

        let t0 = settings::parse_datetime("2016-02-01 10:00:00").unwrap();
        let price_handler = testing::shared(
            testing::MockPriceHandler::new()
                .with_quote("MSFT", t0, PriceQuote::Bar { close: dec!(50.00) })
                .with_feed(event_sender.clone(), vec![t0]),
        );

        let execution_handler = NaiveExecutionHandler::new(
            event_sender.clone(),
            std::sync::Arc::clone(&price_handler),
            "ARCA".to_string(),
            Box::new(commission::FlatCommission::new(dec!(1.00))),
            None,
        ).unwrap();

        let order_schedule = orders::OrderSchedule::new(event_sender, &[]).unwrap();

        let backtest = Backtest::new(
            "Backtest",
            price_handler,
            event_receiver,
            order_schedule,
            Box::new(execution_handler),
        );

        let summary = backtest.simulate_trading().unwrap();
        assert_eq!(summary.orders, 0);
        assert_eq!(summary.fills, 0);
        assert_eq!(summary.notional, Decimal::ZERO);
    }

    #[test]
    fn lookup_failure_halts_the_run() {
        let (event_sender, event_receiver) = std::sync::mpsc::channel();

        let t0 = settings::parse_datetime("2016-02-01 10:00:00").unwrap();
        // Feed advances, but the ordered symbol has no quote.
        let price_handler = testing::shared(
            testing::MockPriceHandler::new()
                .with_feed(event_sender.clone(), vec![t0]),
        );

        let execution_handler = NaiveExecutionHandler::new(
            event_sender.clone(),
            std::sync::Arc::clone(&price_handler),
            "ARCA".to_string(),
            Box::new(commission::FlatCommission::new(dec!(1.00))),
            None,
        ).unwrap();

        let order_schedule = orders::OrderSchedule::new(
            event_sender,
            &[order_settings("2016-02-01 10:00:00", "MSFT", event::OrderAction::Buy, 100)],
        ).unwrap();

        let backtest = Backtest::new(
            "Backtest",
            price_handler,
            event_receiver,
            order_schedule,
            Box::new(execution_handler),
        );

        assert!(backtest.simulate_trading().is_err());
    }

}
