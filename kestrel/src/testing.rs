// kestrel/src/testing.rs

//! Shared test doubles for the application crate's tests.

use kestrel_core::event;
use kestrel_core::compliance;
use kestrel_core::price_handler;

/// Wraps a concrete price handler in the shared handle the execution
/// handler and the backtest loop both hold.
pub fn shared<H: price_handler::PriceHandler + 'static>(
    handler: H,
) -> std::sync::Arc<parking_lot::RwLock<dyn price_handler::PriceHandler>> {
    std::sync::Arc::new(parking_lot::RwLock::new(handler))
}

/// Price handler with fixed per-symbol quotes and an optional scripted
/// feed of market updates.
pub struct MockPriceHandler {
    quotes: std::collections::HashMap<String, (chrono::DateTime<chrono::Utc>, price_handler::PriceQuote)>,
    steps: std::collections::VecDeque<chrono::DateTime<chrono::Utc>>,
    event_sender: Option<std::sync::mpsc::Sender<Box<dyn event::Event>>>,
    current_datetime: Option<chrono::DateTime<chrono::Utc>>,
    continue_backtest: bool,
}

impl MockPriceHandler {
    pub fn new() -> Self {
        Self {
            quotes: std::collections::HashMap::new(),
            steps: std::collections::VecDeque::new(),
            event_sender: None,
            current_datetime: None,
            continue_backtest: true,
        }
    }

    pub fn with_quote(
        mut self,
        symbol: &str,
        timestamp: chrono::DateTime<chrono::Utc>,
        quote: price_handler::PriceQuote,
    ) -> Self {
        self.quotes.insert(symbol.to_string(), (timestamp, quote));
        self
    }

    /// Scripts the feed: each `update` consumes one step, sets the feed
    /// clock to it and pushes a MarketEvent; exhaustion ends the backtest.
    pub fn with_feed(
        mut self,
        event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
        steps: Vec<chrono::DateTime<chrono::Utc>>,
    ) -> Self {
        self.event_sender = Some(event_sender);
        self.steps = steps.into();
        self
    }

}

impl price_handler::PriceHandler for MockPriceHandler {
    fn get_last_timestamp(&self, symbol: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        self.quotes.get(symbol).map(|(timestamp, _)| *timestamp)
    }

    fn get_current_quote(&self, symbol: &str) -> Option<price_handler::PriceQuote> {
        self.quotes.get(symbol).map(|(_, quote)| *quote)
    }

    fn get_current_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.current_datetime
    }

    fn update(&mut self) -> anyhow::Result<()> {
        match self.steps.pop_front() {
            Some(datetime) => {
                self.current_datetime = Some(datetime);
                if let Some(event_sender) = &self.event_sender {
                    event_sender.send(Box::new(event::MarketEvent::new()))
                        .map_err(|e| anyhow::anyhow!("Failed to send MarketEvent: {}", e))?;
                }
            }
            None => {
                self.continue_backtest = false;
            }
        }

        anyhow::Ok(())
    }

    fn get_continue_backtest(&self) -> bool {
        self.continue_backtest
    }

    fn set_continue_backtest(&mut self, value: bool) {
        self.continue_backtest = value;
    }

}

pub type RecordedFills = std::sync::Arc<parking_lot::Mutex<Vec<event::FillEvent>>>;

/// Compliance recorder that stores every fill it is handed.
pub struct RecordingCompliance {
    fills: RecordedFills,
}

impl RecordingCompliance {
    pub fn shared() -> RecordedFills {
        std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()))
    }

    pub fn new(fills: RecordedFills) -> Self {
        Self { fills }
    }

}

impl compliance::ComplianceRecorder for RecordingCompliance {
    fn record_trade(&mut self, fill_event: &event::FillEvent) -> anyhow::Result<()> {
        self.fills.lock().push(fill_event.clone());
        anyhow::Ok(())
    }

}

/// Compliance recorder that always fails.
pub struct FailingCompliance;

impl compliance::ComplianceRecorder for FailingCompliance {
    fn record_trade(&mut self, _fill_event: &event::FillEvent) -> anyhow::Result<()> {
        anyhow::bail!("Trade journal unavailable")
    }

}
