// kestrel/src/price_feed.rs

//! Historic CSV price feed.
//! Streams per-symbol observations in chronological order and publishes a
//! MarketEvent onto the shared queue for every ingested row.
//!
//! Data layout: one `;`-separated file per symbol at
//! `<data_path>/<SYMBOL>.csv` with a header row. Tick files carry
//! `datetime;bid;ask`, bar files carry `datetime;close`, with datetimes in
//! the settings format.

use std::str::FromStr;

use anyhow::Context;

use kestrel_core::event;
use kestrel_core::settings;
use kestrel_core::price_handler;

/// One parsed observation from a symbol's data file.
#[derive(Debug, Clone)]
struct Observation {
    datetime: chrono::DateTime<chrono::Utc>,
    symbol: String,
    quote: price_handler::PriceQuote,
}

pub struct HistoricCsvPriceHandler {
    event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
    observations: Vec<Observation>,
    cursor: usize,
    latest: std::collections::HashMap<String, (chrono::DateTime<chrono::Utc>, price_handler::PriceQuote)>,
    current_datetime: Option<chrono::DateTime<chrono::Utc>>,
    continue_backtest: bool,
}

impl HistoricCsvPriceHandler {
    /// Loads every symbol's file and merges all observations into one
    /// chronological stream.
    /// # Arguments
    /// * `event_sender` - Sender side of the shared event queue.
    /// * `source_kind` - Tick or bar file layout.
    /// * `data_path` - Directory holding `<SYMBOL>.csv` files.
    /// * `symbols` - Symbols to load.
    /// # Returns
    /// * `anyhow::Result<HistoricCsvPriceHandler>` ready to stream.
    pub fn new(
        event_sender: std::sync::mpsc::Sender<Box<dyn event::Event>>,
        source_kind: settings::PriceSourceKind,
        data_path: &str,
        symbols: &[String],
    ) -> anyhow::Result<Self> {
        let mut observations = Vec::new();

        for symbol in symbols {
            let path = std::path::Path::new(data_path).join(format!("{}.csv", symbol));
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Failed to open data file '{}'", path.display()))?;

            let mut symbol_observations = read_observations(file, source_kind, symbol)?;
            observations.append(&mut symbol_observations);
        }

        // Stable sort: same-timestamp rows keep their per-symbol order.
        observations.sort_by_key(|observation| observation.datetime);

        anyhow::Ok(
            Self {
                event_sender,
                observations,
                cursor: 0,
                latest: std::collections::HashMap::new(),
                current_datetime: None,
                continue_backtest: true,
            }
        )
    }

}

impl price_handler::PriceHandler for HistoricCsvPriceHandler {
    fn get_last_timestamp(&self, symbol: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        self.latest.get(symbol).map(|(datetime, _)| *datetime)
    }

    fn get_current_quote(&self, symbol: &str) -> Option<price_handler::PriceQuote> {
        self.latest.get(symbol).map(|(_, quote)| *quote)
    }

    fn get_current_datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.current_datetime
    }

    fn update(&mut self) -> anyhow::Result<()> {
        match self.observations.get(self.cursor) {
            Some(observation) => {
                self.latest.insert(
                    observation.symbol.clone(),
                    (observation.datetime, observation.quote),
                );
                self.current_datetime = Some(observation.datetime);
                self.cursor += 1;

                self.event_sender.send(Box::new(event::MarketEvent::new()))
                    .map_err(|e| anyhow::anyhow!("Failed to send MarketEvent: {}", e))?;
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

fn read_observations<R: std::io::Read>(
    reader: R,
    source_kind: settings::PriceSourceKind,
    symbol: &str,
) -> anyhow::Result<Vec<Observation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .from_reader(reader);

    let mut observations = Vec::new();
    for record in csv_reader.records() {
        let record = record
            .with_context(|| format!("Failed to read data row for '{}'", symbol))?;

        let datetime = settings::parse_datetime(get_field(&record, 0, "datetime", symbol)?)?;
        let quote = match source_kind {
            settings::PriceSourceKind::Tick => {
                price_handler::PriceQuote::Tick {
                    bid: parse_decimal(get_field(&record, 1, "bid", symbol)?, "bid", symbol)?,
                    ask: parse_decimal(get_field(&record, 2, "ask", symbol)?, "ask", symbol)?,
                }
            }
            settings::PriceSourceKind::Bar => {
                price_handler::PriceQuote::Bar {
                    close: parse_decimal(get_field(&record, 1, "close", symbol)?, "close", symbol)?,
                }
            }
        };

        observations.push(Observation {
            datetime,
            symbol: symbol.to_string(),
            quote,
        });
    }

    anyhow::Ok(observations)
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> anyhow::Result<&'a str> {
    record.get(index)
        .ok_or_else(|| anyhow::anyhow!("Missing '{}' column in data for '{}'", name, symbol))
}

// Monetary fields are constructed from the raw text, never via f64.
fn parse_decimal(
    value: &str,
    name: &str,
    symbol: &str,
) -> anyhow::Result<rust_decimal::Decimal> {
    rust_decimal::Decimal::from_str(value.trim())
        .map_err(|e| anyhow::anyhow!("Invalid '{}' value '{}' for '{}': {}", name, value, symbol, e))
}
