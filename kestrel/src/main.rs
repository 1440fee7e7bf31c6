// kestrel/src/main.rs

mod cli;
mod orders;
mod backtest;
mod execution;
mod compliance;
mod price_feed;

#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    let start_time = std::time::Instant::now();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = cli::Args::parse();
    let settings = kestrel_core::settings::Settings::load(&args.config)?;

    let (event_sender, event_receiver) = std::sync::mpsc::channel::<Box<dyn kestrel_core::event::Event>>();

    let price_handler: std::sync::Arc<parking_lot::RwLock<dyn kestrel_core::price_handler::PriceHandler>> =
        std::sync::Arc::new(parking_lot::RwLock::new(price_feed::HistoricCsvPriceHandler::new(
            event_sender.clone(),
            settings.data.source_kind,
            &settings.data.data_path,
            &settings.data.symbols,
        )?));

    let compliance: Option<Box<dyn kestrel_core::compliance::ComplianceRecorder>> =
        match &settings.execution.journal_path {
            Some(journal_path) => Some(Box::new(compliance::CsvTradeJournal::create(journal_path)?)),
            None => None,
        };

    let execution_handler = execution::NaiveExecutionHandler::new(
        event_sender.clone(),
        std::sync::Arc::clone(&price_handler),
        settings.execution.exchange.clone(),
        settings.execution.commission.build(),
        compliance,
    )?;

    let order_schedule = orders::OrderSchedule::new(event_sender, &settings.orders)?;

    let backtest = backtest::Backtest::new(
        &settings.common.mode,
        price_handler,
        event_receiver,
        order_schedule,
        Box::new(execution_handler),
    );

    let summary = backtest.simulate_trading()?;

    println!(
        "Executed {} fills for {} orders, notional {}, total commission {}",
        summary.fills,
        summary.orders,
        summary.notional,
        summary.total_commission,
    );
    println!("The backtest finished in {:.3} seconds", start_time.elapsed().as_secs_f64());

    anyhow::Ok(())
}
