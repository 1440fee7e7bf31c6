// kestrel/src/compliance.rs

//! CSV trade journal.
//! Appends one `;`-separated row per executed fill for audit purposes.

use kestrel_core::event;
use kestrel_core::settings;
use kestrel_core::compliance;

pub struct CsvTradeJournal<W: std::io::Write> {
    writer: csv::Writer<W>,
}

impl CsvTradeJournal<std::fs::File> {
    /// Creates (or truncates) the journal file and writes the header row.
    pub fn create<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let file = std::fs::File::create(path.as_ref())
            .map_err(|e| anyhow::anyhow!(
                "Failed to create trade journal '{}': {}",
                path.as_ref().display(),
                e,
            ))?;

        Self::from_writer(file)
    }

}

impl<W: std::io::Write> CsvTradeJournal<W> {
    pub fn from_writer(writer: W) -> anyhow::Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(writer);

        writer.write_record([
            "timeindex",
            "symbol",
            "action",
            "quantity",
            "exchange",
            "price",
            "commission",
        ])?;
        writer.flush()?;

        anyhow::Ok(Self { writer })
    }

}

impl<W: std::io::Write> compliance::ComplianceRecorder for CsvTradeJournal<W> {
    fn record_trade(&mut self, fill_event: &event::FillEvent) -> anyhow::Result<()> {
        self.writer.write_record([
            fill_event.timeindex.format(settings::DATETIME_FORMAT).to_string(),
            fill_event.symbol.clone(),
            fill_event.action.as_str().to_string(),
            fill_event.quantity.to_string(),
            fill_event.exchange.clone(),
            fill_event.price.to_string(),
            fill_event.commission.to_string(),
        ])?;
        self.writer.flush()?;

        anyhow::Ok(())
    }

}
