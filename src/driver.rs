use std::io::{self, Write};

use tracing::{error, info};

use crate::market_data::{MetricSource, UpstreamError};
use crate::report::{CsvReporter, Reporter};
use crate::screening::{EvaluationResult, ScreeningEngine};

/// Where screened symbols are written
pub enum ReportSink<W: Write> {
    Text { reporter: Reporter, out: W },
    Csv(CsvReporter<W>),
}

impl<W: Write> ReportSink<W> {
    pub fn text(out: W, styled: bool) -> Self {
        ReportSink::Text { reporter: Reporter::new(styled), out }
    }

    pub fn csv(out: W) -> Self {
        ReportSink::Csv(CsvReporter::new(out))
    }

    fn progress(&mut self, index: usize, last: usize) -> io::Result<()> {
        match self {
            ReportSink::Text { out, .. } => writeln!(out, "[{}/{}]", index, last),
            ReportSink::Csv(_) => Ok(()),
        }
    }

    fn report(&mut self, result: &EvaluationResult) -> io::Result<()> {
        match self {
            ReportSink::Text { reporter, out } => out.write_all(reporter.render(result).as_bytes()),
            ReportSink::Csv(csv) => Ok(csv.write(result)?),
        }
    }

    fn failure(&mut self, symbol: &str, err: &UpstreamError) -> io::Result<()> {
        match self {
            ReportSink::Text { reporter, out } => {
                out.write_all(reporter.render_failure(symbol, err).as_bytes())
            }
            ReportSink::Csv(csv) => Ok(csv.write_failure(symbol, err)?),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ReportSink::Text { out, .. } => out.flush(),
            ReportSink::Csv(csv) => csv.flush(),
        }
    }
}

/// Outcome of one symbol. A failed symbol never affects the others.
#[derive(Debug)]
pub struct SymbolOutcome {
    pub symbol: String,
    pub result: Result<EvaluationResult, UpstreamError>,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub outcomes: Vec<SymbolOutcome>,
}

impl BatchSummary {
    pub fn screened(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.screened()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &UpstreamError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(_) => None,
            Err(err) => Some((o.symbol.as_str(), err)),
        })
    }
}

/// Screens symbols one at a time: fetch, evaluate, report.
pub struct Driver<'a, S: MetricSource, W: Write> {
    source: S,
    engine: ScreeningEngine<'a>,
    sink: ReportSink<W>,
}

impl<'a, S: MetricSource, W: Write> Driver<'a, S, W> {
    pub fn new(source: S, engine: ScreeningEngine<'a>, sink: ReportSink<W>) -> Self {
        Driver { source, engine, sink }
    }

    /// Errors only when the report can't be written. Upstream failures are
    /// reported, recorded in the summary, and the batch moves on.
    pub fn run(&mut self, symbols: &[&str]) -> io::Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        let last = symbols.len().saturating_sub(1);

        for (index, &symbol) in symbols.iter().enumerate() {
            self.sink.progress(index, last)?;
            let result = self.source.fetch(symbol)
                .map(|record| self.engine.evaluate(&record));
            match &result {
                Ok(evaluation) => self.sink.report(evaluation)?,
                Err(err) => {
                    error!(%symbol, lookup = ?err.lookup(), error = %err, "failed to fetch metrics");
                    self.sink.failure(symbol, err)?;
                }
            }
            summary.outcomes.push(SymbolOutcome { symbol: symbol.to_owned(), result });
        }

        self.sink.flush()?;
        info!(screened = summary.screened(), failed = summary.failed(), "batch complete");
        Ok(summary)
    }

    pub fn into_sink(self) -> ReportSink<W> {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::base::StockRecord;
    use crate::market_data::Lookup;
    use crate::screening::{FieldStatus, RuleCatalog};

    struct StaticSource {
        records: HashMap<&'static str, f64>,
    }

    impl MetricSource for StaticSource {
        fn fetch(&self, symbol: &str) -> Result<StockRecord, UpstreamError> {
            let market_cap = self.records.get(symbol)
                .ok_or(UpstreamError::EmptyPayload { lookup: Lookup::Profile })?;
            let mut record = StockRecord::builder(symbol);
            record.set("market_cap", *market_cap);
            Ok(record.build())
        }
    }

    fn text_output(driver: Driver<StaticSource, Vec<u8>>) -> String {
        match driver.into_sink() {
            ReportSink::Text { out, .. } => String::from_utf8(out).unwrap(),
            ReportSink::Csv(_) => panic!("expected text sink"),
        }
    }

    #[test]
    fn test_progress_markers_and_isolation() {
        let catalog = RuleCatalog::default();
        let mut records = HashMap::new();
        records.insert("AAA", 5e9);
        records.insert("CCC", 1e6);
        let source = StaticSource { records };
        let mut driver = Driver::new(source, ScreeningEngine::new(&catalog), ReportSink::text(Vec::new(), false));

        let summary = driver.run(&["AAA", "BBB", "CCC"]).unwrap();
        assert_eq!(summary.screened(), 2);
        assert_eq!(summary.failed(), 1);
        let failures: Vec<&str> = summary.failures().map(|(symbol, _)| symbol).collect();
        assert_eq!(failures, vec!["BBB"]);

        let ccc = summary.outcomes[2].result.as_ref().unwrap();
        assert_eq!(ccc.get("market_cap").unwrap().status, FieldStatus::Fail);

        let text = text_output(driver);
        assert_eq!(text, "[0/2]\n\
            symbol: AAA\n\
            market_cap: 5000000000\n\
            ------------------\n\
            [1/2]\n\
            BBB: upstream error: profile response is an empty array\n\
            ------------------\n\
            [2/2]\n\
            symbol: CCC\n\
            market_cap: 1000000 (market_cap > 100000000)\n\
            ------------------\n");
    }

    #[test]
    fn test_csv_sink_rows_for_every_symbol() {
        let catalog = RuleCatalog::default();
        let mut records = HashMap::new();
        records.insert("AAA", 5e9);
        let mut driver = Driver::new(StaticSource { records }, ScreeningEngine::new(&catalog), ReportSink::csv(Vec::new()));
        driver.run(&["AAA", "ZZZ"]).unwrap();

        let out = match driver.into_sink() {
            ReportSink::Csv(csv) => String::from_utf8(csv.into_inner().unwrap()).unwrap(),
            ReportSink::Text { .. } => panic!("expected csv sink"),
        };
        assert_eq!(out, "symbol,field,value,status,rule\n\
            AAA,symbol,AAA,unrated,\n\
            AAA,market_cap,5000000000,pass,market_cap > 100000000\n\
            ZZZ,,profile response is an empty array,error,\n");
    }

    #[test]
    fn test_empty_symbol_list() {
        let catalog = RuleCatalog::default();
        let source = StaticSource { records: HashMap::new() };
        let mut driver = Driver::new(source, ScreeningEngine::new(&catalog), ReportSink::text(Vec::new(), false));
        let summary = driver.run(&[]).unwrap();
        assert!(summary.outcomes.is_empty());
        assert_eq!(text_output(driver), "");
    }
}
