use tracing::warn;

use crate::base::{MetricValue, StockRecord};
use crate::screening::{EvaluationResult, FieldResult, FieldStatus, RuleCatalog};

const DISPLAY_DECIMALS: i32 = 3;

/// Display form of a value. Rounding here never feeds back into evaluation.
pub fn display_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Number(n) if n.is_finite() => {
            let scale = 10f64.powi(DISPLAY_DECIMALS);
            let rounded = (n * scale).round() / scale;
            // Avoid printing "-0"
            if rounded == 0.0 { "0".to_owned() } else { rounded.to_string() }
        }
        other => other.to_string(),
    }
}

pub struct ScreeningEngine<'a> {
    catalog: &'a RuleCatalog,
}

impl<'a> ScreeningEngine<'a> {
    pub fn new(catalog: &'a RuleCatalog) -> Self {
        ScreeningEngine { catalog }
    }

    /// One result per record field, in record order.
    pub fn evaluate(&self, record: &StockRecord) -> EvaluationResult {
        let fields = record.iter()
            .map(|(field, value)| self.evaluate_field(record.symbol(), field, value))
            .collect();
        EvaluationResult { symbol: record.symbol().to_owned(), fields }
    }

    fn evaluate_field(&self, symbol: &str, field: &str, value: &MetricValue) -> FieldResult {
        let entry = self.catalog.lookup(field);
        let status = if value.is_missing() {
            FieldStatus::Skipped
        } else if let Some(entry) = entry {
            match entry.check(value) {
                Ok(true) => FieldStatus::Pass,
                Ok(false) => FieldStatus::Fail,
                Err(err) => {
                    warn!(%symbol, %field, %value, error = %err, "rule could not be applied, marking unrated");
                    FieldStatus::Unrated
                }
            }
        } else {
            FieldStatus::Unrated
        };

        FieldResult {
            field: field.to_owned(),
            display: display_value(value),
            status,
            rule: entry.map(|e| e.description().to_owned()),
        }
    }
}
