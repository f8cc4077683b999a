use std::fmt;

pub mod engine;
pub mod rules;

pub use engine::ScreeningEngine;
pub use rules::{PredicateError, RuleCatalog, RuleEntry, Threshold};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStatus {
    Pass,
    Fail,
    /// No rule for this field
    Unrated,
    /// Value was null
    Skipped,
}

impl FieldStatus {
    pub fn as_str(&self) -> &'static str {
        match *self {
            FieldStatus::Pass => "pass",
            FieldStatus::Fail => "fail",
            FieldStatus::Unrated => "unrated",
            FieldStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldResult {
    pub field: String,
    pub display: String,
    pub status: FieldStatus,
    /// Rule description, set whenever the field has a catalog entry
    pub rule: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationResult {
    pub symbol: String,
    pub fields: Vec<FieldResult>,
}

impl EvaluationResult {
    pub fn count(&self, status: FieldStatus) -> usize {
        self.fields.iter().filter(|f| f.status == status).count()
    }

    pub fn get(&self, field: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.field == field)
    }
}
