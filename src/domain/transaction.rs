use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::common::Identifiable;
use crate::errors::{HistoryError, HistoryResult};

const AMOUNT: &str = "Amount";
const DATE: &str = "Date";
const DESCRIPTION: &str = "Description";

/// Identifier issued by the transaction service. Any JSON scalar is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(Value);

impl TransactionId {
    pub fn generate() -> Self {
        Self(Value::String(Uuid::new_v4().to_string()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for TransactionId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(raw) => f.write_str(raw),
            other => write!(f, "{other}"),
        }
    }
}

/// A single tenant transaction as reported by the transaction service.
///
/// Only the grouping fields are typed. Amount, date, description and any
/// other business fields stay in `payload` exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: TransactionId,
    #[serde(default, deserialize_with = "journal_number")]
    pub journal_number: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub is_reversal_related: bool,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Transaction {
    pub fn new(journal_number: Option<&str>, amount: f64, description: &str) -> Self {
        let mut payload = Map::new();
        payload.insert(AMOUNT.into(), Value::from(amount));
        payload.insert(DESCRIPTION.into(), Value::from(description));
        Self {
            id: TransactionId::generate(),
            journal_number: journal_number.map(str::to_string),
            is_reversal_related: false,
            payload,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.payload
            .insert(DATE.into(), Value::from(date.format("%Y-%m-%d").to_string()));
        self
    }

    pub fn reversal_related(mut self) -> Self {
        self.is_reversal_related = true;
        self
    }

    /// Journal number, with an empty string read as absent.
    pub fn journal(&self) -> Option<&str> {
        self.journal_number.as_deref().filter(|journal| !journal.is_empty())
    }

    /// Two entries belong to the same journal only when both carry the same
    /// non-empty journal number.
    pub fn shares_journal_with(&self, other: &Transaction) -> bool {
        match (self.journal(), other.journal()) {
            (Some(left), Some(right)) => left == right,
            _ => false,
        }
    }

    /// Numeric amount, also read from numeric strings.
    pub fn amount(&self) -> Option<f64> {
        match self.payload.get(AMOUNT)? {
            Value::Number(number) => number.as_f64(),
            Value::String(raw) => raw.trim().parse().ok(),
            _ => None,
        }
    }

    /// Calendar date of the entry. Accepts plain dates, zone-less date-times
    /// and RFC 3339 timestamps.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_service_date(self.payload.get(DATE)?.as_str()?)
    }

    pub fn description(&self) -> Option<&str> {
        self.payload.get(DESCRIPTION)?.as_str()
    }
}

impl Identifiable for Transaction {
    type Id = TransactionId;

    fn id(&self) -> &TransactionId {
        &self.id
    }
}

fn parse_service_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|at| at.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|at| at.date_naive())
        })
}

fn journal_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(journal) if !journal.is_empty() => Some(journal),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(raw) => !raw.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Envelope returned by the tenant transaction list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionHistoryReport {
    #[serde(default)]
    pub data_list: Option<Vec<HistoryData>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryData {
    #[serde(default)]
    pub details: HistoryDetails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HistoryDetails {
    #[serde(default)]
    pub transactions: Vec<Option<Transaction>>,
}

impl TransactionHistoryReport {
    pub fn from_records(records: Vec<Transaction>) -> Self {
        Self {
            data_list: Some(vec![HistoryData {
                details: HistoryDetails {
                    transactions: records.into_iter().map(Some).collect(),
                },
            }]),
        }
    }

    /// Returns the raw records of the first data entry, newest first.
    ///
    /// A `null` record fails fast instead of being skipped.
    pub fn records(&self) -> HistoryResult<Vec<Transaction>> {
        let Some(first) = self.data_list.as_ref().and_then(|list| list.first()) else {
            return Ok(Vec::new());
        };
        require_entries(&first.details.transactions)
    }
}

/// Unwraps nullable list entries, failing on the first `null`.
pub fn require_entries(entries: &[Option<Transaction>]) -> HistoryResult<Vec<Transaction>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            entry
                .clone()
                .ok_or_else(|| HistoryError::Validation(format!("transaction entry {index} is null")))
        })
        .collect()
}
