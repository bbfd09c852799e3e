use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status value the report service uses for a finished document.
pub const STATUS_DONE: &str = "Done";

/// Response shape shared by the create and status endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStatusResponse {
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(rename = "DocumentStorageId", default)]
    pub document_ref: Option<String>,
    #[serde(rename = "TimeStamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Interpretation of a [`ReportStatusResponse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReading {
    /// No status at all: no report job exists.
    Absent,
    /// Any status other than a finished document, including explicit errors.
    NotReady(String),
    Done {
        document_ref: String,
        timestamp: Option<DateTime<Utc>>,
    },
}

impl ReportStatusResponse {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn pending() -> Self {
        Self {
            status: Some("Pending".into()),
            ..Self::default()
        }
    }

    pub fn done(document_ref: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            status: Some(STATUS_DONE.into()),
            document_ref: Some(document_ref.into()),
            timestamp: Some(timestamp),
        }
    }

    /// Empty `Status` and `DocumentStorageId` strings read as absent.
    pub fn reading(&self) -> StatusReading {
        let status = self.status.as_deref().filter(|status| !status.is_empty());
        let document_ref = self.document_ref.as_deref().filter(|doc| !doc.is_empty());
        match (status, document_ref) {
            (None, _) => StatusReading::Absent,
            (Some(STATUS_DONE), Some(document_ref)) => StatusReading::Done {
                document_ref: document_ref.to_string(),
                timestamp: self.timestamp,
            },
            (Some(status), _) => StatusReading::NotReady(status.to_string()),
        }
    }
}

/// Display data for a finished report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadyReport {
    pub document_ref: String,
    pub generated_at: DateTime<Utc>,
    /// `generated_at` rendered in the viewer's local time.
    pub local_timestamp: String,
    pub local_time_zone: String,
    pub show_create_report_button: bool,
    pub same_day_report: bool,
}

/// Lifecycle of the single tracked report job.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportPhase {
    #[default]
    Idle,
    Pending,
    Ready(ReadyReport),
}

impl ReportPhase {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReportPhase::Pending)
    }

    pub fn ready(&self) -> Option<&ReadyReport> {
        match self {
            ReportPhase::Ready(report) => Some(report),
            _ => None,
        }
    }

    /// The document reference is only ever exposed once the job is done.
    pub fn document_ref(&self) -> Option<&str> {
        self.ready().map(|report| report.document_ref.as_str())
    }

    /// Whether the view should offer report generation right now.
    pub fn offers_creation(&self) -> bool {
        match self {
            ReportPhase::Idle => true,
            ReportPhase::Pending => false,
            ReportPhase::Ready(report) => report.show_create_report_button,
        }
    }
}
