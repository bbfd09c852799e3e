//! External collaborators the history view depends on.
//!
//! Transport, authentication and session storage live behind these traits;
//! this crate only consumes their results.

use async_trait::async_trait;

use crate::domain::report::ReportStatusResponse;
use crate::domain::transaction::TransactionHistoryReport;
use crate::errors::HistoryResult;

/// Report generation endpoints.
#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// Starts generating a new tenant history document.
    async fn create_report(&self) -> HistoryResult<ReportStatusResponse>;

    /// Reads the status of the most recent report job.
    async fn poll_report_status(&self) -> HistoryResult<ReportStatusResponse>;
}

/// Full transaction service surface used by the history view.
#[async_trait]
pub trait TransactionsGateway: ReportGateway {
    /// Fetches the tenant's transaction list, newest first.
    async fn fetch_transactions(&self) -> HistoryResult<TransactionHistoryReport>;

    /// Base URL serving temporary generated documents.
    fn temp_document_url(&self) -> String;
}

/// Agent shown alongside the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Read-only view of the signed-in tenant's session.
pub trait SessionContext: Send + Sync {
    fn current_folio_id(&self) -> Option<String>;

    fn tenant_is_closed(&self) -> bool {
        false
    }

    fn default_agent(&self) -> Option<AgentInfo> {
        None
    }
}
