//! Coordinator behind the tenant transaction history page.
//!
//! Sequences the list fetch, the merge pass and the report poller, and turns
//! failures into the messages the page shows.

use std::sync::Arc;

use tokio::sync::watch;
use url::form_urlencoded;

use crate::config::HistoryConfig;
use crate::core::scheduler::RetryHandle;
use crate::core::services::{ReportStatusPoller, TransactionMerger};
use crate::core::time::Clock;
use crate::domain::group::MergedGroup;
use crate::domain::report::ReportPhase;
use crate::errors::{HistoryError, HistoryResult};
use crate::gateway::{AgentInfo, SessionContext, TransactionsGateway};

pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "The transaction service is not available now";
pub const NO_TRANSACTIONS_MESSAGE: &str = "There have been no transactions recorded.";
pub const INVALID_FOLIO_MESSAGE: &str = "Invalid folio access";

/// What the transaction list area currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransactionListState {
    #[default]
    Loading,
    Loaded(Vec<MergedGroup>),
    NoTransactions(&'static str),
    Unavailable(&'static str),
}

impl TransactionListState {
    pub fn groups(&self) -> &[MergedGroup] {
        match self {
            TransactionListState::Loaded(groups) => groups,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            TransactionListState::NoTransactions(message)
            | TransactionListState::Unavailable(message) => Some(*message),
            TransactionListState::Loading | TransactionListState::Loaded(_) => None,
        }
    }
}

pub struct TransactionHistoryView<G, S>
where
    G: TransactionsGateway + 'static,
    S: SessionContext,
{
    gateway: Arc<G>,
    session: S,
    config: HistoryConfig,
    poller: ReportStatusPoller<G>,
    transactions: TransactionListState,
    loaded: bool,
    message: Option<&'static str>,
    tenant_closed: bool,
    agent: Option<AgentInfo>,
}

impl<G, S> TransactionHistoryView<G, S>
where
    G: TransactionsGateway + 'static,
    S: SessionContext,
{
    pub fn new(gateway: Arc<G>, session: S, clock: Arc<dyn Clock>, config: HistoryConfig) -> Self {
        let poller = ReportStatusPoller::new(Arc::clone(&gateway), clock, config.clone());
        Self {
            gateway,
            session,
            config,
            poller,
            transactions: TransactionListState::Loading,
            loaded: false,
            message: None,
            tenant_closed: false,
            agent: None,
        }
    }

    /// Fetches and merges the transaction list while checking for an existing
    /// report. The view counts as loaded whatever the fetch outcome.
    pub async fn load(&mut self) -> Option<RetryHandle> {
        self.agent = self.session.default_agent();
        self.tenant_closed = self.session.tenant_is_closed();
        self.transactions = TransactionListState::Loading;
        self.message = None;

        let gateway = Arc::clone(&self.gateway);
        let (fetched, retry) = tokio::join!(
            async move {
                gateway
                    .fetch_transactions()
                    .await
                    .and_then(|report| report.records())
            },
            self.poller.refresh_status()
        );

        self.transactions = match fetched {
            Ok(records) => {
                let merged = TransactionMerger::merge(&records);
                if merged.no_transactions {
                    TransactionListState::NoTransactions(NO_TRANSACTIONS_MESSAGE)
                } else {
                    tracing::info!(
                        records = records.len(),
                        groups = merged.groups.len(),
                        "transaction history loaded"
                    );
                    TransactionListState::Loaded(merged.groups)
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "transaction list unavailable");
                TransactionListState::Unavailable(SERVICE_UNAVAILABLE_MESSAGE)
            }
        };
        self.message = self.transactions.message();
        self.loaded = true;
        retry
    }

    pub async fn create_report(&self) -> Option<RetryHandle> {
        self.poller.create_report().await
    }

    pub async fn refresh_report_status(&self) -> Option<RetryHandle> {
        self.poller.refresh_status().await
    }

    /// Builds the download URL for the generated report.
    ///
    /// Without a current folio the download is refused and the page shows
    /// an invalid access message.
    pub fn download_link(&mut self) -> HistoryResult<String> {
        let folio = self
            .session
            .current_folio_id()
            .filter(|folio| !folio.trim().is_empty());
        let Some(folio) = folio else {
            self.message = Some(INVALID_FOLIO_MESSAGE);
            return Err(HistoryError::InvalidFolioAccess);
        };

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("FileName", &self.config.report_file_name)
            .append_pair("FileType", &self.config.report_file_type)
            .append_pair("FolioId", &folio)
            .finish();
        Ok(format!("{}?{query}", self.gateway.temp_document_url()))
    }

    /// Stops any scheduled report polling.
    pub fn teardown(&self) {
        self.poller.cancel();
    }

    pub fn transactions(&self) -> &TransactionListState {
        &self.transactions
    }

    pub fn report_phase(&self) -> ReportPhase {
        self.poller.phase()
    }

    pub fn subscribe_report(&self) -> watch::Receiver<ReportPhase> {
        self.poller.subscribe()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    pub fn tenant_is_closed(&self) -> bool {
        self.tenant_closed
    }

    pub fn agent(&self) -> Option<&AgentInfo> {
        self.agent.as_ref()
    }
}
