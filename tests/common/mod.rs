#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tenant_history::core::FixedClock;
use tenant_history::domain::TransactionHistoryReport;
use tenant_history::gateway::{AgentInfo, ReportGateway, SessionContext, TransactionsGateway};
use tenant_history::{HistoryError, HistoryResult, ReportStatusResponse, Transaction};

pub const DOCUMENT_URL: &str = "https://portal.example.com/api/documents/temp";

/// A scripted reply from the report endpoints.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(ReportStatusResponse),
    Fail,
}

impl Reply {
    fn into_result(self) -> HistoryResult<ReportStatusResponse> {
        match self {
            Reply::Status(response) => Ok(response),
            Reply::Fail => Err(HistoryError::ServiceUnavailable("connection reset".into())),
        }
    }
}

/// In-memory transaction service that replays queued responses.
///
/// An exhausted poll queue answers with "no report".
pub struct ScriptedGateway {
    history: Mutex<Option<TransactionHistoryReport>>,
    creates: Mutex<VecDeque<Reply>>,
    polls: Mutex<VecDeque<Reply>>,
    create_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::with_history(Some(TransactionHistoryReport::default()))
    }

    pub fn with_records(records: Vec<Transaction>) -> Self {
        Self::with_history(Some(TransactionHistoryReport::from_records(records)))
    }

    /// `None` makes the list fetch fail.
    pub fn with_history(history: Option<TransactionHistoryReport>) -> Self {
        Self {
            history: Mutex::new(history),
            creates: Mutex::new(VecDeque::new()),
            polls: Mutex::new(VecDeque::new()),
            create_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self::with_history(None)
    }

    pub fn push_create(&self, reply: Reply) {
        self.creates.lock().unwrap().push_back(reply);
    }

    pub fn push_polls<I: IntoIterator<Item = Reply>>(&self, replies: I) {
        self.polls.lock().unwrap().extend(replies);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReportGateway for ScriptedGateway {
    async fn create_report(&self) -> HistoryResult<ReportStatusResponse> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.creates.lock().unwrap().pop_front();
        reply
            .unwrap_or(Reply::Status(ReportStatusResponse::pending()))
            .into_result()
    }

    async fn poll_report_status(&self) -> HistoryResult<ReportStatusResponse> {
        self.poll_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.polls.lock().unwrap().pop_front();
        reply
            .unwrap_or(Reply::Status(ReportStatusResponse::idle()))
            .into_result()
    }
}

#[async_trait]
impl TransactionsGateway for ScriptedGateway {
    async fn fetch_transactions(&self) -> HistoryResult<TransactionHistoryReport> {
        self.history
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| HistoryError::ServiceUnavailable("api gateway timeout".into()))
    }

    fn temp_document_url(&self) -> String {
        DOCUMENT_URL.into()
    }
}

/// Session with fixed values.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    pub folio_id: Option<String>,
    pub closed: bool,
    pub agent: Option<AgentInfo>,
}

impl StaticSession {
    pub fn with_folio(folio: &str) -> Self {
        Self {
            folio_id: Some(folio.into()),
            ..Self::default()
        }
    }
}

impl SessionContext for StaticSession {
    fn current_folio_id(&self) -> Option<String> {
        self.folio_id.clone()
    }

    fn tenant_is_closed(&self) -> bool {
        self.closed
    }

    fn default_agent(&self) -> Option<AgentInfo> {
        self.agent.clone()
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::utc(fixed_now()))
}
