pub mod common;
pub mod group;
pub mod report;
pub mod transaction;

pub use common::Identifiable;
pub use group::MergedGroup;
pub use report::{ReadyReport, ReportPhase, ReportStatusResponse, StatusReading};
pub use transaction::{Transaction, TransactionHistoryReport, TransactionId};
