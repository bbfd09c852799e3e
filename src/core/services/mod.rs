pub mod merge_service;
pub mod report_service;

pub use merge_service::{MergeResult, TransactionMerger};
pub use report_service::{after_create, after_poll, ready_report, NextStep, ReportStatusPoller};
