#![doc(test(attr(deny(warnings))))]

//! Tenant History provides the logic behind a tenant's transaction history
//! page: collapsing journal-related transactions into display groups and
//! driving asynchronous PDF report generation.

pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod gateway;
pub mod utils;
pub mod view;

pub use crate::config::HistoryConfig;
pub use crate::core::services::{ReportStatusPoller, TransactionMerger};
pub use crate::domain::{
    MergedGroup, ReportPhase, ReportStatusResponse, Transaction, TransactionId,
};
pub use crate::errors::{HistoryError, HistoryResult};
pub use crate::view::TransactionHistoryView;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tenant history tracing initialized.");
    });
}
