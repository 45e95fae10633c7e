#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod ledger_service;
pub mod model;
pub mod ports;

pub use error::{ExternalService, LedgerError, MalformedCommand, ServiceError, SettlementError};
pub use ledger_service::LedgerService;
pub use model::{
    FundReport, GroupExpenseRequest, GroupReport, InvoiceCheck, InvoiceOutcome,
    ItemizedExpenseRequest, PersonalLedger,
};
pub use ports::{FeedError, GroupDirectory, RecordStore, StoreError, WinningNumbersFeed};
