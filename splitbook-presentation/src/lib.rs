#![warn(clippy::uninlined_format_args)]

pub mod command_presenter;
pub mod error_presenter;
pub mod fund_presenter;
pub mod invoice_presenter;
pub mod ledger_presenter;
pub mod settlement_presenter;

pub use command_presenter::CommandPresenter;
pub use error_presenter::format_ledger_error;
pub use fund_presenter::FundPresenter;
pub use invoice_presenter::InvoicePresenter;
pub use ledger_presenter::PersonalLedgerPresenter;
pub use settlement_presenter::SettlementPresenter;
