#![warn(clippy::uninlined_format_args)]

pub mod invoice;
pub mod model;
pub mod services;

pub use invoice::{
    InvoiceNumber, InvoiceNumberError, InvoicePeriod, NumberSource, PrizeRule, PrizeTable,
    PrizeTier, WinningNumbers,
};
pub use model::{
    Adjustments, Balances, Expense, FundEntry, FundKind, GroupId, Money, PersonId,
    PersonalEntry, Record, RecordValidationError, Scope, Shares, Transfer,
};
pub use services::{
    BalanceCalculator, ExpenseSplitter, LotteryMatcher, PrizeMatch, RoundingMode,
    SettlementContext, SettlementRoundingError, SplitError, TopUpSuggestion, TransferPlanError,
    TransferPlanner, compute_balances, compute_shares, fund_balances, match_lottery,
    quantize_balances, suggest_top_ups,
};
