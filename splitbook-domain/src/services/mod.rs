pub mod balance_calculator;
pub mod expense_splitter;
pub mod fund_calculator;
pub mod lottery_matcher;
pub mod settlement_rounding;
pub mod transfer_planner;

pub use balance_calculator::{BalanceAccumulator, BalanceCalculator, compute_balances};
pub use expense_splitter::{ExpenseSplitter, SplitError, compute_shares};
pub use fund_calculator::{TopUpSuggestion, fund_balances, suggest_top_ups};
pub use lottery_matcher::{LotteryMatcher, PrizeMatch, match_lottery};
pub use settlement_rounding::{
    RoundingMode, SettlementContext, SettlementRoundingError, quantize_balances,
};
pub use transfer_planner::{TransferPlanError, TransferPlanner};
