#[cfg(all(feature = "zh-tw", feature = "en"))]
compile_error!("Cannot enable both 'zh-tw' and 'en' features at the same time");

use std::fmt::{self, Display};

#[cfg(feature = "zh-tw")]
pub mod strings {
    pub const MEMBER: &str = "成員";
    pub const BALANCE: &str = "收支";
    pub const FROM: &str = "付款人";
    pub const TOTAL: &str = "總計";
    pub const TRANSFERS: &str = "轉帳建議";
    pub const ALL_SQUARE: &str = "大家都結清了 🎉";
    pub const SQUARE: &str = "已結清";
    pub const NO_RECORDS: &str = "⚠️ 查無記錄";
    pub const NO_INVOICES: &str = "沒有附發票號碼的記錄";
    pub const PENDING: &str = "尚未開獎";
    pub const NO_PRIZE: &str = "沒有中獎";
    pub const TOP_UP: &str = "儲值";
    pub const DEDUCT: &str = "扣款";
    pub const FUND_TOTAL: &str = "💼 公費總額";
    pub const SUGGESTED_TOP_UPS: &str = "💡 建議儲值金額";
    pub const FUND_BALANCED: &str = "公費已平衡";
    pub const SPECIAL_PRIZE: &str = "特別獎";
    pub const GRAND_PRIZE: &str = "特獎";
    pub const FIRST_PRIZE: &str = "頭獎";
    pub const SECOND_PRIZE: &str = "二獎";
    pub const THIRD_PRIZE: &str = "三獎";
    pub const FOURTH_PRIZE: &str = "四獎";
    pub const FIFTH_PRIZE: &str = "五獎";
    pub const SIXTH_PRIZE: &str = "六獎";
    pub const NO_POSITIONS: &str = "請指定要刪除的編號";
    pub const NO_MEMBERS: &str = "請至少指定一位成員";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "分帳計算失敗";
    pub const RECORD_STORE: &str = "記帳資料庫";
    pub const GROUP_DIRECTORY: &str = "群組名單";
    pub const WINNING_NUMBERS_FEED: &str = "中獎號碼來源";
}

#[cfg(not(feature = "zh-tw"))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BALANCE: &str = "Balance";
    pub const FROM: &str = "From";
    pub const TOTAL: &str = "Total";
    pub const TRANSFERS: &str = "Suggested transfers";
    pub const ALL_SQUARE: &str = "Everyone is square 🎉";
    pub const SQUARE: &str = "square";
    pub const NO_RECORDS: &str = "⚠️ No records";
    pub const NO_INVOICES: &str = "No entries carry an invoice number";
    pub const PENDING: &str = "Not drawn yet";
    pub const NO_PRIZE: &str = "No prize";
    pub const TOP_UP: &str = "Top-up";
    pub const DEDUCT: &str = "Deduction";
    pub const FUND_TOTAL: &str = "💼 Fund total";
    pub const SUGGESTED_TOP_UPS: &str = "💡 Suggested top-ups";
    pub const FUND_BALANCED: &str = "The fund is balanced";
    pub const SPECIAL_PRIZE: &str = "Special Prize";
    pub const GRAND_PRIZE: &str = "Grand Prize";
    pub const FIRST_PRIZE: &str = "First Prize";
    pub const SECOND_PRIZE: &str = "Second Prize";
    pub const THIRD_PRIZE: &str = "Third Prize";
    pub const FOURTH_PRIZE: &str = "Fourth Prize";
    pub const FIFTH_PRIZE: &str = "Fifth Prize";
    pub const SIXTH_PRIZE: &str = "Sixth Prize";
    pub const NO_POSITIONS: &str = "Tell me which numbers to delete";
    pub const NO_MEMBERS: &str = "At least one member is required";
    pub const SETTLEMENT_CALCULATION_FAILED: &str = "Settlement calculation failed";
    pub const RECORD_STORE: &str = "record store";
    pub const GROUP_DIRECTORY: &str = "group directory";
    pub const WINNING_NUMBERS_FEED: &str = "winning numbers feed";
}

pub use strings::*;

#[cfg(feature = "zh-tw")]
pub fn personal_ledger_title(owner: impl Display) -> String {
    format!("📒【{owner}】個人記帳")
}

#[cfg(feature = "zh-tw")]
pub fn group_report_title(group: impl Display) -> String {
    format!("👥【{group}】團體記帳")
}

#[cfg(feature = "zh-tw")]
pub fn fund_title(group: impl Display) -> String {
    format!("💰【{group}】公費餘額")
}

#[cfg(feature = "zh-tw")]
pub fn invoice_title(owner: impl Display) -> String {
    format!("🧾【{owner}】發票對獎")
}

#[cfg(feature = "zh-tw")]
pub fn deleted(count: usize) -> String {
    format!("🗑️ 已刪除 {count} 筆記錄")
}

#[cfg(feature = "zh-tw")]
pub fn reset(count: usize) -> String {
    format!("🧹 已清除 {count} 筆記錄")
}

#[cfg(feature = "zh-tw")]
pub fn group_created(group: impl Display) -> String {
    format!("✅ 已建立群組 {group}")
}

#[cfg(feature = "zh-tw")]
pub fn group_exists(group: impl Display) -> String {
    format!("⚠️ 群組 {group} 已存在")
}

#[cfg(not(feature = "zh-tw"))]
pub fn personal_ledger_title(owner: impl Display) -> String {
    format!("📒 {owner}'s ledger")
}

#[cfg(not(feature = "zh-tw"))]
pub fn group_report_title(group: impl Display) -> String {
    format!("👥 Group {group}")
}

#[cfg(not(feature = "zh-tw"))]
pub fn fund_title(group: impl Display) -> String {
    format!("💰 Fund of {group}")
}

#[cfg(not(feature = "zh-tw"))]
pub fn invoice_title(owner: impl Display) -> String {
    format!("🧾 Invoice lottery for {owner}")
}

#[cfg(not(feature = "zh-tw"))]
pub fn deleted(count: usize) -> String {
    format!("🗑️ Deleted {count} record(s)")
}

#[cfg(not(feature = "zh-tw"))]
pub fn reset(count: usize) -> String {
    format!("🧹 Cleared {count} record(s)")
}

#[cfg(not(feature = "zh-tw"))]
pub fn group_created(group: impl Display) -> String {
    format!("✅ Created group {group}")
}

#[cfg(not(feature = "zh-tw"))]
pub fn group_exists(group: impl Display) -> String {
    format!("⚠️ Group {group} already exists")
}

/// Which way a non-zero balance points.
pub enum BalanceLine<N, A> {
    IsOwed { name: N, amount: A },
    Owes { name: N, amount: A },
}

pub struct TransferLine<N, A> {
    from: N,
    to: N,
    amount: A,
}

pub fn transfer_line<N, A>(from: N, to: N, amount: A) -> TransferLine<N, A> {
    TransferLine { from, to, amount }
}

pub struct PrizeLine<T, A> {
    tier: T,
    amount: A,
}

pub fn prize_line<T, A>(tier: T, amount: A) -> PrizeLine<T, A> {
    PrizeLine { tier, amount }
}

pub struct TopUpLine<N, A> {
    name: N,
    amount: A,
}

pub fn top_up_line<N, A>(name: N, amount: A) -> TopUpLine<N, A> {
    TopUpLine { name, amount }
}

pub struct RecordNotFoundMessage {
    position: usize,
    len: usize,
}

pub fn record_not_found(position: usize, len: usize) -> RecordNotFoundMessage {
    RecordNotFoundMessage { position, len }
}

pub struct InvalidParticipantMessage<N> {
    name: N,
}

pub fn invalid_participant<N>(name: N) -> InvalidParticipantMessage<N> {
    InvalidParticipantMessage { name }
}

pub struct AdjustmentExceedsTotalMessage<A> {
    total: A,
    adjustments: A,
}

pub fn adjustment_exceeds_total<A>(total: A, adjustments: A) -> AdjustmentExceedsTotalMessage<A> {
    AdjustmentExceedsTotalMessage { total, adjustments }
}

pub struct MalformedCommandMessage<D> {
    detail: D,
}

pub fn malformed_command<D>(detail: D) -> MalformedCommandMessage<D> {
    MalformedCommandMessage { detail }
}

pub struct ServiceUnavailableMessage<S> {
    service: S,
}

pub fn service_unavailable<S>(service: S) -> ServiceUnavailableMessage<S> {
    ServiceUnavailableMessage { service }
}

#[cfg(feature = "zh-tw")]
impl<N: Display, A: Display> Display for BalanceLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceLine::IsOwed { name, amount } => write!(f, "{name} 應收 {amount} 元"),
            BalanceLine::Owes { name, amount } => write!(f, "{name} 應付 {amount} 元"),
        }
    }
}

#[cfg(feature = "zh-tw")]
impl<N: Display, A: Display> Display for TransferLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ➜ {}：{} 元", self.from, self.to, self.amount)
    }
}

#[cfg(feature = "zh-tw")]
impl<T: Display, A: Display> Display for PrizeLine<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🎉 {}！獎金 {} 元", self.tier, self.amount)
    }
}

#[cfg(feature = "zh-tw")]
impl<N: Display, A: Display> Display for TopUpLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}：建議補 {} 元", self.name, self.amount)
    }
}

#[cfg(feature = "zh-tw")]
impl Display for RecordNotFoundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "❌ 找不到第 {} 筆記錄（目前共 {} 筆）",
            self.position, self.len
        )
    }
}

#[cfg(feature = "zh-tw")]
impl<N: Display> Display for InvalidParticipantMessage<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "❌ {} 不在分帳名單中，不能調整金額", self.name)
    }
}

#[cfg(feature = "zh-tw")]
impl<A: Display> Display for AdjustmentExceedsTotalMessage<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "❌ 調整金額合計 {} 元超過總金額 {} 元",
            self.adjustments, self.total
        )
    }
}

#[cfg(feature = "zh-tw")]
impl<D: Display> Display for MalformedCommandMessage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "❌ 指令格式錯誤：{}", self.detail)
    }
}

#[cfg(feature = "zh-tw")]
impl<S: Display> Display for ServiceUnavailableMessage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "⚠️ {}暫時無法使用，請稍後再試", self.service)
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<N: Display, A: Display> Display for BalanceLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceLine::IsOwed { name, amount } => write!(f, "{name} is owed {amount}"),
            BalanceLine::Owes { name, amount } => write!(f, "{name} owes {amount}"),
        }
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<N: Display, A: Display> Display for TransferLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ➜ {}: {}", self.from, self.to, self.amount)
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<T: Display, A: Display> Display for PrizeLine<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🎉 {}! Prize: {}", self.tier, self.amount)
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<N: Display, A: Display> Display for TopUpLine<N, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} should add {}", self.name, self.amount)
    }
}

#[cfg(not(feature = "zh-tw"))]
impl Display for RecordNotFoundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "❌ There is no record #{} (the list has {})",
            self.position, self.len
        )
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<N: Display> Display for InvalidParticipantMessage<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "❌ {} is not splitting this expense, so they cannot have an adjustment",
            self.name
        )
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<A: Display> Display for AdjustmentExceedsTotalMessage<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "❌ Adjustments add up to {}, more than the total of {}",
            self.adjustments, self.total
        )
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<D: Display> Display for MalformedCommandMessage<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "❌ Malformed command: {}", self.detail)
    }
}

#[cfg(not(feature = "zh-tw"))]
impl<S: Display> Display for ServiceUnavailableMessage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "⚠️ The {} is unavailable right now, please try again later",
            self.service
        )
    }
}
