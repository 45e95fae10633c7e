use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
    str::FromStr,
};

use chrono::NaiveDate;
use fxhash::FxHashMap;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::invoice::InvoiceNumber;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(num: i64, scale: u32) -> Self {
        Self(Decimal::new(num, scale))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn from_i64(value: i64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self(value)
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn signum(self) -> i64 {
        if self.is_positive() {
            1
        } else if self.is_negative() {
            -1
        } else {
            0
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Accepts plain decimals and thousands separators (`1,200.50`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        Decimal::from_str(&cleaned).map(Self)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;

    fn mul(self, rhs: Decimal) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;

    fn div(self, rhs: Decimal) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// A person as the bot knows them: the display name typed in commands.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(SmolStr);

impl PersonId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref().trim()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PersonId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shared ledger such as a trip or a household.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(SmolStr);

impl GroupId {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref().trim()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-participant amounts in the order participants were named.
pub type Shares = IndexMap<PersonId, Money>;

/// Signed per-participant deltas applied before the equal division.
pub type Adjustments = IndexMap<PersonId, Money>;

/// Net position per person: positive is owed money, negative owes money.
pub type Balances = FxHashMap<PersonId, Money>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be positive (found {amount})")]
    NonPositiveAmount { field: &'static str, amount: Money },
    #[error("expense has no participants")]
    NoShares,
    #[error("share of '{person}' is negative ({amount})")]
    NegativeShare { person: PersonId, amount: Money },
    #[error("shares add up to {shares} but the total is {total}")]
    SharesDoNotMatchTotal { total: Money, shares: Money },
    #[error("{field} overflow the supported amount range")]
    AmountOverflow { field: &'static str },
}

/// A shared expense fronted by one payer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub payer: PersonId,
    pub total: Money,
    pub shares: Shares,
    pub memo: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<InvoiceNumber>,
}

impl Expense {
    pub fn participants(&self) -> impl Iterator<Item = &PersonId> + '_ {
        self.shares.keys()
    }

    pub fn share_of(&self, person: &PersonId) -> Money {
        self.shares.get(person).copied().unwrap_or(Money::ZERO)
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.payer.is_empty() {
            return Err(RecordValidationError::EmptyField { field: "payer" });
        }
        if !self.total.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount {
                field: "total",
                amount: self.total,
            });
        }
        if self.shares.is_empty() {
            return Err(RecordValidationError::NoShares);
        }
        for (person, amount) in &self.shares {
            if person.is_empty() {
                return Err(RecordValidationError::EmptyField {
                    field: "participant",
                });
            }
            if amount.is_negative() {
                return Err(RecordValidationError::NegativeShare {
                    person: person.clone(),
                    amount: *amount,
                });
            }
        }
        let shares = self
            .shares
            .values()
            .try_fold(Money::ZERO, |sum, share| sum.checked_add(*share))
            .ok_or(RecordValidationError::AmountOverflow { field: "shares" })?;
        if shares != self.total {
            return Err(RecordValidationError::SharesDoNotMatchTotal {
                total: self.total,
                shares,
            });
        }
        Ok(())
    }
}

/// A line in someone's own spending ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalEntry {
    pub owner: PersonId,
    pub item: String,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<InvoiceNumber>,
}

impl PersonalEntry {
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.owner.is_empty() {
            return Err(RecordValidationError::EmptyField { field: "owner" });
        }
        if self.item.trim().is_empty() {
            return Err(RecordValidationError::EmptyField { field: "item" });
        }
        if !self.amount.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount {
                field: "amount",
                amount: self.amount,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundKind {
    TopUp,
    Deduct,
}

/// A movement of a group's shared kitty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundEntry {
    pub member: PersonId,
    pub amount: Money,
    pub kind: FundKind,
    pub date: NaiveDate,
}

impl FundEntry {
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            FundKind::TopUp => self.amount,
            FundKind::Deduct => -self.amount,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.member.is_empty() {
            return Err(RecordValidationError::EmptyField { field: "member" });
        }
        if !self.amount.is_positive() {
            return Err(RecordValidationError::NonPositiveAmount {
                field: "amount",
                amount: self.amount,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    Expense(Expense),
    Personal(PersonalEntry),
    Fund(FundEntry),
}

impl Record {
    pub fn date(&self) -> NaiveDate {
        match self {
            Record::Expense(expense) => expense.date,
            Record::Personal(entry) => entry.date,
            Record::Fund(entry) => entry.date,
        }
    }

    pub fn validate(&self) -> Result<(), RecordValidationError> {
        match self {
            Record::Expense(expense) => expense.validate(),
            Record::Personal(entry) => entry.validate(),
            Record::Fund(entry) => entry.validate(),
        }
    }

    /// Personal scopes only hold the owner's entries; group scopes hold
    /// expenses and fund movements.
    pub fn belongs_to(&self, scope: &Scope) -> bool {
        match (self, scope) {
            (Record::Personal(entry), Scope::Personal(owner)) => &entry.owner == owner,
            (Record::Expense(_) | Record::Fund(_), Scope::Group(_)) => true,
            _ => false,
        }
    }

    pub fn as_expense(&self) -> Option<&Expense> {
        match self {
            Record::Expense(expense) => Some(expense),
            _ => None,
        }
    }

    pub fn as_personal(&self) -> Option<&PersonalEntry> {
        match self {
            Record::Personal(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn as_fund(&self) -> Option<&FundEntry> {
        match self {
            Record::Fund(entry) => Some(entry),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Scope {
    Personal(PersonId),
    Group(GroupId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Personal(owner) => write!(f, "personal:{owner}"),
            Scope::Group(group) => write!(f, "group:{group}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: PersonId,
    pub to: PersonId,
    pub amount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 25).expect("valid date")
    }

    fn expense(total: i64, shares: &[(&str, i64)]) -> Expense {
        Expense {
            payer: PersonId::from("A"),
            total: Money::from_i64(total),
            shares: shares
                .iter()
                .map(|(name, amount)| (PersonId::from(*name), Money::from_i64(*amount)))
                .collect(),
            memo: "lunch".to_string(),
            date: date(),
            invoice_number: None,
        }
    }

    #[rstest]
    #[case::plain("150", Money::from_i64(150))]
    #[case::fraction("666.67", Money::new(66667, 2))]
    #[case::separators(" 1,200 ", Money::from_i64(1200))]
    #[case::negative("-40", Money::from_i64(-40))]
    fn parses_money(#[case] input: &str, #[case] expected: Money) {
        assert_eq!(input.parse::<Money>().expect("valid money"), expected);
    }

    #[test]
    fn money_display_drops_trailing_zeros() {
        assert_eq!(Money::new(15000, 2).to_string(), "150");
        assert_eq!(Money::new(66667, 2).to_string(), "666.67");
    }

    #[test]
    fn person_id_is_trimmed() {
        assert_eq!(PersonId::from("  小明 "), PersonId::from("小明"));
        assert!(PersonId::from("   ").is_empty());
    }

    #[rstest]
    #[case::balanced(expense(300, &[("A", 150), ("B", 150)]), Ok(()))]
    #[case::no_shares(expense(300, &[]), Err(RecordValidationError::NoShares))]
    #[case::mismatch(
        expense(300, &[("A", 100), ("B", 150)]),
        Err(RecordValidationError::SharesDoNotMatchTotal {
            total: Money::from_i64(300),
            shares: Money::from_i64(250),
        })
    )]
    #[case::negative_share(
        expense(300, &[("A", 350), ("B", -50)]),
        Err(RecordValidationError::NegativeShare {
            person: PersonId::from("B"),
            amount: Money::from_i64(-50),
        })
    )]
    #[case::zero_total(
        expense(0, &[("A", 0)]),
        Err(RecordValidationError::NonPositiveAmount {
            field: "total",
            amount: Money::ZERO,
        })
    )]
    fn validates_expense(
        #[case] expense: Expense,
        #[case] expected: Result<(), RecordValidationError>,
    ) {
        assert_eq!(expense.validate(), expected);
    }

    #[test]
    fn share_sum_overflow_is_a_validation_error() {
        let mut expense = expense(1, &[("B", 1)]);
        expense
            .shares
            .insert(PersonId::from("A"), Money::from_decimal(Decimal::MAX));

        assert_eq!(
            expense.validate(),
            Err(RecordValidationError::AmountOverflow { field: "shares" })
        );
    }

    #[test]
    fn personal_record_belongs_only_to_owner_scope() {
        let record = Record::Personal(PersonalEntry {
            owner: PersonId::from("小明"),
            item: "飯糰".to_string(),
            amount: Money::from_i64(40),
            date: date(),
            invoice_number: None,
        });

        assert!(record.belongs_to(&Scope::Personal(PersonId::from("小明"))));
        assert!(!record.belongs_to(&Scope::Personal(PersonId::from("小美"))));
        assert!(!record.belongs_to(&Scope::Group(GroupId::from("大阪"))));
    }

    #[test]
    fn record_serializes_with_kind_tag() {
        let record = Record::Fund(FundEntry {
            member: PersonId::from("A"),
            amount: Money::from_i64(500),
            kind: FundKind::TopUp,
            date: date(),
        });

        let json = serde_json::to_value(&record).expect("serializable");
        assert_eq!(json["type"], "fund");
        assert_eq!(json["kind"], "top_up");
        assert_eq!(json["member"], "A");

        let back: Record = serde_json::from_value(json).expect("deserializable");
        assert_eq!(back, record);
    }
}
