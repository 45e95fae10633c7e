//! Uniform invoice numbers and the bi-monthly lottery draws they enter.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::model::Money;

const PREFIX_LEN: usize = 2;
const DIGITS_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvoiceNumberError {
    #[error("invoice number must be 2 letters and 8 digits (got {0} characters)")]
    InvalidLength(usize),
    #[error("invoice number must start with 2 letters")]
    InvalidPrefix,
    #[error("invoice number must end with 8 digits")]
    InvalidDigits,
}

/// An invoice number such as `AB12345678`, stored upper-case.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber(SmolStr);

impl InvoiceNumber {
    /// Accepts the printed `AB-12345678` form and lower-case prefixes.
    pub fn parse(input: &str) -> Result<Self, InvoiceNumberError> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let len = normalized.chars().count();
        if len != PREFIX_LEN + DIGITS_LEN {
            return Err(InvoiceNumberError::InvalidLength(len));
        }
        if !normalized
            .chars()
            .take(PREFIX_LEN)
            .all(|c| c.is_ascii_uppercase())
        {
            return Err(InvoiceNumberError::InvalidPrefix);
        }
        if !normalized
            .chars()
            .skip(PREFIX_LEN)
            .all(|c| c.is_ascii_digit())
        {
            return Err(InvoiceNumberError::InvalidDigits);
        }

        Ok(Self(SmolStr::new(normalized)))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn prefix(&self) -> &str {
        &self.0[..PREFIX_LEN]
    }

    /// The eight digits the lottery draws against.
    pub fn digits(&self) -> &str {
        &self.0[PREFIX_LEN..]
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = InvoiceNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<InvoiceNumber> for String {
    fn from(value: InvoiceNumber) -> Self {
        value.0.to_string()
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A two-month draw period, identified by its odd first month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInvoicePeriod")]
pub struct InvoicePeriod {
    year: i32,
    first_month: u32,
}

#[derive(Deserialize)]
struct RawInvoicePeriod {
    year: i32,
    first_month: u32,
}

impl TryFrom<RawInvoicePeriod> for InvoicePeriod {
    type Error = String;

    fn try_from(raw: RawInvoicePeriod) -> Result<Self, Self::Error> {
        Self::new(raw.year, raw.first_month)
            .ok_or_else(|| format!("draw periods start on an odd month, not {}", raw.first_month))
    }
}

impl InvoicePeriod {
    pub fn new(year: i32, first_month: u32) -> Option<Self> {
        if !(1..=11).contains(&first_month) || first_month % 2 == 0 {
            return None;
        }
        Some(Self { year, first_month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        let month = date.month();
        let first_month = if month % 2 == 1 { month } else { month - 1 };
        Self {
            year: date.year(),
            first_month,
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn first_month(self) -> u32 {
        self.first_month
    }

    pub fn last_month(self) -> u32 {
        self.first_month + 1
    }
}

impl fmt::Display for InvoicePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{:02}-{:02}",
            self.year,
            self.first_month,
            self.last_month()
        )
    }
}

/// Declared from the highest award to the lowest, so `min` picks the best.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeTier {
    Special,
    Grand,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
}

impl PrizeTier {
    /// Official award in NT$.
    pub fn prize_amount(self) -> Money {
        let amount = match self {
            PrizeTier::Special => 10_000_000,
            PrizeTier::Grand => 2_000_000,
            PrizeTier::First => 200_000,
            PrizeTier::Second => 40_000,
            PrizeTier::Third => 10_000,
            PrizeTier::Fourth => 4_000,
            PrizeTier::Fifth => 1_000,
            PrizeTier::Sixth => 200,
        };
        Money::from_i64(amount)
    }
}

/// Which published numbers a prize rule compares against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberSource {
    Special,
    Grand,
    First,
    AdditionalSixth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeRule {
    pub tier: PrizeTier,
    pub source: NumberSource,
    pub suffix_len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTable {
    pub rules: Vec<PrizeRule>,
}

impl PrizeTable {
    pub fn official() -> Self {
        let rule = |tier, source, suffix_len| PrizeRule {
            tier,
            source,
            suffix_len,
        };
        Self {
            rules: vec![
                rule(PrizeTier::Special, NumberSource::Special, 8),
                rule(PrizeTier::Grand, NumberSource::Grand, 8),
                rule(PrizeTier::First, NumberSource::First, 8),
                rule(PrizeTier::Second, NumberSource::First, 7),
                rule(PrizeTier::Third, NumberSource::First, 6),
                rule(PrizeTier::Fourth, NumberSource::First, 5),
                rule(PrizeTier::Fifth, NumberSource::First, 4),
                rule(PrizeTier::Sixth, NumberSource::First, 3),
                rule(PrizeTier::Sixth, NumberSource::AdditionalSixth, 3),
            ],
        }
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::official()
    }
}

/// Published winning numbers for one draw period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningNumbers {
    pub period: InvoicePeriod,
    #[serde(default)]
    pub special_prize: Option<String>,
    #[serde(default)]
    pub grand_prize: Option<String>,
    #[serde(default)]
    pub first_prizes: Vec<String>,
    #[serde(default)]
    pub additional_sixth_prizes: Vec<String>,
}

impl WinningNumbers {
    pub fn new(period: InvoicePeriod) -> Self {
        Self {
            period,
            special_prize: None,
            grand_prize: None,
            first_prizes: Vec::new(),
            additional_sixth_prizes: Vec::new(),
        }
    }

    pub fn with_special_prize(mut self, number: impl Into<String>) -> Self {
        self.special_prize = Some(number.into());
        self
    }

    pub fn with_grand_prize(mut self, number: impl Into<String>) -> Self {
        self.grand_prize = Some(number.into());
        self
    }

    pub fn with_first_prize(mut self, number: impl Into<String>) -> Self {
        self.first_prizes.push(number.into());
        self
    }

    pub fn with_additional_sixth_prize(mut self, number: impl Into<String>) -> Self {
        self.additional_sixth_prizes.push(number.into());
        self
    }

    pub fn numbers(&self, source: NumberSource) -> &[String] {
        match source {
            NumberSource::Special => self.special_prize.as_slice(),
            NumberSource::Grand => self.grand_prize.as_slice(),
            NumberSource::First => &self.first_prizes,
            NumberSource::AdditionalSixth => &self.additional_sixth_prizes,
        }
    }
}
