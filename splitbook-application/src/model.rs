use chrono::NaiveDate;
use splitbook_domain::{
    Adjustments, Expense, FundEntry, GroupId, InvoiceNumber, InvoicePeriod, Money, PersonId,
    PersonalEntry, Transfer, services::{PrizeMatch, TopUpSuggestion},
};

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalLedger {
    pub owner: PersonId,
    pub entries: Vec<PersonalEntry>,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupReport {
    pub group: GroupId,
    pub expenses: Vec<Expense>,
    /// Rounded to the currency unit, sorted by person.
    pub balances: Vec<(PersonId, Money)>,
    pub transfers: Vec<Transfer>,
}

impl GroupReport {
    pub fn total_spent(&self) -> Money {
        self.expenses.iter().map(|expense| expense.total).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FundReport {
    pub group: GroupId,
    pub history: Vec<FundEntry>,
    /// One entry per member, in member order.
    pub contributions: Vec<(PersonId, Money)>,
    pub total: Money,
    pub top_ups: Vec<TopUpSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceOutcome {
    Won(PrizeMatch),
    NoPrize,
    /// Winning numbers for the period are not published yet.
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceCheck {
    pub entry: PersonalEntry,
    pub invoice_number: InvoiceNumber,
    pub period: InvoicePeriod,
    pub outcome: InvoiceOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpenseRequest {
    pub payer: PersonId,
    pub total: Money,
    pub participants: Vec<PersonId>,
    pub adjustments: Adjustments,
    pub memo: String,
    pub date: NaiveDate,
    pub invoice_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemizedExpenseRequest {
    pub payer: PersonId,
    pub items: Vec<(PersonId, Money)>,
    pub memo: String,
    pub date: NaiveDate,
    pub invoice_number: Option<String>,
}
