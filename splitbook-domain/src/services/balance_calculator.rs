use crate::model::{Balances, Expense, Money};

/// Running net positions over a stream of expenses.
///
/// The payer is credited the full total and every participant is debited
/// their share, so a payer who also took part ends up with `total - share`.
#[derive(Debug, Default)]
pub struct BalanceAccumulator {
    balances: Balances,
}

impl BalanceAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, expense: &Expense) {
        *self
            .balances
            .entry(expense.payer.clone())
            .or_insert(Money::ZERO) += expense.total;
        for (person, share) in &expense.shares {
            *self.balances.entry(person.clone()).or_insert(Money::ZERO) -= *share;
        }
    }

    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn into_balances(self) -> Balances {
        self.balances
    }
}

pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Exact decimal balances; nothing is rounded here.
    pub fn calculate<'a, I>(&self, expenses: I) -> Balances
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut accumulator = BalanceAccumulator::new();
        let mut count = 0usize;
        for expense in expenses {
            accumulator.apply(expense);
            count += 1;
        }
        tracing::debug!(
            expense_count = count,
            member_count = accumulator.balances().len(),
            "Balances calculated"
        );
        accumulator.into_balances()
    }
}

pub fn compute_balances(expenses: &[Expense]) -> Balances {
    BalanceCalculator.calculate(expenses)
}
