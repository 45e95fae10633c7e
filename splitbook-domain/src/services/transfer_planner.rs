use crate::model::{Balances, Money, PersonId, Transfer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferPlanError {
    #[error("balances must sum to zero (found {0})")]
    ImbalancedTotal(Money),
}

/// Turns net balances into a short list of "who pays whom".
pub struct TransferPlanner;

impl TransferPlanner {
    /// Greedy pairing: the largest debtor pays the largest creditor until one
    /// of them is square, then moves on. Produces at most `n - 1` transfers
    /// and the same plan for the same balances.
    pub fn plan(&self, balances: &Balances) -> Result<Vec<Transfer>, TransferPlanError> {
        let total: Money = balances.values().sum();
        if !total.is_zero() {
            return Err(TransferPlanError::ImbalancedTotal(total));
        }

        let mut debtors: Vec<(PersonId, Money)> = Vec::new();
        let mut creditors: Vec<(PersonId, Money)> = Vec::new();
        for (person, balance) in balances {
            if balance.is_negative() {
                debtors.push((person.clone(), balance.abs()));
            } else if balance.is_positive() {
                creditors.push((person.clone(), *balance));
            }
        }
        sort_largest_first(&mut debtors);
        sort_largest_first(&mut creditors);

        let mut transfers = Vec::with_capacity(debtors.len().max(creditors.len()));
        let (mut d, mut c) = (0, 0);
        while d < debtors.len() && c < creditors.len() {
            let amount = debtors[d].1.min(creditors[c].1);
            transfers.push(Transfer {
                from: debtors[d].0.clone(),
                to: creditors[c].0.clone(),
                amount,
            });
            debtors[d].1 -= amount;
            creditors[c].1 -= amount;
            if debtors[d].1.is_zero() {
                d += 1;
            }
            if creditors[c].1.is_zero() {
                c += 1;
            }
        }

        debug_assert!(d == debtors.len() && c == creditors.len());
        Ok(transfers)
    }
}

fn sort_largest_first(entries: &mut [(PersonId, Money)]) {
    entries.sort_by(|(id_a, amount_a), (id_b, amount_b)| {
        amount_b.cmp(amount_a).then_with(|| id_a.cmp(id_b))
    });
}
