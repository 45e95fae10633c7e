use indexmap::IndexSet;
use rust_decimal::Decimal;

use crate::{
    model::{Adjustments, Money, PersonId, Shares},
    services::SettlementContext,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("at least one participant is required")]
    NoParticipants,
    #[error("total must be positive (found {0})")]
    NonPositiveTotal(Money),
    #[error("'{0}' has an adjustment but is not a participant")]
    InvalidParticipant(PersonId),
    #[error("adjustments ({adjustments}) exceed the total ({total})")]
    AdjustmentExceedsTotal { total: Money, adjustments: Money },
    #[error("share of '{0}' would be negative")]
    NegativeShare(PersonId),
}

/// Splits one shared expense into per-participant shares.
pub struct ExpenseSplitter {
    context: SettlementContext,
}

impl ExpenseSplitter {
    pub fn new(context: SettlementContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> SettlementContext {
        self.context
    }

    /// Equal split of `total - Σadjustments`, then each adjustment added on
    /// top of its participant's base share.
    ///
    /// The base share is rounded to the currency unit and the last participant
    /// absorbs whatever the rounding left over, so the shares always add up to
    /// `total` exactly. When rounding up overshoots the total, the excess is
    /// taken back one unit per participant, walking from the end of the list.
    /// Repeated participants count once.
    pub fn split_even(
        &self,
        total: Money,
        participants: &[PersonId],
        adjustments: &Adjustments,
    ) -> Result<Shares, SplitError> {
        if !total.is_positive() {
            return Err(SplitError::NonPositiveTotal(total));
        }

        let participants: IndexSet<&PersonId> = participants.iter().collect();
        let Some(last) = participants.last().copied() else {
            return Err(SplitError::NoParticipants);
        };

        if let Some(outsider) = adjustments
            .keys()
            .find(|person| !participants.contains(person))
        {
            return Err(SplitError::InvalidParticipant(outsider.clone()));
        }

        let adjustment_total: Money = adjustments.values().sum();
        if adjustment_total > total {
            return Err(SplitError::AdjustmentExceedsTotal {
                total,
                adjustments: adjustment_total,
            });
        }

        let count = Decimal::from(participants.len());
        let base = self.context.round((total - adjustment_total) / count);

        let mut shares = Shares::with_capacity(participants.len());
        let mut assigned = Money::ZERO;
        for person in &participants {
            let adjustment = adjustments.get(*person).copied().unwrap_or(Money::ZERO);
            let share = base + adjustment;
            assigned += share;
            shares.insert((*person).clone(), share);
        }

        let remainder = total - assigned;
        if remainder.is_positive() {
            if let Some(share) = shares.get_mut(last) {
                *share += remainder;
            }
            tracing::debug!(
                total = %total,
                base = %base,
                remainder = %remainder,
                absorbed_by = %last,
                "Rounding remainder absorbed by last participant"
            );
        } else if remainder.is_negative() {
            let unreturned = self.return_overshoot(&mut shares, -remainder);
            if let Some(share) = shares.get_mut(last) {
                *share -= unreturned;
            }
            tracing::debug!(
                total = %total,
                base = %base,
                overshoot = %(-remainder),
                unreturned = %unreturned,
                "Rounding overshoot returned from the end of the list"
            );
        }

        if let Some((person, _)) = shares.iter().find(|(_, share)| share.is_negative()) {
            return Err(SplitError::NegativeShare(person.clone()));
        }

        Ok(shares)
    }

    /// Takes `excess` back from the shares one atomic unit at a time, last
    /// participant first, never pushing a share below zero. Returns what could
    /// not be taken back.
    fn return_overshoot(&self, shares: &mut Shares, mut excess: Money) -> Money {
        let unit = self.context.atomic_unit();
        while excess.is_positive() {
            let mut returned = false;
            for share in shares.values_mut().rev() {
                if !excess.is_positive() {
                    break;
                }
                let step = unit.min(excess);
                if *share >= step {
                    *share -= step;
                    excess -= step;
                    returned = true;
                }
            }
            if !returned {
                break;
            }
        }
        excess
    }

    /// Each participant pays for exactly what they had; repeated names are
    /// summed. Returns the total alongside the shares.
    pub fn itemized<I>(&self, items: I) -> Result<(Money, Shares), SplitError>
    where
        I: IntoIterator<Item = (PersonId, Money)>,
    {
        let mut shares = Shares::new();
        for (person, amount) in items {
            if amount.is_negative() {
                return Err(SplitError::NegativeShare(person));
            }
            *shares.entry(person).or_insert(Money::ZERO) += amount;
        }
        if shares.is_empty() {
            return Err(SplitError::NoParticipants);
        }

        let total: Money = shares.values().sum();
        if !total.is_positive() {
            return Err(SplitError::NonPositiveTotal(total));
        }
        Ok((total, shares))
    }
}

impl Default for ExpenseSplitter {
    fn default() -> Self {
        Self::new(SettlementContext::default())
    }
}

/// Splits `total` among `participants` with the default NT$ rounding.
pub fn compute_shares(
    total: Money,
    participants: &[PersonId],
    adjustments: &Adjustments,
) -> Result<Shares, SplitError> {
    ExpenseSplitter::default().split_even(total, participants, adjustments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::RoundingMode;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn splitter() -> ExpenseSplitter {
        ExpenseSplitter::default()
    }

    fn people(names: &[&str]) -> Vec<PersonId> {
        names.iter().map(|name| PersonId::from(*name)).collect()
    }

    fn amounts(entries: &[(&str, i64)]) -> Shares {
        entries
            .iter()
            .map(|(name, amount)| (PersonId::from(*name), Money::from_i64(*amount)))
            .collect()
    }

    #[rstest]
    #[case::even(300, &["A", "B"], &[], &[("A", 150), ("B", 150)])]
    #[case::adjusted_with_remainder(
        2300,
        &["A", "B", "C"],
        &[("A", 300)],
        &[("A", 967), ("B", 667), ("C", 666)]
    )]
    #[case::remainder_to_last(100, &["A", "B", "C"], &[], &[("A", 33), ("B", 33), ("C", 34)])]
    #[case::negative_adjustment(
        1000,
        &["A", "B"],
        &[("A", -200)],
        &[("A", 400), ("B", 600)]
    )]
    #[case::duplicate_participant(300, &["A", "B", "A"], &[], &[("A", 150), ("B", 150)])]
    #[case::adjustment_equals_total(500, &["A", "B"], &[("A", 500)], &[("A", 500), ("B", 0)])]
    #[case::overshoot_nine_by_six(
        9,
        &["A", "B", "C", "D", "E", "F"],
        &[],
        &[("A", 2), ("B", 2), ("C", 2), ("D", 1), ("E", 1), ("F", 1)]
    )]
    #[case::overshoot_eleven_by_seven(
        11,
        &["A", "B", "C", "D", "E", "F", "G"],
        &[],
        &[("A", 2), ("B", 2), ("C", 2), ("D", 2), ("E", 1), ("F", 1), ("G", 1)]
    )]
    #[case::overshoot_thirteen_by_eight(
        13,
        &["A", "B", "C", "D", "E", "F", "G", "H"],
        &[],
        &[("A", 2), ("B", 2), ("C", 2), ("D", 2), ("E", 2), ("F", 1), ("G", 1), ("H", 1)]
    )]
    #[case::overshoot_skips_zero_share(
        5,
        &["A", "B", "C", "D"],
        &[("D", -2)],
        &[("A", 2), ("B", 2), ("C", 1), ("D", 0)]
    )]
    fn splits_evenly(
        splitter: ExpenseSplitter,
        #[case] total: i64,
        #[case] participants: &[&str],
        #[case] adjustments: &[(&str, i64)],
        #[case] expected: &[(&str, i64)],
    ) {
        let shares = splitter
            .split_even(
                Money::from_i64(total),
                &people(participants),
                &amounts(adjustments),
            )
            .expect("split should succeed");

        assert_eq!(shares, amounts(expected));
        assert_eq!(shares.values().sum::<Money>(), Money::from_i64(total));
    }

    #[rstest]
    #[case::no_participants(300, &[], &[], SplitError::NoParticipants)]
    #[case::zero_total(0, &["A"], &[], SplitError::NonPositiveTotal(Money::ZERO))]
    #[case::outsider(
        300,
        &["A", "B"],
        &[("Z", 10)],
        SplitError::InvalidParticipant(PersonId::from("Z"))
    )]
    #[case::exceeds_total(
        300,
        &["A", "B"],
        &[("A", 200), ("B", 101)],
        SplitError::AdjustmentExceedsTotal {
            total: Money::from_i64(300),
            adjustments: Money::from_i64(301),
        }
    )]
    #[case::negative_share(
        100,
        &["A", "B"],
        &[("A", -200)],
        SplitError::NegativeShare(PersonId::from("A"))
    )]
    fn rejects_invalid_splits(
        splitter: ExpenseSplitter,
        #[case] total: i64,
        #[case] participants: &[&str],
        #[case] adjustments: &[(&str, i64)],
        #[case] expected: SplitError,
    ) {
        let result = splitter.split_even(
            Money::from_i64(total),
            &people(participants),
            &amounts(adjustments),
        );
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn splits_to_cents_when_scale_allows() {
        let splitter = ExpenseSplitter::new(SettlementContext {
            scale: 2,
            rounding_mode: RoundingMode::HalfUp,
        });

        let shares = splitter
            .split_even(Money::from_i64(100), &people(&["A", "B", "C"]), &Shares::new())
            .expect("split should succeed");

        assert_eq!(shares[&PersonId::from("A")], Money::new(3333, 2));
        assert_eq!(shares[&PersonId::from("B")], Money::new(3333, 2));
        assert_eq!(shares[&PersonId::from("C")], Money::new(3334, 2));
    }

    #[rstest]
    fn itemized_sums_repeated_names(splitter: ExpenseSplitter) {
        let (total, shares) = splitter
            .itemized([
                (PersonId::from("小明"), Money::from_i64(400)),
                (PersonId::from("小花"), Money::from_i64(200)),
                (PersonId::from("小明"), Money::from_i64(50)),
            ])
            .expect("itemized split should succeed");

        assert_eq!(total, Money::from_i64(650));
        assert_eq!(shares, amounts(&[("小明", 450), ("小花", 200)]));
    }

    #[rstest]
    fn itemized_rejects_empty(splitter: ExpenseSplitter) {
        assert_eq!(
            splitter.itemized(Vec::new()),
            Err(SplitError::NoParticipants)
        );
    }

    proptest! {
        #[test]
        fn shares_always_sum_to_total(
            total in 1i64..=1_000_000,
            participant_count in 1usize..=8,
            raw_adjustments in prop::collection::vec(-500i64..=500, 0..=8),
        ) {
            let participants: Vec<PersonId> = (0..participant_count)
                .map(|idx| PersonId::new(format!("p{idx}")))
                .collect();
            let adjustments: Adjustments = raw_adjustments
                .iter()
                .take(participant_count)
                .enumerate()
                .map(|(idx, amount)| (participants[idx].clone(), Money::from_i64(*amount)))
                .collect();

            let total = Money::from_i64(total);
            let adjustment_total: Money = adjustments.values().sum();
            let base = SettlementContext::default()
                .round((total - adjustment_total) / Decimal::from(participant_count));
            let adjustment_sinks_share = adjustments.values().any(|adj| (base + *adj).is_negative());

            match compute_shares(total, &participants, &adjustments) {
                Ok(shares) => {
                    prop_assert_eq!(shares.len(), participant_count);
                    prop_assert_eq!(shares.values().sum::<Money>(), total);
                    prop_assert!(shares.values().all(|share| !share.is_negative()));
                }
                Err(SplitError::AdjustmentExceedsTotal { .. }) => {
                    prop_assert!(adjustment_total > total);
                }
                Err(SplitError::NegativeShare(person)) => {
                    prop_assert!(
                        adjustment_sinks_share,
                        "{person} went negative without a sinking adjustment"
                    );
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
        }

        #[test]
        fn small_even_splits_never_fail(
            total in 1i64..=40,
            participant_count in 1usize..=12,
        ) {
            let participants: Vec<PersonId> = (0..participant_count)
                .map(|idx| PersonId::new(format!("p{idx}")))
                .collect();

            let shares = compute_shares(Money::from_i64(total), &participants, &Adjustments::new());

            match shares {
                Ok(shares) => {
                    prop_assert_eq!(shares.values().sum::<Money>(), Money::from_i64(total));
                    prop_assert!(shares.values().all(|share| !share.is_negative()));
                }
                Err(err) => prop_assert!(false, "{total} among {participant_count}: {err}"),
            }
        }
    }
}
