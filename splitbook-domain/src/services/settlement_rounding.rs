//! Presentation-time rounding of balances to the currency's smallest unit.
//!
//! Balances are accumulated exactly and only rounded here. Rounding each
//! balance independently can break the zero-sum property, so after rounding
//! the unit surplus (or deficit) is handed back one unit at a time to the
//! members who gained (or lost) the most from rounding.

use crate::model::{Balances, Money, PersonId};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoundingMode {
    /// Round half away from zero (0.5 -> 1, -0.5 -> -1).
    #[default]
    HalfUp,
    /// Banker's rounding.
    HalfEven,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// How amounts are rounded: decimal places of the atomic unit plus the
/// rounding mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementContext {
    /// 0 for NT$ and JPY, 2 for USD.
    pub scale: u32,
    pub rounding_mode: RoundingMode,
}

impl SettlementContext {
    /// NT$ has no minor unit in everyday use.
    pub fn twd_default() -> Self {
        Self {
            scale: 0,
            rounding_mode: RoundingMode::HalfUp,
        }
    }

    pub fn atomic_unit(self) -> Money {
        Money::new(1, self.scale)
    }

    pub fn round(self, amount: Money) -> Money {
        Money::from_decimal(
            amount
                .as_decimal()
                .round_dp_with_strategy(self.scale, self.rounding_mode.strategy()),
        )
    }
}

impl Default for SettlementContext {
    fn default() -> Self {
        Self::twd_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettlementRoundingError {
    #[error("balances must sum to zero (found {0})")]
    ImbalancedTotal(Money),
    #[error("rounding adjustment count is out of range")]
    InvalidAdjustmentCount,
    #[error("rounded balances failed to sum to zero")]
    ZeroSumInvariantViolation,
    #[error("rounded value is not an integral number of units")]
    NonIntegral,
    #[error("scale {scale} is not supported (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}

const MAX_SETTLEMENT_SCALE: u32 = 22;
const EPSILON_OP_COUNT_BUDGET: i64 = 1_000_000;
const EPSILON_SAFETY_FACTOR: i64 = 100;

struct Entry {
    person: PersonId,
    original: Decimal,
    rounded: Decimal,
    diff: Decimal,
}

/// Rounds every balance to the atomic unit while keeping the total at zero.
///
/// Candidates for the unit corrections are ranked by how much they gained
/// from rounding (larger `diff` first when the rounded sum is positive,
/// smaller first when negative), then by a stable SHA-256 key of the person
/// id, then by the id itself.
pub fn quantize_balances(
    balances: &Balances,
    context: SettlementContext,
) -> Result<Balances, SettlementRoundingError> {
    validate_scale(context.scale)?;
    let atomic_unit = context.atomic_unit().as_decimal();
    let epsilon = settlement_epsilon(context.scale);
    let original_sum: Money = balances.values().sum();
    if original_sum.abs().as_decimal() > epsilon {
        tracing::error!(
            reject_reason = "input_imbalance",
            member_count = balances.len(),
            epsilon = %epsilon,
            sum_original = %original_sum,
            "Settlement quantization rejected due to input imbalance"
        );
        return Err(SettlementRoundingError::ImbalancedTotal(original_sum));
    }

    let strategy = context.rounding_mode.strategy();
    let mut entries: Vec<Entry> = Vec::with_capacity(balances.len());
    let mut v_int: i128 = 0;
    for (person, money) in balances {
        let original = money.as_decimal();
        let units = quantize_to_int(original, atomic_unit, strategy)?;
        let rounded = Decimal::from(units) * atomic_unit;
        v_int = v_int
            .checked_add(units)
            .ok_or(SettlementRoundingError::InvalidAdjustmentCount)?;
        entries.push(Entry {
            person: person.clone(),
            original,
            rounded,
            diff: rounded - original,
        });
    }

    if v_int != 0 {
        let adjustment_count = usize::try_from(v_int.unsigned_abs())
            .map_err(|_| SettlementRoundingError::InvalidAdjustmentCount)?;
        if adjustment_count > entries.len() {
            tracing::error!(
                reject_reason = "k_gt_n",
                v_int,
                adjustment_count,
                member_count = entries.len(),
                "Adjustment count exceeds member count during settlement quantization"
            );
            return Err(SettlementRoundingError::InvalidAdjustmentCount);
        }

        let score_sign = if v_int > 0 {
            Decimal::ONE
        } else {
            Decimal::NEGATIVE_ONE
        };
        let mut ranked: Vec<(usize, Decimal, [u8; 32])> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                (
                    idx,
                    entry.diff * score_sign,
                    stable_key(&entry.person, context),
                )
            })
            .collect();
        ranked.sort_by(|(idx_a, score_a, key_a), (idx_b, score_b, key_b)| {
            score_b
                .cmp(score_a)
                .then_with(|| key_a.cmp(key_b))
                .then_with(|| entries[*idx_a].person.cmp(&entries[*idx_b].person))
        });

        let adjustment = if v_int > 0 { -atomic_unit } else { atomic_unit };
        for (idx, _, _) in ranked.iter().take(adjustment_count) {
            entries[*idx].rounded += adjustment;
        }

        tracing::debug!(
            v_int,
            adjustment_count,
            member_count = entries.len(),
            sum_original = %original_sum,
            "Settlement quantization repaired rounding drift"
        );

        let repaired: Decimal = entries.iter().map(|entry| entry.rounded).sum();
        if !repaired.is_zero() {
            tracing::error!(
                reject_reason = "zero_sum_invariant_violation",
                member_count = entries.len(),
                sum_repaired = %repaired,
                "Settlement quantization failed zero-sum invariant check"
            );
            return Err(SettlementRoundingError::ZeroSumInvariantViolation);
        }
    }

    debug_assert!(
        entries
            .iter()
            .all(|entry| (entry.rounded - entry.original).abs() <= atomic_unit * Decimal::TWO)
    );

    Ok(entries
        .into_iter()
        .map(|entry| (entry.person, Money::from_decimal(entry.rounded)))
        .collect())
}

fn settlement_epsilon(scale: u32) -> Decimal {
    let baseline = Decimal::new(1, scale + 6);
    let epsilon_min = Decimal::from(EPSILON_SAFETY_FACTOR * EPSILON_OP_COUNT_BUDGET)
        * Decimal::from_i128_with_scale(1, 28);
    baseline.max(epsilon_min)
}

fn validate_scale(scale: u32) -> Result<(), SettlementRoundingError> {
    if scale <= MAX_SETTLEMENT_SCALE {
        return Ok(());
    }
    Err(SettlementRoundingError::UnsupportedScale {
        scale,
        max_supported: MAX_SETTLEMENT_SCALE,
    })
}

fn stable_key(person: &PersonId, context: SettlementContext) -> [u8; 32] {
    let rounding_mode_tag = match context.rounding_mode {
        RoundingMode::HalfUp => 0_u8,
        RoundingMode::HalfEven => 1_u8,
    };

    let mut hasher = Sha256::new();
    hasher.update([1_u8]); // format version
    hasher.update(person.as_str().as_bytes());
    hasher.update([0_u8]);
    hasher.update(context.scale.to_be_bytes());
    hasher.update([rounding_mode_tag]);

    let digest = hasher.finalize();
    let mut out = [0_u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn quantize_to_int(
    original: Decimal,
    atomic_unit: Decimal,
    strategy: RoundingStrategy,
) -> Result<i128, SettlementRoundingError> {
    let q_decimal = (original / atomic_unit).round_dp_with_strategy(0, strategy);
    let Some(q_i) = q_decimal.to_i128() else {
        tracing::warn!(
            original = %original,
            atomic_unit = %atomic_unit,
            "Quantization unit conversion failed"
        );
        return Err(SettlementRoundingError::NonIntegral);
    };
    Ok(q_i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal")
    }

    fn person(name: &str) -> PersonId {
        PersonId::from(name)
    }

    fn balances(entries: &[(&str, &str)]) -> Balances {
        entries
            .iter()
            .map(|(name, value)| (person(name), Money::from_decimal(dec(value))))
            .collect()
    }

    #[rstest]
    #[case::half_up(RoundingMode::HalfUp, "2.5", "3")]
    #[case::half_even(RoundingMode::HalfEven, "2.5", "2")]
    #[case::negative_half_up(RoundingMode::HalfUp, "-2.5", "-3")]
    #[case::third(RoundingMode::HalfUp, "666.6667", "667")]
    fn context_rounds_to_scale(
        #[case] mode: RoundingMode,
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let context = SettlementContext {
            scale: 0,
            rounding_mode: mode,
        };
        assert_eq!(
            context.round(Money::from_decimal(dec(input))),
            Money::from_decimal(dec(expected))
        );
    }

    #[test]
    fn rejects_unsupported_scale() {
        let context = SettlementContext {
            scale: MAX_SETTLEMENT_SCALE + 1,
            ..SettlementContext::twd_default()
        };

        assert_eq!(
            quantize_balances(&balances(&[("A", "0")]), context),
            Err(SettlementRoundingError::UnsupportedScale {
                scale: MAX_SETTLEMENT_SCALE + 1,
                max_supported: MAX_SETTLEMENT_SCALE,
            })
        );
    }

    #[test]
    fn rejects_imbalanced_total() {
        let result = quantize_balances(
            &balances(&[("A", "0.1"), ("B", "0")]),
            SettlementContext::twd_default(),
        );
        assert!(matches!(
            result,
            Err(SettlementRoundingError::ImbalancedTotal(_))
        ));
    }

    #[test]
    fn adjusts_negative_error_with_stable_tie_break() {
        let context = SettlementContext::twd_default();
        let rounded = quantize_balances(
            &balances(&[("A", "0.4"), ("B", "0.4"), ("C", "-0.8")]),
            context,
        )
        .expect("quantize should succeed");

        let (selected, other) = if stable_key(&person("A"), context) <= stable_key(&person("B"), context)
        {
            (person("A"), person("B"))
        } else {
            (person("B"), person("A"))
        };

        assert_eq!(rounded.get(&selected), Some(&Money::from_i64(1)));
        assert_eq!(rounded.get(&other), Some(&Money::from_i64(0)));
        assert_eq!(rounded.get(&person("C")), Some(&Money::from_i64(-1)));
    }

    #[test]
    fn unit_goes_to_member_who_gained_most() {
        // A and B gain 0.33 each from rounding, C gains 0.34 and gives the unit back.
        let rounded = quantize_balances(
            &balances(&[("A", "666.67"), ("B", "666.67"), ("C", "-1333.34")]),
            SettlementContext::twd_default(),
        )
        .expect("quantize should succeed");

        let total: Money = rounded.values().sum();
        assert!(total.is_zero());
        assert_eq!(rounded.get(&person("A")), Some(&Money::from_i64(667)));
        assert_eq!(rounded.get(&person("B")), Some(&Money::from_i64(667)));
        assert_eq!(rounded.get(&person("C")), Some(&Money::from_i64(-1334)));
    }

    #[test]
    fn already_integral_balances_are_unchanged() {
        let input = balances(&[("A", "150"), ("B", "-150")]);
        let rounded =
            quantize_balances(&input, SettlementContext::twd_default()).expect("quantize");
        assert_eq!(rounded, input);
    }

    proptest! {
        #[test]
        fn quantized_balances_sum_to_zero(
            cents in prop::collection::vec(-1_000_000i64..=1_000_000, 1..=8),
        ) {
            let mut input = Balances::default();
            let mut sum = 0i64;
            for (idx, value) in cents.iter().enumerate() {
                input.insert(person(&format!("m{idx}")), Money::new(*value, 2));
                sum += value;
            }
            input.insert(person("last"), Money::new(-sum, 2));

            let rounded = quantize_balances(&input, SettlementContext::twd_default())
                .expect("balanced input should quantize");
            let total: Money = rounded.values().sum();
            prop_assert!(total.is_zero());
            for (member, original) in &input {
                let diff = (rounded[member] - *original).abs();
                prop_assert!(diff <= Money::from_i64(2));
            }
        }
    }
}
