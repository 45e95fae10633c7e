use rust_decimal::Decimal;

use crate::{
    model::{Balances, FundEntry, Money, PersonId},
    services::SettlementContext,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopUpSuggestion {
    pub member: PersonId,
    pub amount: Money,
}

/// Net contribution of each member to the shared pot.
pub fn fund_balances<'a, I>(entries: I) -> Balances
where
    I: IntoIterator<Item = &'a FundEntry>,
{
    let mut balances = Balances::default();
    for entry in entries {
        *balances.entry(entry.member.clone()).or_insert(Money::ZERO) += entry.signed_amount();
    }
    balances
}

/// How much each member below the average contribution should add to catch
/// up. Members missing from `balances` count as having contributed nothing.
pub fn suggest_top_ups(
    balances: &Balances,
    members: &[PersonId],
    context: SettlementContext,
) -> Vec<TopUpSuggestion> {
    if members.is_empty() {
        return Vec::new();
    }

    let contribution_of = |member: &PersonId| balances.get(member).copied().unwrap_or(Money::ZERO);
    let total: Money = members.iter().map(contribution_of).sum();
    let average = total / Decimal::from(members.len());

    let suggestions: Vec<TopUpSuggestion> = members
        .iter()
        .filter_map(|member| {
            let gap = context.round(average - contribution_of(member));
            gap.is_positive().then(|| TopUpSuggestion {
                member: member.clone(),
                amount: gap,
            })
        })
        .collect();

    tracing::debug!(
        member_count = members.len(),
        average = %average,
        suggestion_count = suggestions.len(),
        "Fund top-ups suggested"
    );
    suggestions
}
