use std::fmt::Write as _;

use splitbook_application::{InvoiceCheck, InvoiceOutcome};
use splitbook_domain::{PersonId, PrizeTier};
use splitbook_i18n as i18n;

pub struct InvoicePresenter;

impl InvoicePresenter {
    pub fn render(owner: &PersonId, checks: &[InvoiceCheck]) -> String {
        let mut reply = String::with_capacity(64 + checks.len() * 64);
        let _ = writeln!(&mut reply, "{}", i18n::invoice_title(owner));

        if checks.is_empty() {
            reply.push_str(i18n::NO_INVOICES);
            return reply;
        }

        for check in checks {
            let _ = writeln!(
                &mut reply,
                "{} [{}] {}: {}",
                check.invoice_number,
                check.period,
                check.entry.item,
                Self::outcome(&check.outcome)
            );
        }
        reply
    }

    pub fn outcome(outcome: &InvoiceOutcome) -> String {
        match outcome {
            InvoiceOutcome::Won(found) => {
                i18n::prize_line(tier_label(found.tier), found.tier.prize_amount()).to_string()
            }
            InvoiceOutcome::NoPrize => i18n::NO_PRIZE.to_string(),
            InvoiceOutcome::Pending => i18n::PENDING.to_string(),
        }
    }
}

pub fn tier_label(tier: PrizeTier) -> &'static str {
    match tier {
        PrizeTier::Special => i18n::SPECIAL_PRIZE,
        PrizeTier::Grand => i18n::GRAND_PRIZE,
        PrizeTier::First => i18n::FIRST_PRIZE,
        PrizeTier::Second => i18n::SECOND_PRIZE,
        PrizeTier::Third => i18n::THIRD_PRIZE,
        PrizeTier::Fourth => i18n::FOURTH_PRIZE,
        PrizeTier::Fifth => i18n::FIFTH_PRIZE,
        PrizeTier::Sixth => i18n::SIXTH_PRIZE,
    }
}
