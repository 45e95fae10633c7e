use std::fmt::Write as _;

use splitbook_application::GroupReport;
use splitbook_domain::{Money, PersonId, Transfer};
use splitbook_i18n::{self as i18n, BalanceLine};

pub struct SettlementPresenter;

impl SettlementPresenter {
    pub fn render(report: &GroupReport) -> String {
        let mut reply = String::with_capacity(256);
        let _ = writeln!(&mut reply, "{}", i18n::group_report_title(&report.group));

        if report.expenses.is_empty() {
            reply.push_str(i18n::NO_RECORDS);
            return reply;
        }

        for (idx, expense) in report.expenses.iter().enumerate() {
            let _ = writeln!(
                &mut reply,
                "{}. {} {} | {} {} → {}",
                idx + 1,
                expense.date,
                expense.memo,
                i18n::FROM,
                expense.payer,
                expense.total
            );
        }
        let _ = writeln!(&mut reply, "{}: {}", i18n::TOTAL, report.total_spent());

        reply.push('\n');
        reply.push_str(&Self::render_balances(&report.balances));
        reply.push('\n');
        reply.push_str(&Self::render_transfers(&report.transfers));
        reply
    }

    pub fn render_balances(balances: &[(PersonId, Money)]) -> String {
        let mut reply = String::new();
        let _ = writeln!(&mut reply, "{}", i18n::BALANCE);
        for (person, balance) in balances {
            let _ = writeln!(&mut reply, "- {}", Self::balance_line(person, *balance));
        }
        reply
    }

    pub fn balance_line(person: &PersonId, balance: Money) -> String {
        if balance.is_positive() {
            BalanceLine::IsOwed {
                name: person,
                amount: balance,
            }
            .to_string()
        } else if balance.is_negative() {
            BalanceLine::Owes {
                name: person,
                amount: balance.abs(),
            }
            .to_string()
        } else {
            format!("{person} {}", i18n::SQUARE)
        }
    }

    pub fn render_transfers(transfers: &[Transfer]) -> String {
        if transfers.is_empty() {
            return i18n::ALL_SQUARE.to_string();
        }
        let mut reply = String::new();
        let _ = writeln!(&mut reply, "{}", i18n::TRANSFERS);
        for transfer in transfers {
            let _ = writeln!(
                &mut reply,
                "- {}",
                i18n::transfer_line(&transfer.from, &transfer.to, transfer.amount)
            );
        }
        reply
    }
}
