use std::fmt::Write as _;

use splitbook_application::FundReport;
use splitbook_domain::{FundEntry, FundKind};
use splitbook_i18n as i18n;

pub struct FundPresenter;

impl FundPresenter {
    pub fn render(report: &FundReport) -> String {
        let mut reply = String::with_capacity(256);
        let _ = writeln!(&mut reply, "{}", i18n::fund_title(&report.group));

        if report.history.is_empty() && report.contributions.is_empty() {
            reply.push_str(i18n::NO_RECORDS);
            return reply;
        }

        for (member, amount) in &report.contributions {
            let _ = writeln!(&mut reply, "{member}: {amount}");
        }
        let _ = writeln!(&mut reply, "{}: {}", i18n::FUND_TOTAL, report.total);

        reply.push('\n');
        if report.top_ups.is_empty() {
            reply.push_str(i18n::FUND_BALANCED);
        } else {
            let _ = writeln!(&mut reply, "{}", i18n::SUGGESTED_TOP_UPS);
            for suggestion in &report.top_ups {
                let _ = writeln!(
                    &mut reply,
                    "- {}",
                    i18n::top_up_line(&suggestion.member, suggestion.amount)
                );
            }
        }
        reply
    }

    pub fn render_history(report: &FundReport) -> String {
        if report.history.is_empty() {
            return i18n::NO_RECORDS.to_string();
        }
        let mut reply = String::new();
        for entry in &report.history {
            let _ = writeln!(&mut reply, "{}", Self::history_line(entry));
        }
        reply
    }

    pub fn history_line(entry: &FundEntry) -> String {
        let (label, sign) = match entry.kind {
            FundKind::TopUp => (i18n::TOP_UP, '+'),
            FundKind::Deduct => (i18n::DEDUCT, '-'),
        };
        format!("{} | {} {label} {sign}{}", entry.date, entry.member, entry.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use splitbook_domain::{GroupId, Money, PersonId, services::TopUpSuggestion};

    fn entry(kind: FundKind) -> FundEntry {
        FundEntry {
            member: PersonId::from("A"),
            amount: Money::from_i64(500),
            kind,
            date: NaiveDate::from_ymd_opt(2025, 4, 1).expect("valid date"),
        }
    }

    #[rstest]
    #[case::top_up(FundKind::TopUp, format!("2025-04-01 | A {} +500", i18n::TOP_UP))]
    #[case::deduct(FundKind::Deduct, format!("2025-04-01 | A {} -500", i18n::DEDUCT))]
    fn history_lines_are_signed(#[case] kind: FundKind, #[case] expected: String) {
        assert_eq!(FundPresenter::history_line(&entry(kind)), expected);
    }

    #[test]
    fn lists_contributions_and_suggestions() {
        let report = FundReport {
            group: GroupId::from("home"),
            history: vec![entry(FundKind::TopUp)],
            contributions: vec![
                (PersonId::from("A"), Money::from_i64(500)),
                (PersonId::from("B"), Money::ZERO),
            ],
            total: Money::from_i64(500),
            top_ups: vec![TopUpSuggestion {
                member: PersonId::from("B"),
                amount: Money::from_i64(250),
            }],
        };

        let reply = FundPresenter::render(&report);

        assert!(reply.contains("A: 500\nB: 0\n"));
        assert!(reply.contains(&format!("{}: 500", i18n::FUND_TOTAL)));
        assert!(reply.contains(&i18n::top_up_line("B", 250).to_string()));
        assert!(!reply.contains(i18n::FUND_BALANCED));
        assert!(FundPresenter::render_history(&report).starts_with("2025-04-01 | A"));
    }
}
