use std::fmt::Write as _;

use splitbook_application::PersonalLedger;
use splitbook_domain::PersonalEntry;
use splitbook_i18n as i18n;

pub struct PersonalLedgerPresenter;

impl PersonalLedgerPresenter {
    /// Numbered listing; the numbers are the positions `delete_personal`
    /// accepts.
    pub fn render(ledger: &PersonalLedger) -> String {
        let mut reply = String::with_capacity(64 + ledger.entries.len() * 48);
        let _ = writeln!(&mut reply, "{}", i18n::personal_ledger_title(&ledger.owner));

        if ledger.entries.is_empty() {
            reply.push_str(i18n::NO_RECORDS);
            return reply;
        }

        for (idx, entry) in ledger.entries.iter().enumerate() {
            let _ = writeln!(&mut reply, "{}. {}", idx + 1, Self::entry_line(entry));
        }
        let _ = write!(&mut reply, "{}: {}", i18n::TOTAL, ledger.total);
        reply
    }

    pub fn entry_line(entry: &PersonalEntry) -> String {
        match &entry.invoice_number {
            Some(number) => format!("{} {}: {} ({number})", entry.date, entry.item, entry.amount),
            None => format!("{} {}: {}", entry.date, entry.item, entry.amount),
        }
    }
}
