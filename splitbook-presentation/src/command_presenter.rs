use std::fmt::Write as _;

use splitbook_domain::{Expense, GroupId, PersonId, PersonalEntry};
use splitbook_i18n as i18n;

use crate::ledger_presenter::PersonalLedgerPresenter;

/// Short acknowledgements for commands that change the ledger.
pub struct CommandPresenter;

impl CommandPresenter {
    pub fn deleted_personal(entries: &[PersonalEntry]) -> String {
        let mut reply = i18n::deleted(entries.len());
        for entry in entries {
            let _ = write!(&mut reply, "\n- {}", PersonalLedgerPresenter::entry_line(entry));
        }
        reply
    }

    pub fn deleted_expenses(expenses: &[Expense]) -> String {
        let mut reply = i18n::deleted(expenses.len());
        for expense in expenses {
            let _ = write!(
                &mut reply,
                "\n- {} {} | {} {} → {}",
                expense.date,
                expense.memo,
                i18n::FROM,
                expense.payer,
                expense.total
            );
        }
        reply
    }

    pub fn reset(count: usize) -> String {
        i18n::reset(count)
    }

    pub fn group_created(group: &GroupId, created: bool, members: &[PersonId]) -> String {
        if !created {
            return i18n::group_exists(group);
        }
        format!("{}\n{}", i18n::group_created(group), Self::member_line(members))
    }

    pub fn group_members(group: &GroupId, members: Option<&[PersonId]>) -> String {
        match members {
            Some(members) => format!("👥 {group}\n{}", Self::member_line(members)),
            None => i18n::NO_RECORDS.to_string(),
        }
    }

    fn member_line(members: &[PersonId]) -> String {
        let names: Vec<&str> = members.iter().map(PersonId::as_str).collect();
        format!("{}: {}", i18n::MEMBER, names.join(", "))
    }
}
