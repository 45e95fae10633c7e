use splitbook_application::{ExternalService, LedgerError, MalformedCommand};
use splitbook_i18n as i18n;

pub fn format_ledger_error(error: &LedgerError, mention: impl std::fmt::Display) -> String {
    match error {
        LedgerError::MalformedCommand(MalformedCommand::NoPositions) => {
            format!("{mention} {}", i18n::NO_POSITIONS)
        }
        LedgerError::MalformedCommand(MalformedCommand::NoMembers) => {
            format!("{mention} {}", i18n::NO_MEMBERS)
        }
        LedgerError::MalformedCommand(detail) => {
            format!("{mention} {}", i18n::malformed_command(detail))
        }
        LedgerError::InvalidParticipant(person) => {
            format!("{mention} {}", i18n::invalid_participant(person))
        }
        LedgerError::AdjustmentExceedsTotal { total, adjustments } => {
            format!(
                "{mention} {}",
                i18n::adjustment_exceeds_total(total, adjustments)
            )
        }
        LedgerError::RecordNotFound { position, len } => {
            format!("{mention} {}", i18n::record_not_found(*position, *len))
        }
        LedgerError::ExternalServiceFailure { service, .. } => {
            format!(
                "{mention} {}",
                i18n::service_unavailable(service_label(*service))
            )
        }
        LedgerError::Settlement(_) => {
            format!("{mention} {}", i18n::SETTLEMENT_CALCULATION_FAILED)
        }
    }
}

fn service_label(service: ExternalService) -> &'static str {
    match service {
        ExternalService::RecordStore => i18n::RECORD_STORE,
        ExternalService::GroupDirectory => i18n::GROUP_DIRECTORY,
        ExternalService::WinningNumbersFeed => i18n::WINNING_NUMBERS_FEED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use splitbook_application::{ServiceError, StoreError};
    use splitbook_domain::{Money, PersonId, SplitError};

    #[rstest]
    #[case::no_positions(
        LedgerError::MalformedCommand(MalformedCommand::NoPositions),
        i18n::NO_POSITIONS.to_string()
    )]
    #[case::split(
        LedgerError::MalformedCommand(MalformedCommand::InvalidSplit(SplitError::NoParticipants)),
        i18n::malformed_command(SplitError::NoParticipants).to_string()
    )]
    #[case::invalid_participant(
        LedgerError::InvalidParticipant(PersonId::from("Z")),
        i18n::invalid_participant("Z").to_string()
    )]
    #[case::adjustment_exceeds_total(
        LedgerError::AdjustmentExceedsTotal {
            total: Money::from_i64(300),
            adjustments: Money::from_i64(400),
        },
        i18n::adjustment_exceeds_total(300, 400).to_string()
    )]
    #[case::record_not_found(
        LedgerError::RecordNotFound { position: 5, len: 3 },
        i18n::record_not_found(5, 3).to_string()
    )]
    #[case::store_down(
        LedgerError::ExternalServiceFailure {
            service: ExternalService::RecordStore,
            source: ServiceError::Store(StoreError::Unavailable("timeout".to_string())),
        },
        i18n::service_unavailable(i18n::RECORD_STORE).to_string()
    )]
    fn prefixes_mention_to_localized_message(
        #[case] error: LedgerError,
        #[case] expected: String,
    ) {
        assert_eq!(format_ledger_error(&error, "@user"), format!("@user {expected}"));
    }

    #[test]
    fn external_failures_hide_internal_detail() {
        let error = LedgerError::store(StoreError::Unavailable("password=hunter2".to_string()));
        assert!(!format_ledger_error(&error, "@user").contains("hunter2"));
    }
}
