use std::fmt;

use splitbook_domain::{
    InvoiceNumberError, Money, PersonId, RecordValidationError, Scope, SettlementRoundingError,
    SplitError, TransferPlanError,
};

use crate::ports::{FeedError, StoreError};

/// Input the ledger cannot act on. The caller asked for something that does
/// not make sense; retrying with the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedCommand {
    #[error(transparent)]
    InvalidSplit(SplitError),
    #[error(transparent)]
    InvalidRecord(RecordValidationError),
    #[error(transparent)]
    InvalidInvoiceNumber(InvoiceNumberError),
    #[error("{kind} records cannot be stored in {scope}")]
    WrongScope { scope: Scope, kind: &'static str },
    #[error("no positions were given")]
    NoPositions,
    #[error("group needs at least one member")]
    NoMembers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalService {
    RecordStore,
    GroupDirectory,
    WinningNumbersFeed,
}

impl fmt::Display for ExternalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExternalService::RecordStore => "record store",
            ExternalService::GroupDirectory => "group directory",
            ExternalService::WinningNumbersFeed => "winning numbers feed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Settling a group failed after its records were read. Only reachable when
/// stored expenses do not balance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    #[error(transparent)]
    Rounding(#[from] SettlementRoundingError),
    #[error(transparent)]
    Planning(#[from] TransferPlanError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("malformed command: {0}")]
    MalformedCommand(#[from] MalformedCommand),
    #[error("'{0}' has an adjustment but is not a participant")]
    InvalidParticipant(PersonId),
    #[error("adjustments ({adjustments}) exceed the total ({total})")]
    AdjustmentExceedsTotal { total: Money, adjustments: Money },
    #[error("no record at position {position} (there are {len})")]
    RecordNotFound { position: usize, len: usize },
    #[error("{service} failed: {source}")]
    ExternalServiceFailure {
        service: ExternalService,
        #[source]
        source: ServiceError,
    },
    #[error("settlement failed: {0}")]
    Settlement(#[from] SettlementError),
}

impl LedgerError {
    pub fn store(source: StoreError) -> Self {
        LedgerError::ExternalServiceFailure {
            service: ExternalService::RecordStore,
            source: source.into(),
        }
    }

    pub fn directory(source: StoreError) -> Self {
        LedgerError::ExternalServiceFailure {
            service: ExternalService::GroupDirectory,
            source: source.into(),
        }
    }

    pub fn feed(source: FeedError) -> Self {
        LedgerError::ExternalServiceFailure {
            service: ExternalService::WinningNumbersFeed,
            source: source.into(),
        }
    }
}

impl From<SplitError> for LedgerError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::InvalidParticipant(person) => LedgerError::InvalidParticipant(person),
            SplitError::AdjustmentExceedsTotal { total, adjustments } => {
                LedgerError::AdjustmentExceedsTotal { total, adjustments }
            }
            other => LedgerError::MalformedCommand(MalformedCommand::InvalidSplit(other)),
        }
    }
}

impl From<RecordValidationError> for LedgerError {
    fn from(err: RecordValidationError) -> Self {
        LedgerError::MalformedCommand(MalformedCommand::InvalidRecord(err))
    }
}

impl From<InvoiceNumberError> for LedgerError {
    fn from(err: InvoiceNumberError) -> Self {
        LedgerError::MalformedCommand(MalformedCommand::InvalidInvoiceNumber(err))
    }
}

impl From<SettlementRoundingError> for LedgerError {
    fn from(err: SettlementRoundingError) -> Self {
        LedgerError::Settlement(err.into())
    }
}

impl From<TransferPlanError> for LedgerError {
    fn from(err: TransferPlanError) -> Self {
        LedgerError::Settlement(err.into())
    }
}
