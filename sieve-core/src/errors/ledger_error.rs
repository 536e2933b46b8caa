/// Compliance ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("unknown checklist item {number}")]
    UnknownItem { number: u8 },

    /// The state machine forbids this provenance transition.
    #[error("invalid transition on item {number}: {action} from {from}")]
    InvalidTransition {
        number: u8,
        from: String,
        action: String,
    },

    /// The project is locked. Mutations fail loudly, never silently no-op.
    #[error("compliance ledger is locked: {action} rejected")]
    ComplianceLocked { action: String },

    #[error("compliance ledger is already locked")]
    AlreadyLocked,

    #[error("item {number} content must not be empty")]
    EmptyContent { number: u8 },
}
