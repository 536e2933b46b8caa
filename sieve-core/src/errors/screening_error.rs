/// Full-text screening and conflict errors.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    /// A rubric subscore is outside its fixed range. Validation, not clamping.
    #[error("invalid subscore for {criterion}: {value} (max {max})")]
    InvalidSubscore { criterion: String, value: u8, max: u8 },

    /// An inclusion threshold above the rubric maximum can never be met.
    #[error("include threshold {value} exceeds the rubric maximum {max}")]
    InvalidThreshold { value: u8, max: u8 },

    #[error("screening record needs a reviewer id")]
    MissingReviewer,

    #[error("conflict {conflict_id} is already resolved")]
    ConflictAlreadyResolved { conflict_id: String },
}
