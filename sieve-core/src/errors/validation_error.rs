/// Input validation errors, raised before any screening work starts.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("reference batch is empty")]
    EmptyBatch,

    #[error("protocol {which} criteria list is empty")]
    EmptyCriteria { which: String },

    #[error("invalid temporal range: start {start} after end {end}")]
    InvalidTemporalRange { start: i32, end: i32 },

    #[error("invalid config value for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },
}
