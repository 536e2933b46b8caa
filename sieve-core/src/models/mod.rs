pub mod similarity;
pub mod usage;

pub use similarity::SimilarityScore;
pub use usage::UsageEvent;
