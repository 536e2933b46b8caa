use serde::{Deserialize, Serialize};

/// A bibliographic reference under screening.
///
/// The id is caller-assigned and treated as opaque; it keys every score,
/// decision, and batch result downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub title: String,
    /// May be empty; an empty abstract skips LLM arbitration.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub year: Option<i32>,
    /// Database or register the reference came from.
    pub source: Option<String>,
}

impl Reference {
    pub fn has_abstract(&self) -> bool {
        !self.abstract_text.trim().is_empty()
    }
}
