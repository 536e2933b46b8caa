use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::confidence::Confidence;

/// Screening stage a decision belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TitleAbstract,
    FullText,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TitleAbstract => "title_abstract",
            Self::FullText => "full_text",
        };
        write!(f, "{s}")
    }
}

/// What produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Embedding,
    Llm,
    Human,
}

/// The decision label. `Maybe` always means "needs another look".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionLabel {
    Include,
    Exclude,
    Maybe,
}

impl fmt::Display for DecisionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
            Self::Maybe => "maybe",
        };
        write!(f, "{s}")
    }
}

/// One screening decision for a reference at a stage.
///
/// Exactly one decision per (reference, stage, reviewer) is active: the
/// latest `decided_at` wins. History retention is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    pub reference_id: String,
    pub stage: Stage,
    pub source: DecisionSource,
    pub label: DecisionLabel,
    pub confidence: Confidence,
    pub rationale: String,
    /// None for pipeline output; Some for a human reviewer's position.
    pub reviewer: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl Decision {
    /// A decision produced by the automated pipeline (embedding or LLM).
    pub fn automated(
        reference_id: impl Into<String>,
        stage: Stage,
        source: DecisionSource,
        label: DecisionLabel,
        confidence: Confidence,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference_id: reference_id.into(),
            stage,
            source,
            label,
            confidence,
            rationale: rationale.into(),
            reviewer: None,
            decided_at: Utc::now(),
        }
    }

    /// A decision recorded on behalf of a human reviewer.
    pub fn human(
        reference_id: impl Into<String>,
        stage: Stage,
        label: DecisionLabel,
        rationale: impl Into<String>,
        reviewer: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference_id: reference_id.into(),
            stage,
            source: DecisionSource::Human,
            label,
            confidence: Confidence::new(1.0),
            rationale: rationale.into(),
            reviewer: Some(reviewer.into()),
            decided_at: Utc::now(),
        }
    }
}
