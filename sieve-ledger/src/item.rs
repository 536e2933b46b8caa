//! Checklist items and their content provenance.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve_core::checklist::{checklist_entry, ChecklistEntry};

/// Who produced the current text of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// No content yet.
    Pending,
    /// Generated by the pipeline, untouched by a human.
    Automated,
    /// Written by a human from scratch.
    Human,
    /// Automated text later edited by a human.
    Hybrid,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Automated => "automated",
            Self::Human => "human",
            Self::Hybrid => "hybrid",
        };
        write!(f, "{s}")
    }
}

/// One PRISMA 2020 checklist item with its provenance trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrismaItem {
    /// 1-based checklist item number.
    pub number: u8,
    pub content: String,
    pub content_type: ContentType,
    /// Latest machine-generated text. Frozen once a human edits the item,
    /// so the original automation stays auditable under the hybrid text.
    pub automated_content: Option<String>,
    /// Where automated content was derived from.
    pub data_source: Option<String>,
    pub last_human_edit: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl PrismaItem {
    /// An empty item awaiting content.
    pub fn pending(number: u8) -> Self {
        Self {
            number,
            content: String::new(),
            content_type: ContentType::Pending,
            automated_content: None,
            data_source: None,
            last_human_edit: None,
            updated_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.content_type != ContentType::Pending
    }

    /// The checklist row (section and topic) for this item.
    pub fn entry(&self) -> Option<&'static ChecklistEntry> {
        checklist_entry(self.number)
    }
}
