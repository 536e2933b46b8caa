//! The PRISMA 2020 checklist as an immutable lookup table.
//!
//! Item numbers are 1-based (1..=27). The table is constructed at compile
//! time and never mutated; every crate that needs a section or topic for an
//! item number reads it from here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Report section a checklist item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Title,
    Abstract,
    Introduction,
    Methods,
    Results,
    Discussion,
    OtherInformation,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "Title",
            Self::Abstract => "Abstract",
            Self::Introduction => "Introduction",
            Self::Methods => "Methods",
            Self::Results => "Results",
            Self::Discussion => "Discussion",
            Self::OtherInformation => "Other information",
        };
        write!(f, "{name}")
    }
}

/// One row of the PRISMA 2020 checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistEntry {
    /// 1-based item number.
    pub number: u8,
    pub section: Section,
    pub topic: &'static str,
}

const fn entry(number: u8, section: Section, topic: &'static str) -> ChecklistEntry {
    ChecklistEntry {
        number,
        section,
        topic,
    }
}

/// The full PRISMA 2020 checklist, in item-number order.
pub static CHECKLIST: [ChecklistEntry; 27] = [
    entry(1, Section::Title, "Title"),
    entry(2, Section::Abstract, "Abstract"),
    entry(3, Section::Introduction, "Rationale"),
    entry(4, Section::Introduction, "Objectives"),
    entry(5, Section::Methods, "Eligibility criteria"),
    entry(6, Section::Methods, "Information sources"),
    entry(7, Section::Methods, "Search strategy"),
    entry(8, Section::Methods, "Selection process"),
    entry(9, Section::Methods, "Data collection process"),
    entry(10, Section::Methods, "Data items"),
    entry(11, Section::Methods, "Study risk of bias assessment"),
    entry(12, Section::Methods, "Effect measures"),
    entry(13, Section::Methods, "Synthesis methods"),
    entry(14, Section::Methods, "Reporting bias assessment"),
    entry(15, Section::Methods, "Certainty assessment"),
    entry(16, Section::Results, "Study selection"),
    entry(17, Section::Results, "Study characteristics"),
    entry(18, Section::Results, "Risk of bias in studies"),
    entry(19, Section::Results, "Results of individual studies"),
    entry(20, Section::Results, "Results of syntheses"),
    entry(21, Section::Results, "Reporting biases"),
    entry(22, Section::Results, "Certainty of evidence"),
    entry(23, Section::Discussion, "Discussion"),
    entry(24, Section::OtherInformation, "Registration and protocol"),
    entry(25, Section::OtherInformation, "Support"),
    entry(26, Section::OtherInformation, "Competing interests"),
    entry(
        27,
        Section::OtherInformation,
        "Availability of data, code and other materials",
    ),
];

/// Look up a checklist entry by 1-based item number.
pub fn checklist_entry(number: u8) -> Option<&'static ChecklistEntry> {
    if number == 0 || number as usize > CHECKLIST.len() {
        return None;
    }
    Some(&CHECKLIST[number as usize - 1])
}
