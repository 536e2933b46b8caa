//! Auto-population of the flow and declaration items from screening
//! aggregates.
//!
//! Population never makes methodological decisions; it translates counts
//! the pipeline already produced into formal report language. Items 16,
//! 17 and 23 describe the selection flow, 24, 26 and 27 are standard
//! declarations.

use serde::{Deserialize, Serialize};
use sieve_core::errors::LedgerError;
use tracing::debug;

use crate::engine::LedgerEngine;
use crate::item::PrismaItem;

/// Aggregates of a finished screening run, the only inputs population
/// draws from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewSummary {
    /// Records returned by the searches, before de-duplication.
    pub identified: usize,
    pub duplicates_removed: usize,
    /// Records screened by title and abstract.
    pub screened: usize,
    pub fulltext_assessed: usize,
    pub included: usize,
    /// Model used for gray-zone arbitration, when LLM assistance was on.
    pub llm_model: Option<String>,
    /// Prospective registration id (e.g. a PROSPERO number), if any.
    pub registry: Option<String>,
}

impl LedgerEngine {
    /// Fill the quantitative and declaration items (16, 17, 23, 24, 26,
    /// 27) from screening aggregates.
    ///
    /// Items a human already owns are skipped, never overwritten; the
    /// returned list holds only the items actually written. A locked
    /// ledger rejects the whole run.
    pub fn auto_populate(&self, summary: &ReviewSummary) -> Result<Vec<PrismaItem>, LedgerError> {
        let declaration_27 = if summary.llm_model.is_some() {
            "ai usage declaration"
        } else {
            "standard declaration"
        };
        let drafts = [
            (16u8, item_16(summary), "screening flow counts"),
            (17, item_17(summary), "screening flow counts"),
            (23, item_23(summary), "screening methodology"),
            (24, item_24(summary), "standard declaration"),
            (26, item_26(), "standard declaration"),
            (27, item_27(summary), declaration_27),
        ];

        let mut written = Vec::with_capacity(drafts.len());
        for (number, content, source) in drafts {
            match self.set_automated_content(number, content, source) {
                Ok(item) => written.push(item),
                Err(LedgerError::InvalidTransition { number, .. }) => {
                    debug!(item = number, "human-owned item left untouched");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }
}

/// Item 16, study selection: the numeric flow from identification to
/// inclusion. Zero-count clauses are dropped rather than reported as
/// "0 records".
fn item_16(s: &ReviewSummary) -> String {
    let mut text = format!(
        "The systematic literature search identified a total of {} records. ",
        s.identified
    );
    if s.duplicates_removed > 0 {
        text.push_str(&format!(
            "After removing {} duplicates, ",
            s.duplicates_removed
        ));
    }
    text.push_str(&format!(
        "{} records were screened by title and abstract. ",
        s.screened
    ));
    let excluded_screening = s.screened.saturating_sub(s.fulltext_assessed);
    if excluded_screening > 0 {
        text.push_str(&format!(
            "Of these, {excluded_screening} records were excluded as they did not meet the predefined inclusion criteria. "
        ));
    }
    text.push_str(&format!(
        "Subsequently, {} full-text articles were assessed for eligibility. ",
        s.fulltext_assessed
    ));
    let excluded_fulltext = s.fulltext_assessed.saturating_sub(s.included);
    if excluded_fulltext > 0 {
        text.push_str(&format!(
            "{excluded_fulltext} articles were excluded at this stage. "
        ));
    }
    text.push_str(&format!(
        "Ultimately, {} studies met all inclusion criteria and were included in the final synthesis.",
        s.included
    ));
    text
}

/// Item 17, study characteristics.
fn item_17(s: &ReviewSummary) -> String {
    format!(
        "The {} included studies were assessed for their methodological characteristics \
         during full-text review. Each study was evaluated against the predefined quality \
         rubric covering topical relevance, methodological validity, and reported empirical data.",
        s.included
    )
}

/// Item 23, discussion of the screening methodology.
fn item_23(s: &ReviewSummary) -> String {
    let mut text = String::from(
        "This systematic review employed a hybrid screening strategy combining semantic \
         similarity ranking with ",
    );
    match &s.llm_model {
        Some(model) => {
            text.push_str(&format!(
                "language-model arbitration of borderline records ({model}). "
            ));
            text.push_str(
                "This approach was designed to enhance efficiency while maintaining \
                 methodological rigor. ",
            );
        }
        None => {
            text.push_str("manual review of borderline records. ");
        }
    }
    text.push_str(
        "All final inclusion decisions were based on the predefined eligibility criteria \
         established in the protocol. The systematic approach ensured comprehensive coverage \
         of relevant literature within the specified scope.",
    );
    text
}

/// Item 24, registration and protocol.
fn item_24(s: &ReviewSummary) -> String {
    match &s.registry {
        Some(registry) => format!(
            "This systematic review was prospectively registered in {registry}. The protocol \
             was developed a priori following PRISMA 2020 guidelines."
        ),
        None => String::from(
            "This systematic review was not prospectively registered. The protocol was \
             developed a priori following PRISMA 2020 guidelines and documented before \
             conducting the searches.",
        ),
    }
}

/// Item 26, competing interests.
fn item_26() -> String {
    String::from("The authors declare no conflicts of interest.")
}

/// Item 27, availability and AI-use declaration.
fn item_27(s: &ReviewSummary) -> String {
    match &s.llm_model {
        Some(model) => format!(
            "Artificial intelligence tools were used to support the screening process: the \
             {model} model arbitrated records whose similarity to the research protocol was \
             inconclusive. All AI-assisted processes were conducted under researcher \
             supervision, with final decisions made by the human reviewer following PRISMA \
             guidelines."
        ),
        None => String::from(
            "The data extracted from the included studies and the screening records \
             supporting the conclusions of this review are available from the corresponding \
             author on reasonable request.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ReviewSummary {
        ReviewSummary {
            identified: 150,
            duplicates_removed: 12,
            screened: 138,
            fulltext_assessed: 31,
            included: 18,
            llm_model: Some("gpt-4o-mini".to_string()),
            registry: None,
        }
    }

    #[test]
    fn item_16_narrates_the_full_flow() {
        let text = item_16(&summary());
        assert!(text.contains("150 records"));
        assert!(text.contains("removing 12 duplicates"));
        assert!(text.contains("138 records were screened"));
        assert!(text.contains("Of these, 107 records were excluded"));
        assert!(text.contains("31 full-text articles"));
        assert!(text.contains("13 articles were excluded at this stage"));
        assert!(text.contains("18 studies met all inclusion criteria"));
    }

    #[test]
    fn item_16_drops_zero_count_clauses() {
        let text = item_16(&ReviewSummary {
            identified: 20,
            duplicates_removed: 0,
            screened: 20,
            fulltext_assessed: 20,
            included: 20,
            ..ReviewSummary::default()
        });
        assert!(!text.contains("duplicates"));
        assert!(!text.contains("excluded"));
    }

    #[test]
    fn item_24_names_the_registry_when_present() {
        let mut s = summary();
        s.registry = Some("PROSPERO CRD42025000001".to_string());
        assert!(item_24(&s).contains("registered in PROSPERO CRD42025000001"));
        s.registry = None;
        assert!(item_24(&s).contains("not prospectively registered"));
    }

    #[test]
    fn item_27_declares_ai_use_only_when_a_model_ran() {
        let with_model = item_27(&summary());
        assert!(with_model.contains("gpt-4o-mini"));
        assert!(with_model.contains("researcher supervision"));

        let mut s = summary();
        s.llm_model = None;
        let without = item_27(&s);
        assert!(!without.contains("Artificial intelligence"));
        assert!(without.contains("available from the corresponding author"));
    }
}
