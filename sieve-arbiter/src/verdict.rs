//! Verdict parsing: pull the JSON object out of a model reply and map it
//! onto a typed verdict.
//!
//! Models wrap JSON in prose and code fences no matter what the prompt
//! says, so extraction takes everything from the first `{` to the last
//! `}` before parsing. Every field except `decision` is optional.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sieve_core::errors::ArbiterError;
use sieve_core::{Confidence, DecisionLabel};

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[\s\S]*\}").expect("json envelope pattern is valid"));

/// Wire shape of a reply. Checklist values arrive as arbitrary JSON so a
/// model emitting `"yes"` instead of `true` degrades that entry, not the
/// whole verdict.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    decision: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default, rename = "criteriaChecklist")]
    criteria_checklist: BTreeMap<String, serde_json::Value>,
}

/// A parsed arbitration verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    pub label: DecisionLabel,
    /// Model-reported strength of the decision on a 0-100 scale.
    pub score: f64,
    pub reasoning: String,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub criteria_checklist: BTreeMap<String, bool>,
}

impl Verdict {
    /// The 0-100 score mapped onto the unit confidence scale.
    pub fn confidence(&self) -> Confidence {
        Confidence::new(self.score / 100.0)
    }
}

/// Parse a model reply into a verdict.
///
/// Rejects replies with no JSON object, unparseable JSON, or an
/// unrecognizable decision label. All rejections are
/// [`ArbiterError::InvalidResponse`], which the engine answers with one
/// strict re-ask.
pub fn parse_verdict(reply: &str) -> Result<Verdict, ArbiterError> {
    let envelope = JSON_OBJECT
        .find(reply)
        .ok_or_else(|| ArbiterError::InvalidResponse {
            reason: "no JSON object in reply".to_string(),
        })?;

    let raw: RawVerdict =
        serde_json::from_str(envelope.as_str()).map_err(|e| ArbiterError::InvalidResponse {
            reason: format!("verdict JSON did not parse: {e}"),
        })?;

    let label = parse_label(&raw.decision)?;

    Ok(Verdict {
        label,
        score: raw.score.clamp(0.0, 100.0),
        reasoning: raw.reasoning,
        issues: raw.issues,
        suggestions: raw.suggestions,
        criteria_checklist: raw
            .criteria_checklist
            .into_iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
            .collect(),
    })
}

/// Strict token match. Lenient substring matching is deliberately
/// avoided: "do not include" must not read as include.
fn parse_label(decision: &str) -> Result<DecisionLabel, ArbiterError> {
    match decision.trim().to_lowercase().as_str() {
        "include" | "included" => Ok(DecisionLabel::Include),
        "exclude" | "excluded" => Ok(DecisionLabel::Exclude),
        "maybe" | "unsure" | "uncertain" => Ok(DecisionLabel::Maybe),
        other => Err(ArbiterError::InvalidResponse {
            reason: format!("unrecognized decision label: {other:?}"),
        }),
    }
}
