//! A ready-made screening scenario: a multi-factor authentication review
//! with twelve references whose relevance curve has a sharp plateau, one
//! borderline record, and an irrelevant tail.

use sieve_core::traits::{ChatResponse, TokenUsage};
use sieve_core::{Protocol, Reference, TemporalRange};

use crate::providers::VectorProvider;

/// Width of every fixture vector.
pub const EMBEDDING_DIMENSIONS: usize = 8;

/// Appears verbatim at the front of the protocol query text, so the
/// vector provider can recognize the query by containment.
const QUERY_NEEDLE: &str = "adult users of consumer online services";

/// Title, abstract, and query cosine per reference, in descending
/// relevance. Rows 1-6 sit on the relevant plateau, row 7 is the lone
/// borderline record, rows 8-12 are the off-topic tail.
const MFA_ROWS: [(&str, &str, f64); 12] = [
    (
        "Multi-factor authentication adoption in retail banking applications",
        "Survey of 2,400 retail banking customers measuring enrollment rates after mandatory second-factor rollout. Account takeover reports fell by two thirds in the year after enforcement.",
        0.95,
    ),
    (
        "Usability of hardware security keys for two-factor login",
        "Lab study comparing login completion times and error rates for security keys against app-based codes. Participants completed key-based logins faster after the first week.",
        0.93,
    ),
    (
        "Push-based authentication prompts and user fatigue",
        "Field experiment tracking approval latency across 90 days of push prompts. Habitual one-tap approval emerged within three weeks and weakened prompt scrutiny.",
        0.91,
    ),
    (
        "Biometric second factors in mobile payment authorization",
        "Controlled trial of fingerprint confirmation for high-value transfers. False rejection drove channel switching more than fraud concern did.",
        0.89,
    ),
    (
        "One-time passcode delivery channels compared",
        "Comparison of SMS, email, and authenticator delivery for one-time codes across 14,000 login sessions, reporting interception exposure and delivery delay per channel.",
        0.87,
    ),
    (
        "Risk-based step-up authentication in consumer portals",
        "Evaluation of an adaptive engine that challenges only anomalous sessions. Step-up rates under four percent preserved conversion while blocking replayed credentials.",
        0.85,
    ),
    (
        "Password manager usage among small business employees",
        "Interview study of credential habits in firms under fifty employees. Shared vaults improved password uniqueness but second factors were rarely enabled.",
        0.25,
    ),
    (
        "Cloud cost optimization strategies for serverless workloads",
        "Case studies of function right-sizing and cold-start reduction across three deployments, with monthly spend breakdowns before and after tuning.",
        0.06,
    ),
    (
        "Gamification elements in language learning applications",
        "Longitudinal analysis of streaks and leaderboards on learner retention over six months in two commercial vocabulary apps.",
        0.05,
    ),
    (
        "Soil moisture sensing networks for precision agriculture",
        "Deployment report of a low-power sensor mesh across irrigated fields, comparing probe calibration drift over a full growing season.",
        0.04,
    ),
    (
        "Graph partitioning heuristics for social network analysis",
        "Benchmark of spectral and greedy partitioners on community detection quality for graphs up to ten million edges.",
        0.03,
    ),
    (
        "Acoustic monitoring of marine mammal migration patterns",
        "Passive hydrophone array study correlating call density with seasonal migration corridors along a continental shelf.",
        0.02,
    ),
];

/// Protocol for the multi-factor authentication review.
pub fn mfa_protocol() -> Protocol {
    Protocol {
        id: "mfa-review".to_string(),
        population: QUERY_NEEDLE.to_string(),
        intervention: "multi-factor authentication requirements".to_string(),
        comparison: "single-password login".to_string(),
        outcome: "account takeover incidence and login friction".to_string(),
        inclusion_criteria: vec![
            "empirical evaluation of an authentication mechanism".to_string(),
            "reports security or usability outcomes".to_string(),
        ],
        exclusion_criteria: vec![
            "purely theoretical threat models".to_string(),
            "no user-facing authentication component".to_string(),
        ],
        temporal_range: Some(TemporalRange {
            start_year: 2015,
            end_year: 2025,
        }),
    }
}

/// The twelve references, ids `ref-01` through `ref-12`, most relevant
/// first.
pub fn mfa_references() -> Vec<Reference> {
    MFA_ROWS
        .iter()
        .enumerate()
        .map(|(i, (title, abstract_text, _))| Reference {
            id: format!("ref-{:02}", i + 1),
            title: (*title).to_string(),
            abstract_text: (*abstract_text).to_string(),
            year: Some(2015 + (i as i32 % 10)),
            source: Some("scopus".to_string()),
        })
        .collect()
}

/// Vector provider wired for the scenario: the query text maps to the
/// first axis and each reference to a unit vector at its fixed cosine.
pub fn mfa_vector_provider() -> VectorProvider {
    let mut provider = VectorProvider::new(EMBEDDING_DIMENSIONS);
    provider.insert(
        QUERY_NEEDLE,
        VectorProvider::unit_at_cosine(EMBEDDING_DIMENSIONS, 1.0),
    );
    for (title, _, cosine) in &MFA_ROWS {
        provider.insert(
            *title,
            VectorProvider::unit_at_cosine(EMBEDDING_DIMENSIONS, *cosine),
        );
    }
    provider
}

/// A well-formed arbitration reply for scripting the chat provider.
pub fn verdict_reply(decision: &str, score: u8, reasoning: &str) -> ChatResponse {
    ChatResponse {
        text: format!(
            r#"{{"decision": "{decision}", "score": {score}, "reasoning": "{reasoning}", "issues": [], "suggestions": [], "criteriaChecklist": {{}}}}"#
        ),
        usage: Some(TokenUsage {
            prompt_tokens: 180,
            completion_tokens: 40,
            total_tokens: 220,
        }),
    }
}
