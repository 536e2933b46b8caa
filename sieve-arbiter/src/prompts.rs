//! Prompt templates for title/abstract arbitration.
//!
//! Templates are fixed data: a system prompt plus a user template with
//! `{placeholder}` slots filled from the protocol and the reference.
//! Unknown slots stay in place, so a missing variable is visible in the
//! rendered prompt instead of silently vanishing.

use sieve_core::config::ArbiterConfig;
use sieve_core::traits::ChatRequest;
use sieve_core::{Protocol, Reference};

/// A named prompt template.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

impl PromptTemplate {
    /// Render the user template, replacing each `{key}` slot.
    pub fn fill(&self, vars: &[(&str, &str)]) -> String {
        let mut out = self.user.to_string();
        for (key, value) in vars {
            out = out.replace(&format!("{{{key}}}"), value);
        }
        out
    }
}

/// Standard screening prompt.
pub static SCREENING: PromptTemplate = PromptTemplate {
    name: "screening",
    system: "You are an expert systematic-review screener. You judge whether a \
             reference meets the eligibility criteria of a review protocol based \
             on its title and abstract alone. You always answer with a single \
             JSON object.",
    user: "Review protocol:\n\
           {research_question}\n\
           \n\
           Inclusion criteria:\n\
           {inclusion_criteria}\n\
           \n\
           Exclusion criteria:\n\
           {exclusion_criteria}\n\
           \n\
           Reference:\n\
           Title: {title}\n\
           Year: {year}\n\
           Abstract: {abstract}\n\
           \n\
           Evaluate the reference against the criteria and respond with JSON of \
           this exact shape:\n\
           {\"decision\": \"include\" | \"exclude\" | \"maybe\", \"score\": 0-100, \
           \"reasoning\": \"...\", \"issues\": [], \"suggestions\": [], \
           \"criteriaChecklist\": {}}\n\
           \n\
           Use \"maybe\" when the abstract does not carry enough information to \
           decide. \"score\" is how strongly the evidence supports your decision.",
};

/// Re-ask variant used after an unparseable reply. Same task, harder
/// output constraint.
pub static SCREENING_STRICT: PromptTemplate = PromptTemplate {
    name: "screening_strict",
    system: "You are an expert systematic-review screener. Respond ONLY with a \
             JSON object. No prose, no code fences, no explanation outside the \
             JSON.",
    user: "Your previous reply could not be parsed as JSON. Evaluate the \
           reference again and respond ONLY with the JSON object.\n\
           \n\
           Review protocol:\n\
           {research_question}\n\
           \n\
           Inclusion criteria:\n\
           {inclusion_criteria}\n\
           \n\
           Exclusion criteria:\n\
           {exclusion_criteria}\n\
           \n\
           Reference:\n\
           Title: {title}\n\
           Year: {year}\n\
           Abstract: {abstract}\n\
           \n\
           JSON shape:\n\
           {\"decision\": \"include\" | \"exclude\" | \"maybe\", \"score\": 0-100, \
           \"reasoning\": \"...\", \"issues\": [], \"suggestions\": [], \
           \"criteriaChecklist\": {}}",
};

static TEMPLATES: [&PromptTemplate; 2] = [&SCREENING, &SCREENING_STRICT];

/// Look a template up by name.
pub fn template(name: &str) -> Option<&'static PromptTemplate> {
    TEMPLATES.iter().copied().find(|t| t.name == name)
}

/// Assemble a chat request for one reference.
pub fn build_request(
    template: &PromptTemplate,
    protocol: &Protocol,
    reference: &Reference,
    config: &ArbiterConfig,
) -> ChatRequest {
    let question = research_question(protocol);
    let inclusion = numbered(&protocol.inclusion_criteria);
    let exclusion = numbered(&protocol.exclusion_criteria);
    let year = reference
        .year
        .map_or_else(|| "unknown".to_string(), |y| y.to_string());

    let user = template.fill(&[
        ("research_question", question.as_str()),
        ("inclusion_criteria", inclusion.as_str()),
        ("exclusion_criteria", exclusion.as_str()),
        ("title", reference.title.as_str()),
        ("year", year.as_str()),
        ("abstract", reference.abstract_text.as_str()),
    ]);

    ChatRequest {
        system: template.system.to_string(),
        user,
        temperature: config.temperature,
        max_tokens: config.max_completion_tokens,
    }
}

/// The PICO frame as a short prose block. Empty components are dropped.
fn research_question(protocol: &Protocol) -> String {
    let parts = [
        ("Population", &protocol.population),
        ("Intervention", &protocol.intervention),
        ("Comparison", &protocol.comparison),
        ("Outcome", &protocol.outcome),
    ];
    parts
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(label, value)| format!("{label}: {}", value.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
