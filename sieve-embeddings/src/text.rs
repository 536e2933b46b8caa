//! Text assembly for embedding.
//!
//! The protocol query is the PICO frame plus the inclusion criteria; a
//! reference embeds as title plus abstract. Parts join with "; " so the
//! same protocol always yields the same query string.

use sieve_core::review::{Protocol, Reference};

/// Build the protocol query text: PICO fields then inclusion criteria,
/// blank parts dropped.
pub fn query_text(protocol: &Protocol) -> String {
    let pico = [
        &protocol.population,
        &protocol.intervention,
        &protocol.comparison,
        &protocol.outcome,
    ];
    pico.into_iter()
        .map(String::as_str)
        .chain(protocol.inclusion_criteria.iter().map(String::as_str))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the reference text: title, then abstract when present.
pub fn reference_text(reference: &Reference) -> String {
    let title = reference.title.trim();
    let abstract_text = reference.abstract_text.trim();
    if abstract_text.is_empty() {
        return title.to_string();
    }
    format!("{}. {}", title.trim_end_matches('.'), abstract_text)
}
