//! Duplicate detection over bibliographic metadata.
//!
//! Four rules, checked in order: normalized DOI equality, high title
//! similarity alone, moderate title similarity corroborated by author
//! overlap, and moderate title similarity corroborated by matching
//! publication years. Titles are compared by Levenshtein ratio over
//! normalized text.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sieve_core::config::ScreeningConfig;
use tracing::debug;

/// Bibliographic fields used for duplicate detection. Distinct from the
/// screening reference: detection runs at import time, where authors and
/// DOIs matter and abstracts do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceBibData {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub doi: Option<String>,
}

/// A primary reference and the ids judged to duplicate it, each with the
/// title similarity that triggered the match (1.0 for DOI matches).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub primary_id: String,
    pub duplicate_ids: Vec<(String, f64)>,
}

/// Group duplicates. The first occurrence in input order is the primary;
/// later matches attach to it and are not reconsidered as primaries.
pub fn find_duplicates(
    references: &[ReferenceBibData],
    config: &ScreeningConfig,
) -> Vec<DuplicateGroup> {
    let mut grouped = vec![false; references.len()];
    let mut groups = Vec::new();

    for i in 0..references.len() {
        if grouped[i] {
            continue;
        }
        let mut duplicate_ids = Vec::new();
        for j in (i + 1)..references.len() {
            if grouped[j] {
                continue;
            }
            if let Some(similarity) = duplicate_similarity(&references[i], &references[j], config)
            {
                grouped[j] = true;
                duplicate_ids.push((references[j].id.clone(), similarity));
            }
        }
        if !duplicate_ids.is_empty() {
            debug!(
                primary = %references[i].id,
                count = duplicate_ids.len(),
                "duplicate group formed"
            );
            groups.push(DuplicateGroup {
                primary_id: references[i].id.clone(),
                duplicate_ids,
            });
        }
    }
    groups
}

/// The similarity that marks `b` a duplicate of `a`, or `None`.
fn duplicate_similarity(
    a: &ReferenceBibData,
    b: &ReferenceBibData,
    config: &ScreeningConfig,
) -> Option<f64> {
    if let (Some(da), Some(db)) = (normalize_doi(a.doi.as_deref()), normalize_doi(b.doi.as_deref()))
    {
        if da == db {
            return Some(1.0);
        }
    }

    let similarity = title_similarity(&a.title, &b.title);
    if similarity >= config.title_similarity {
        return Some(similarity);
    }
    if similarity >= config.title_similarity_with_authors
        && author_overlap(&a.authors, &b.authors) >= config.author_overlap
    {
        return Some(similarity);
    }
    if similarity >= config.title_similarity_with_year {
        if let (Some(ya), Some(yb)) = (a.year, b.year) {
            if ya == yb {
                return Some(similarity);
            }
        }
    }
    None
}

/// Strip the resolver prefix and lowercase, so `https://doi.org/10.1/X`
/// and `10.1/x` compare equal.
fn normalize_doi(doi: Option<&str>) -> Option<String> {
    let doi = doi?.trim().to_lowercase();
    if doi.is_empty() {
        return None;
    }
    let stripped = doi
        .strip_prefix("https://dx.doi.org/")
        .or_else(|| doi.strip_prefix("http://dx.doi.org/"))
        .or_else(|| doi.strip_prefix("https://doi.org/"))
        .or_else(|| doi.strip_prefix("http://doi.org/"))
        .unwrap_or(&doi);
    Some(stripped.to_string())
}

/// Lowercase, keep alphanumerics, collapse every separator run to one
/// space.
fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut last_was_space = true;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Levenshtein ratio in [0, 1] over normalized titles. An empty title
/// never matches anything.
fn title_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let max_len = a.chars().count().max(b.chars().count());
    1.0 - levenshtein(&a, &b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (prev[j + 1] + 1)
                .min(current[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

/// Shared-author ratio: intersection of normalized names over the larger
/// author list.
fn author_overlap(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<String> = a
        .iter()
        .map(|s| normalize_author(s))
        .filter(|s| !s.is_empty())
        .collect();
    let set_b: HashSet<String> = b
        .iter()
        .map(|s| normalize_author(s))
        .filter(|s| !s.is_empty())
        .collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let shared = set_a.intersection(&set_b).count();
    shared as f64 / set_a.len().max(set_b.len()) as f64
}

fn normalize_author(author: &str) -> String {
    author
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doi_resolver_prefixes_are_stripped() {
        assert_eq!(
            normalize_doi(Some("https://doi.org/10.1000/XYZ")),
            Some("10.1000/xyz".to_string())
        );
        assert_eq!(
            normalize_doi(Some("http://dx.doi.org/10.1000/xyz")),
            Some("10.1000/xyz".to_string())
        );
        assert_eq!(
            normalize_doi(Some("10.1000/xyz")),
            Some("10.1000/xyz".to_string())
        );
        assert_eq!(normalize_doi(Some("   ")), None);
        assert_eq!(normalize_doi(None), None);
    }

    #[test]
    fn title_normalization_collapses_punctuation_and_case() {
        assert_eq!(
            normalize_title("  Deep   Learning: A Survey!  "),
            "deep learning a survey"
        );
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
        assert_eq!(levenshtein("", "abc"), 3);
    }

    #[test]
    fn identical_normalized_titles_score_one() {
        let s = title_similarity("Deep Learning: A Survey", "deep learning - a survey");
        assert!((s - 1.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn author_overlap_ignores_order_case_and_initial_punctuation() {
        let a = vec!["Smith, J".to_string(), "Doe, A".to_string()];
        let b = vec!["doe a".to_string(), "smith j".to_string()];
        assert!((author_overlap(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_authors_score_zero() {
        let a = vec!["Smith, J".to_string()];
        let b = vec!["Jones, K".to_string()];
        assert_eq!(author_overlap(&a, &b), 0.0);
    }
}
