//! Dual-reviewer conflict detection and resolution.
//!
//! A conflict exists when the latest decisions of two or more reviewers
//! for the same (reference, stage) disagree. Pipeline decisions never
//! open conflicts; only positions carrying a reviewer id count.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve_core::errors::ScreeningError;
use sieve_core::{Decision, DecisionLabel, Stage};
use tracing::debug;
use uuid::Uuid;

/// One reviewer's latest stance inside a conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewerPosition {
    pub reviewer: String,
    pub label: DecisionLabel,
    pub decision_id: Uuid,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStatus {
    Open,
    Resolved,
}

/// How a conflict was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// A third reviewer imposed the final label.
    Adjudicated,
    /// The original reviewers converged on their own.
    Consensus,
}

/// A disagreement between reviewers on one reference at one stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub id: Uuid,
    pub reference_id: String,
    pub stage: Stage,
    /// Latest position per reviewer, sorted by reviewer id.
    pub positions: Vec<ReviewerPosition>,
    pub status: ConflictStatus,
    pub strategy: Option<ResolutionStrategy>,
    /// Adjudicator id, for adjudicated resolutions.
    pub resolver: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Detect conflicts over a set of decisions.
///
/// Decisions are grouped by (reference, stage); within a group only each
/// reviewer's latest decision counts, so a reviewer who revises their own
/// position replaces it rather than conflicting with themselves. Output
/// is sorted by reference id for stable reporting.
pub fn detect_conflicts(decisions: &[Decision]) -> Vec<Conflict> {
    let mut groups: HashMap<(String, Stage), HashMap<String, &Decision>> = HashMap::new();
    for decision in decisions {
        let Some(reviewer) = &decision.reviewer else {
            continue;
        };
        groups
            .entry((decision.reference_id.clone(), decision.stage))
            .or_default()
            .entry(reviewer.clone())
            .and_modify(|current| {
                if decision.decided_at > current.decided_at {
                    *current = decision;
                }
            })
            .or_insert(decision);
    }

    let mut conflicts = Vec::new();
    for ((reference_id, stage), per_reviewer) in groups {
        if per_reviewer.len() < 2 {
            continue;
        }
        let mut positions: Vec<ReviewerPosition> = per_reviewer
            .into_iter()
            .map(|(reviewer, d)| ReviewerPosition {
                reviewer,
                label: d.label,
                decision_id: d.id,
                decided_at: d.decided_at,
            })
            .collect();
        positions.sort_by(|a, b| a.reviewer.cmp(&b.reviewer));

        let first = positions[0].label;
        if positions.iter().all(|p| p.label == first) {
            continue;
        }

        debug!(
            reference_id = %reference_id,
            stage = %stage,
            reviewers = positions.len(),
            "reviewer conflict detected"
        );
        conflicts.push(Conflict {
            id: Uuid::new_v4(),
            reference_id,
            stage,
            positions,
            status: ConflictStatus::Open,
            strategy: None,
            resolver: None,
            opened_at: Utc::now(),
            resolved_at: None,
        });
    }

    conflicts.sort_by(|a, b| {
        a.reference_id
            .cmp(&b.reference_id)
            .then_with(|| a.stage.to_string().cmp(&b.stage.to_string()))
    });
    conflicts
}

/// Close a conflict by adjudication.
///
/// Returns the resolved conflict and the superseding human decision. The
/// original positions stay on the conflict as the audit trail.
pub fn resolve_conflict(
    conflict: &Conflict,
    adjudicator: impl Into<String>,
    label: DecisionLabel,
    rationale: impl Into<String>,
) -> Result<(Conflict, Decision), ScreeningError> {
    if conflict.status == ConflictStatus::Resolved {
        return Err(ScreeningError::ConflictAlreadyResolved {
            conflict_id: conflict.id.to_string(),
        });
    }
    let adjudicator = adjudicator.into();
    if adjudicator.trim().is_empty() {
        return Err(ScreeningError::MissingReviewer);
    }

    let decision = Decision::human(
        conflict.reference_id.clone(),
        conflict.stage,
        label,
        rationale,
        adjudicator.clone(),
    );
    let resolved = Conflict {
        status: ConflictStatus::Resolved,
        strategy: Some(ResolutionStrategy::Adjudicated),
        resolver: Some(adjudicator),
        resolved_at: Some(decision.decided_at),
        ..conflict.clone()
    };
    Ok((resolved, decision))
}

/// Close a conflict by consensus when the reviewers' latest decisions now
/// agree.
///
/// `decisions` must be the complete decision history for the review.
/// Returns `None` while the disagreement persists. No superseding
/// decision is created; the reviewers' own agreeing decisions stand.
pub fn resolve_by_consensus(
    conflict: &Conflict,
    decisions: &[Decision],
) -> Result<Option<Conflict>, ScreeningError> {
    if conflict.status == ConflictStatus::Resolved {
        return Err(ScreeningError::ConflictAlreadyResolved {
            conflict_id: conflict.id.to_string(),
        });
    }

    let still_open = detect_conflicts(decisions)
        .iter()
        .any(|c| c.reference_id == conflict.reference_id && c.stage == conflict.stage);
    if still_open {
        return Ok(None);
    }

    Ok(Some(Conflict {
        status: ConflictStatus::Resolved,
        strategy: Some(ResolutionStrategy::Consensus),
        resolver: None,
        resolved_at: Some(Utc::now()),
        ..conflict.clone()
    }))
}
