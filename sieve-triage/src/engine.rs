//! The triage engine: validation, embedding ranking, cutoff partitioning,
//! and concurrent gray-zone arbitration behind a semaphore.
//!
//! Per-reference failures land in the outcome's `failed` list; only
//! batch-level problems (validation, a cold embedding provider) abort the
//! run. Decisions come back in original batch order regardless of task
//! completion order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use sieve_arbiter::{ArbiterEngine, NullProvider};
use sieve_core::config::SieveConfig;
use sieve_core::constants::MAX_ARBITER_CONCURRENCY;
use sieve_core::errors::{ArbiterError, ValidationError};
use sieve_core::models::{SimilarityScore, UsageEvent};
use sieve_core::traits::ILlmProvider;
use sieve_core::{
    ClassificationMode, Confidence, Decision, DecisionLabel, DecisionSource, Protocol, Reference,
    SieveResult, Stage,
};
use sieve_embeddings::EmbeddingEngine;
use sieve_ranking::{detect_cutoff, rank_by_relevance_with, CutoffResult, ScoreStatistics};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cancel::CancelFlag;
use crate::options::BatchOptions;
use crate::outcome::{BatchOutcome, BatchSummary, FailedReference};

/// End-to-end classification engine for one protocol.
///
/// Generic over the LLM provider; an engine without one still ranks and
/// cuts, leaving the gray zone as `maybe` decisions.
pub struct TriageEngine<P> {
    config: SieveConfig,
    embeddings: EmbeddingEngine,
    arbiter: Option<Arc<ArbiterEngine<P>>>,
}

/// Per-mode result before ordering and summarizing.
struct ModeRun {
    succeeded: Vec<Decision>,
    failed: Vec<FailedReference>,
    arbitrated: usize,
    cancelled: bool,
    statistics: Option<ScoreStatistics>,
    embedding_provider: Option<String>,
}

/// What one arbiter fan-out produced.
struct FanOut {
    decisions: Vec<Decision>,
    failed: Vec<FailedReference>,
    dispatched: usize,
    cancelled: bool,
}

impl TriageEngine<NullProvider> {
    /// Engine without an LLM: gray-zone references stay `maybe`.
    pub fn embedding_only(config: SieveConfig) -> SieveResult<Self> {
        config.validate()?;
        let embeddings = EmbeddingEngine::new(config.embedding.clone())?;
        Ok(Self {
            config,
            embeddings,
            arbiter: None,
        })
    }
}

impl<P: ILlmProvider + 'static> TriageEngine<P> {
    /// Build the configured embedding provider and wire up the arbiter.
    pub fn new(config: SieveConfig, provider: Arc<P>) -> SieveResult<Self> {
        config.validate()?;
        let embeddings = EmbeddingEngine::new(config.embedding.clone())?;
        let arbiter = Arc::new(ArbiterEngine::new(provider, config.arbiter.clone()));
        Ok(Self {
            config,
            embeddings,
            arbiter: Some(arbiter),
        })
    }

    /// Assemble from prebuilt parts (custom providers, tests).
    pub fn from_parts(
        config: SieveConfig,
        embeddings: EmbeddingEngine,
        provider: Option<Arc<P>>,
    ) -> SieveResult<Self> {
        config.validate()?;
        let arbiter = provider.map(|p| Arc::new(ArbiterEngine::new(p, config.arbiter.clone())));
        Ok(Self {
            config,
            embeddings,
            arbiter,
        })
    }

    pub fn config(&self) -> &SieveConfig {
        &self.config
    }

    /// Rank references by similarity to the protocol.
    ///
    /// Synchronous and deterministic given the embedding provider:
    /// descending by score, ties keep input order.
    pub fn rank_references(
        &self,
        protocol: &Protocol,
        references: &[Reference],
    ) -> SieveResult<Vec<SimilarityScore>> {
        protocol.validate_for_screening()?;
        if references.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        self.rank(protocol, references)
    }

    /// Partition a ranking into include / gray / exclude.
    pub fn detect_cutoff(&self, scores: &[SimilarityScore]) -> CutoffResult {
        detect_cutoff(scores, &self.config.cutoff)
    }

    /// Classify a batch end to end.
    pub async fn classify_batch(
        &self,
        protocol: &Protocol,
        references: &[Reference],
        options: BatchOptions,
    ) -> SieveResult<BatchOutcome> {
        self.classify_batch_with_cancel(protocol, references, options, &CancelFlag::new())
            .await
    }

    /// As [`classify_batch`](Self::classify_batch), observing a shared
    /// cancellation flag between arbiter dispatches.
    pub async fn classify_batch_with_cancel(
        &self,
        protocol: &Protocol,
        references: &[Reference],
        options: BatchOptions,
        cancel: &CancelFlag,
    ) -> SieveResult<BatchOutcome> {
        let started = Instant::now();
        protocol.validate_for_screening()?;
        if references.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        let batch = dedup_by_id(references);
        let position = position_index(&batch);

        let run = match options.mode {
            ClassificationMode::Embedding => {
                self.run_embedding(protocol, &batch, &options, cancel).await?
            }
            ClassificationMode::Llm => self.run_llm(protocol, &batch, &options, cancel).await?,
        };

        let ModeRun {
            mut succeeded,
            mut failed,
            arbitrated,
            cancelled,
            statistics,
            embedding_provider,
        } = run;
        succeeded.sort_by_key(|d| position.get(&d.reference_id).copied().unwrap_or(usize::MAX));
        failed.sort_by_key(|f| position.get(&f.reference_id).copied().unwrap_or(usize::MAX));

        let (included, excluded, maybe) = label_counts(&succeeded);
        let summary = BatchSummary {
            total: batch.len(),
            succeeded: succeeded.len(),
            failed: failed.len(),
            included,
            excluded,
            maybe,
            arbitrated,
            cancelled,
            statistics,
            duration_ms: started.elapsed().as_millis() as u64,
            mode: options.mode,
            embedding_provider,
            llm_model: self.arbiter.as_ref().map(|a| a.model().to_string()),
        };
        info!(
            total = summary.total,
            included,
            excluded,
            maybe,
            failed = summary.failed,
            arbitrated,
            cancelled,
            duration_ms = summary.duration_ms,
            "batch classified"
        );
        Ok(BatchOutcome {
            succeeded,
            failed,
            summary,
        })
    }

    /// Usage events accumulated by the arbiter since the last drain.
    pub fn drain_usage_events(&self) -> Vec<UsageEvent> {
        self.arbiter
            .as_ref()
            .map(|a| a.drain_usage_events())
            .unwrap_or_default()
    }

    fn rank(
        &self,
        protocol: &Protocol,
        references: &[Reference],
    ) -> SieveResult<Vec<SimilarityScore>> {
        self.embeddings.warm_up()?;
        let query = self.embeddings.embed_query(protocol)?;
        let vectors = self.embeddings.embed_references(references)?;
        let entries: Vec<(String, Vec<f32>)> = references
            .iter()
            .zip(vectors)
            .map(|(r, v)| (r.id.clone(), v))
            .collect();
        Ok(rank_by_relevance_with(
            &query,
            &entries,
            self.config.triage.parallel_threshold,
        ))
    }

    async fn run_embedding(
        &self,
        protocol: &Protocol,
        batch: &[Reference],
        options: &BatchOptions,
        cancel: &CancelFlag,
    ) -> SieveResult<ModeRun> {
        let scores = self.rank(protocol, batch)?;
        let statistics = ScoreStatistics::from_scores(&scores);
        let cutoff = detect_cutoff(&scores, &self.config.cutoff);
        debug!(
            method = ?cutoff.method,
            high = cutoff.high_threshold,
            low = cutoff.low_threshold,
            include = cutoff.include.len(),
            gray = cutoff.gray.len(),
            exclude = cutoff.exclude.len(),
            "cutoff detected"
        );

        let include: HashSet<&str> = cutoff.include.iter().map(String::as_str).collect();
        let exclude: HashSet<&str> = cutoff.exclude.iter().map(String::as_str).collect();

        let mut succeeded = Vec::with_capacity(scores.len());
        let mut gray_scores = Vec::new();
        for score in &scores {
            if include.contains(score.reference_id.as_str()) {
                succeeded.push(include_decision(score, cutoff.high_threshold));
            } else if exclude.contains(score.reference_id.as_str()) {
                succeeded.push(exclude_decision(score, cutoff.low_threshold));
            } else {
                gray_scores.push(score);
            }
        }

        let mut failed = Vec::new();
        let mut arbitrated = 0;
        let mut cancelled = false;
        match &self.arbiter {
            Some(arbiter) if options.llm_fallback && !gray_scores.is_empty() => {
                let gray_ids: HashSet<&str> = gray_scores
                    .iter()
                    .map(|s| s.reference_id.as_str())
                    .collect();
                let gray_refs: Vec<&Reference> = batch
                    .iter()
                    .filter(|r| gray_ids.contains(r.id.as_str()))
                    .collect();
                let fan_out = self
                    .arbitrate_many(arbiter, protocol, &gray_refs, options.concurrency, cancel)
                    .await;
                succeeded.extend(fan_out.decisions);
                failed = fan_out.failed;
                arbitrated = fan_out.dispatched;
                cancelled = fan_out.cancelled;
            }
            _ => {
                succeeded.extend(gray_scores.iter().map(|s| gray_maybe(s)));
            }
        }

        Ok(ModeRun {
            succeeded,
            failed,
            arbitrated,
            cancelled,
            statistics,
            embedding_provider: Some(self.embeddings.provider_name().to_string()),
        })
    }

    async fn run_llm(
        &self,
        protocol: &Protocol,
        batch: &[Reference],
        options: &BatchOptions,
        cancel: &CancelFlag,
    ) -> SieveResult<ModeRun> {
        let Some(arbiter) = &self.arbiter else {
            return Err(ValidationError::InvalidConfig {
                field: "options.mode".to_string(),
                reason: "llm mode requires an LLM provider".to_string(),
            }
            .into());
        };
        let all: Vec<&Reference> = batch.iter().collect();
        let fan_out = self
            .arbitrate_many(arbiter, protocol, &all, options.concurrency, cancel)
            .await;
        Ok(ModeRun {
            succeeded: fan_out.decisions,
            failed: fan_out.failed,
            arbitrated: fan_out.dispatched,
            cancelled: fan_out.cancelled,
            statistics: None,
            embedding_provider: None,
        })
    }

    /// Fan references out to the arbiter under a concurrency cap.
    ///
    /// The cancel flag is checked before each dispatch, including again
    /// after waiting on a permit; in-flight tasks always run to
    /// completion and keep their results.
    async fn arbitrate_many(
        &self,
        arbiter: &Arc<ArbiterEngine<P>>,
        protocol: &Protocol,
        references: &[&Reference],
        concurrency: usize,
        cancel: &CancelFlag,
    ) -> FanOut {
        let protocol = Arc::new(protocol.clone());
        let semaphore = Arc::new(Semaphore::new(concurrency.clamp(1, MAX_ARBITER_CONCURRENCY)));
        let mut tasks = JoinSet::new();
        let mut dispatched = 0usize;
        let mut cancelled = false;

        for reference in references {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let arbiter = Arc::clone(arbiter);
            let protocol = Arc::clone(&protocol);
            let reference = (*reference).clone();
            dispatched += 1;
            tasks.spawn(async move {
                let result = arbiter.arbitrate(&protocol, &reference).await;
                drop(permit);
                (reference.id, result)
            });
        }

        let mut decisions = Vec::with_capacity(dispatched);
        let mut failed = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(decision))) => decisions.push(decision),
                Ok((reference_id, Err(e))) => {
                    warn!(reference_id = %reference_id, error = %e, "arbitration failed");
                    let needs_manual_review =
                        matches!(&e, ArbiterError::RetriesExhausted { .. });
                    failed.push(FailedReference {
                        reference_id,
                        error: e.to_string(),
                        needs_manual_review,
                    });
                }
                Err(join_error) => {
                    warn!(error = %join_error, "arbitration task aborted");
                }
            }
        }

        FanOut {
            decisions,
            failed,
            dispatched,
            cancelled,
        }
    }
}

fn dedup_by_id(references: &[Reference]) -> Vec<Reference> {
    let mut seen = HashSet::with_capacity(references.len());
    let mut batch = Vec::with_capacity(references.len());
    for reference in references {
        if seen.insert(reference.id.clone()) {
            batch.push(reference.clone());
        } else {
            warn!(reference_id = %reference.id, "duplicate reference id dropped from batch");
        }
    }
    batch
}

fn position_index(batch: &[Reference]) -> HashMap<String, usize> {
    batch
        .iter()
        .enumerate()
        .map(|(index, r)| (r.id.clone(), index))
        .collect()
}

fn label_counts(decisions: &[Decision]) -> (usize, usize, usize) {
    let mut included = 0;
    let mut excluded = 0;
    let mut maybe = 0;
    for decision in decisions {
        match decision.label {
            DecisionLabel::Include => included += 1,
            DecisionLabel::Exclude => excluded += 1,
            DecisionLabel::Maybe => maybe += 1,
        }
    }
    (included, excluded, maybe)
}

/// Normalized distance above the inclusion threshold.
fn include_confidence(score: f64, high: f64) -> Confidence {
    if high >= 1.0 {
        return Confidence::new(1.0);
    }
    Confidence::new((score - high) / (1.0 - high))
}

/// Normalized distance below the exclusion threshold.
fn exclude_confidence(score: f64, low: f64) -> Confidence {
    if low <= 0.0 {
        return Confidence::new(1.0);
    }
    Confidence::new((low - score) / low)
}

fn include_decision(score: &SimilarityScore, high: f64) -> Decision {
    Decision::automated(
        score.reference_id.clone(),
        Stage::TitleAbstract,
        DecisionSource::Embedding,
        DecisionLabel::Include,
        include_confidence(score.score, high),
        format!(
            "similarity {:.3} at or above inclusion threshold {:.3}",
            score.score, high
        ),
    )
}

fn exclude_decision(score: &SimilarityScore, low: f64) -> Decision {
    Decision::automated(
        score.reference_id.clone(),
        Stage::TitleAbstract,
        DecisionSource::Embedding,
        DecisionLabel::Exclude,
        exclude_confidence(score.score, low),
        format!(
            "similarity {:.3} below exclusion threshold {:.3}",
            score.score, low
        ),
    )
}

fn gray_maybe(score: &SimilarityScore) -> Decision {
    Decision::automated(
        score.reference_id.clone(),
        Stage::TitleAbstract,
        DecisionSource::Embedding,
        DecisionLabel::Maybe,
        Confidence::new(Confidence::LOW),
        format!(
            "similarity {:.3} in the gray zone, awaiting manual review",
            score.score
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, value: f64) -> SimilarityScore {
        SimilarityScore {
            reference_id: id.to_string(),
            score: value,
            rank: 0,
        }
    }

    #[test]
    fn include_confidence_scales_with_margin() {
        assert!((include_confidence(0.9, 0.8).value() - 0.5).abs() < 1e-9);
        assert!((include_confidence(1.0, 0.8).value() - 1.0).abs() < 1e-9);
        assert_eq!(include_confidence(0.95, 1.0).value(), 1.0);
    }

    #[test]
    fn exclude_confidence_scales_with_margin() {
        assert!((exclude_confidence(0.1, 0.4).value() - 0.75).abs() < 1e-9);
        assert!((exclude_confidence(0.0, 0.4).value() - 1.0).abs() < 1e-9);
        assert_eq!(exclude_confidence(0.0, 0.0).value(), 1.0);
    }

    #[test]
    fn duplicate_ids_keep_the_first_occurrence() {
        let refs = vec![
            Reference {
                id: "a".to_string(),
                title: "first".to_string(),
                abstract_text: String::new(),
                year: None,
                source: None,
            },
            Reference {
                id: "a".to_string(),
                title: "second".to_string(),
                abstract_text: String::new(),
                year: None,
                source: None,
            },
            Reference {
                id: "b".to_string(),
                title: "third".to_string(),
                abstract_text: String::new(),
                year: None,
                source: None,
            },
        ];
        let batch = dedup_by_id(&refs);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].title, "first");
        assert_eq!(batch[1].id, "b");
    }

    #[test]
    fn label_counts_cover_all_labels() {
        let decisions = vec![
            include_decision(&score("a", 0.9), 0.8),
            exclude_decision(&score("b", 0.1), 0.4),
            gray_maybe(&score("c", 0.5)),
            include_decision(&score("d", 0.85), 0.8),
        ];
        assert_eq!(label_counts(&decisions), (2, 1, 1));
    }
}
