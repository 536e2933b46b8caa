use sieve_core::config::CutoffConfig;
use sieve_core::models::SimilarityScore;
use sieve_ranking::{
    cosine_similarity, detect_cutoff, rank_by_relevance, CutoffMethod, ScoreStatistics,
};

/// Unit vector pointing `degrees` away from the query axis in a 2D plane
/// embedded in a larger space. Gives precise control over cosine scores.
fn rotated(degrees: f64, dims: usize) -> Vec<f32> {
    let rad = degrees.to_radians();
    let mut v = vec![0.0f32; dims];
    v[0] = rad.cos() as f32;
    v[1] = rad.sin() as f32;
    v
}

fn query(dims: usize) -> Vec<f32> {
    rotated(0.0, dims)
}

// ── Ranking ───────────────────────────────────────────────────────────────

#[test]
fn ranking_orders_by_angular_closeness() {
    let q = query(8);
    let entries = vec![
        ("far".to_string(), rotated(80.0, 8)),
        ("near".to_string(), rotated(10.0, 8)),
        ("mid".to_string(), rotated(45.0, 8)),
    ];

    let ranked = rank_by_relevance(&q, &entries);

    let order: Vec<&str> = ranked.iter().map(|s| s.reference_id.as_str()).collect();
    assert_eq!(order, vec!["near", "mid", "far"]);
    assert_eq!(
        ranked.iter().map(|s| s.rank).collect::<Vec<_>>(),
        vec![0, 1, 2],
        "ranks should be dense and zero-based"
    );
}

#[test]
fn opposite_direction_clamps_to_zero() {
    let q = query(4);
    let entries = vec![("anti".to_string(), rotated(180.0, 4))];

    let ranked = rank_by_relevance(&q, &entries);

    assert_eq!(ranked[0].score, 0.0, "negative cosine must clamp to 0");
}

#[test]
fn missing_embedding_scores_zero_instead_of_erroring() {
    let q = query(4);
    let entries = vec![
        ("ok".to_string(), rotated(5.0, 4)),
        ("empty".to_string(), Vec::new()),
        ("wrong_dims".to_string(), vec![1.0f32; 7]),
    ];

    let ranked = rank_by_relevance(&q, &entries);

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].reference_id, "ok");
    for s in &ranked[1..] {
        assert_eq!(s.score, 0.0, "{} should score 0", s.reference_id);
    }
}

#[test]
fn cosine_is_independent_of_magnitude() {
    let a = vec![1.0f32, 2.0, 3.0];
    let b: Vec<f32> = a.iter().map(|v| v * 250.0).collect();
    let sim = cosine_similarity(&a, &b);
    assert!((sim - 1.0).abs() < 1e-6, "scaled copy should score 1, got {sim}");
}

// ── Cutoff ────────────────────────────────────────────────────────────────

#[test]
fn clustered_corpus_splits_at_the_gap() {
    let q = query(16);
    let mut entries: Vec<(String, Vec<f32>)> = (0..6)
        .map(|i| (format!("relevant-{i}"), rotated(5.0 + i as f64, 16)))
        .collect();
    entries.extend((0..6).map(|i| (format!("offtopic-{i}"), rotated(75.0 + i as f64, 16))));

    let ranked = rank_by_relevance(&q, &entries);
    let result = detect_cutoff(&ranked, &CutoffConfig::default());

    assert_eq!(result.method, CutoffMethod::Knee);
    assert!(
        result.include.iter().all(|id| id.starts_with("relevant")),
        "auto-include must not pick up the off-topic cluster: {:?}",
        result.include
    );
    assert!(result.high_threshold >= result.low_threshold);
}

#[test]
fn four_references_never_auto_classify() {
    let q = query(8);
    let entries: Vec<(String, Vec<f32>)> = (0..4)
        .map(|i| (format!("r{i}"), rotated(10.0 * i as f64, 8)))
        .collect();

    let ranked = rank_by_relevance(&q, &entries);
    let result = detect_cutoff(&ranked, &CutoffConfig::default());

    assert_eq!(result.method, CutoffMethod::TooFew);
    assert_eq!(result.gray.len(), 4);
    assert!(result.include.is_empty() && result.exclude.is_empty());
}

#[test]
fn gray_zone_sits_between_include_and_exclude() {
    let scores: Vec<SimilarityScore> = [0.97, 0.94, 0.91, 0.55, 0.52, 0.50, 0.12, 0.09, 0.06, 0.04]
        .iter()
        .enumerate()
        .map(|(rank, &score)| SimilarityScore {
            reference_id: format!("r{rank}"),
            score,
            rank,
        })
        .collect();

    let result = detect_cutoff(&scores, &CutoffConfig::default());

    let reconstructed: Vec<String> = result
        .include
        .iter()
        .chain(&result.gray)
        .chain(&result.exclude)
        .cloned()
        .collect();
    let expected: Vec<String> = (0..10).map(|i| format!("r{i}")).collect();
    assert_eq!(reconstructed, expected, "partition must follow rank order");
}

// ── Statistics ────────────────────────────────────────────────────────────

#[test]
fn statistics_summarize_a_ranked_batch() {
    let q = query(8);
    let entries: Vec<(String, Vec<f32>)> = (0..20)
        .map(|i| (format!("r{i}"), rotated(4.0 * i as f64, 8)))
        .collect();

    let ranked = rank_by_relevance(&q, &entries);
    let stats = ScoreStatistics::from_scores(&ranked).unwrap();

    assert_eq!(stats.count, 20);
    assert!(stats.max <= 1.0 && stats.min >= 0.0);
    assert!(stats.max >= stats.p95 && stats.p95 >= stats.median);
    assert!(stats.median >= stats.p25 && stats.p25 >= stats.min);
    assert!(stats.std_dev > 0.0, "spread-out angles should have nonzero deviation");
}
