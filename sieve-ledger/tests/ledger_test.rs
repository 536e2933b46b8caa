use sieve_core::errors::LedgerError;
use sieve_ledger::{ContentType, LedgerEngine, ReviewSummary};

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

// ── Initial state ─────────────────────────────────────────────────────────

#[test]
fn a_new_ledger_has_27_pending_items() {
    let ledger = LedgerEngine::new("proj-1");
    let items = ledger.items();

    assert_eq!(items.len(), 27);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item.number as usize, i + 1);
        assert_eq!(item.content_type, ContentType::Pending);
    }

    let stats = ledger.stats();
    assert_eq!(stats.total, 27);
    assert_eq!(stats.completed, 0);
    assert_eq!(stats.pending, 27);
    assert_eq!(stats.percent_complete, 0.0);
    assert!(!stats.locked);
    assert!(!ledger.is_locked());
}

// ── Provenance transitions ────────────────────────────────────────────────

#[test]
fn automated_content_fills_a_pending_item() {
    let ledger = LedgerEngine::new("proj-1");
    let item = ledger
        .set_automated_content(7, "Search strategy text.", "search module")
        .unwrap();

    assert_eq!(item.content_type, ContentType::Automated);
    assert_eq!(item.content, "Search strategy text.");
    assert_eq!(item.automated_content.as_deref(), Some("Search strategy text."));
    assert_eq!(item.data_source.as_deref(), Some("search module"));
    assert!(item.last_human_edit.is_none());

    // The engine state reflects the returned delta.
    assert_eq!(ledger.item(7).unwrap().content, "Search strategy text.");
}

#[test]
fn regeneration_overwrites_automated_content() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.set_automated_content(7, "First draft.", "v1").unwrap();
    let item = ledger.set_automated_content(7, "Second draft.", "v2").unwrap();

    assert_eq!(item.content_type, ContentType::Automated);
    assert_eq!(item.content, "Second draft.");
    assert_eq!(item.automated_content.as_deref(), Some("Second draft."));
    assert_eq!(item.data_source.as_deref(), Some("v2"));
}

#[test]
fn human_edit_of_a_pending_item_makes_it_human() {
    let ledger = LedgerEngine::new("proj-1");
    let item = ledger.mark_human_edited(3, "Rationale written by hand.").unwrap();

    assert_eq!(item.content_type, ContentType::Human);
    assert!(item.last_human_edit.is_some());
    assert!(item.automated_content.is_none());
}

#[test]
fn automation_never_overwrites_a_human_item() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.mark_human_edited(7, "Hand-written strategy.").unwrap();

    let err = ledger
        .set_automated_content(7, "Machine text.", "search module")
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InvalidTransition { number: 7, .. }
    ));
    assert_eq!(ledger.item(7).unwrap().content, "Hand-written strategy.");
}

#[test]
fn human_edit_of_automated_content_becomes_hybrid_and_keeps_the_original() {
    let ledger = LedgerEngine::new("proj-1");
    ledger
        .set_automated_content(16, "Generated flow text.", "flow counts")
        .unwrap();
    let item = ledger.mark_human_edited(16, "Generated flow text, polished.").unwrap();

    assert_eq!(item.content_type, ContentType::Hybrid);
    assert_eq!(item.content, "Generated flow text, polished.");
    // The machine draft stays frozen under the edit.
    assert_eq!(item.automated_content.as_deref(), Some("Generated flow text."));

    // Hybrid items stay hybrid through further edits and still reject
    // automation.
    let again = ledger.mark_human_edited(16, "Final wording.").unwrap();
    assert_eq!(again.content_type, ContentType::Hybrid);
    assert!(ledger
        .set_automated_content(16, "Regenerated.", "flow counts")
        .is_err());
}

#[test]
fn unknown_and_empty_inputs_are_rejected() {
    let ledger = LedgerEngine::new("proj-1");

    assert!(matches!(
        ledger.set_automated_content(0, "x", "s").unwrap_err(),
        LedgerError::UnknownItem { number: 0 }
    ));
    assert!(matches!(
        ledger.set_automated_content(28, "x", "s").unwrap_err(),
        LedgerError::UnknownItem { number: 28 }
    ));
    assert!(matches!(
        ledger.set_automated_content(5, "   ", "s").unwrap_err(),
        LedgerError::EmptyContent { number: 5 }
    ));
    assert!(matches!(
        ledger.mark_human_edited(5, "").unwrap_err(),
        LedgerError::EmptyContent { number: 5 }
    ));
}

// ── Lock semantics ────────────────────────────────────────────────────────

#[test]
fn locking_freezes_every_mutation() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.set_automated_content(16, "Flow.", "counts").unwrap();

    let lock = ledger.lock().unwrap();
    assert!(lock.locked);
    assert!(lock.completed_at.is_some());
    assert!(ledger.is_locked());

    assert!(matches!(
        ledger.set_automated_content(17, "More.", "counts").unwrap_err(),
        LedgerError::ComplianceLocked { .. }
    ));
    assert!(matches!(
        ledger.mark_human_edited(16, "Edit.").unwrap_err(),
        LedgerError::ComplianceLocked { .. }
    ));
    // Reads still work.
    assert_eq!(ledger.item(16).unwrap().content, "Flow.");
}

#[test]
fn locking_twice_is_an_explicit_error() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.lock().unwrap();
    assert!(matches!(ledger.lock().unwrap_err(), LedgerError::AlreadyLocked));
    // Still locked afterwards.
    assert!(ledger.is_locked());
}

// ── Stats ─────────────────────────────────────────────────────────────────

#[test]
fn stats_count_by_provenance() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.set_automated_content(16, "Flow.", "counts").unwrap();
    ledger.set_automated_content(17, "Characteristics.", "counts").unwrap();
    ledger.mark_human_edited(17, "Characteristics, edited.").unwrap();
    ledger.mark_human_edited(3, "Rationale.").unwrap();

    let stats = ledger.stats();
    assert_eq!(stats.total, 27);
    assert_eq!(stats.completed, 3);
    assert_eq!(stats.pending, 24);
    assert_eq!(stats.automated, 1);
    assert_eq!(stats.human, 1);
    assert_eq!(stats.hybrid, 1);
    assert!((stats.percent_complete - 300.0 / 27.0).abs() < 1e-9);
}

// ── Persistence round trip ────────────────────────────────────────────────

#[test]
fn from_parts_rehydrates_items_and_lock() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.set_automated_content(16, "Flow.", "counts").unwrap();
    ledger.mark_human_edited(3, "Rationale.").unwrap();
    let lock = ledger.lock().unwrap();

    let restored = LedgerEngine::from_parts("proj-1", ledger.items(), lock).unwrap();
    assert!(restored.is_locked());
    assert_eq!(restored.stats().completed, 2);
    assert_eq!(restored.item(16).unwrap().content, "Flow.");
    assert!(matches!(
        restored.mark_human_edited(4, "Nope.").unwrap_err(),
        LedgerError::ComplianceLocked { .. }
    ));
}

#[test]
fn from_parts_rejects_duplicate_and_missing_numbers() {
    let ledger = LedgerEngine::new("proj-1");
    let mut duplicated = ledger.items();
    duplicated[1].number = 1;
    assert!(matches!(
        LedgerEngine::from_parts("p", duplicated, Default::default()).unwrap_err(),
        LedgerError::UnknownItem { number: 1 }
    ));

    let mut short = ledger.items();
    short.pop();
    assert!(matches!(
        LedgerEngine::from_parts("p", short, Default::default()).unwrap_err(),
        LedgerError::UnknownItem { number: 27 }
    ));
}

// ── Auto-population ───────────────────────────────────────────────────────

#[test]
fn auto_populate_fills_the_flow_and_declaration_items() {
    let ledger = LedgerEngine::new("proj-1");
    let written = ledger.auto_populate(&summary()).unwrap();

    let numbers: Vec<u8> = written.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![16, 17, 23, 24, 26, 27]);
    for item in &written {
        assert_eq!(item.content_type, ContentType::Automated);
    }

    let flow = ledger.item(16).unwrap();
    assert!(flow.content.contains("150 records"));
    assert!(flow.content.contains("18 studies met all inclusion criteria"));
    assert!(ledger.item(23).unwrap().content.contains("gpt-4o-mini"));
    assert!(ledger.item(26).unwrap().content.contains("no conflicts of interest"));
    assert_eq!(ledger.stats().completed, 6);
}

#[test]
fn auto_populate_skips_human_owned_items() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.mark_human_edited(23, "My own discussion.").unwrap();

    let written = ledger.auto_populate(&summary()).unwrap();
    let numbers: Vec<u8> = written.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![16, 17, 24, 26, 27]);
    assert_eq!(ledger.item(23).unwrap().content, "My own discussion.");
    assert_eq!(ledger.item(23).unwrap().content_type, ContentType::Human);
}

#[test]
fn auto_populate_rejects_a_locked_ledger() {
    let ledger = LedgerEngine::new("proj-1");
    ledger.lock().unwrap();
    assert!(matches!(
        ledger.auto_populate(&summary()).unwrap_err(),
        LedgerError::ComplianceLocked { .. }
    ));
}
