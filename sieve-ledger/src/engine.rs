//! The ledger engine: a provenance state machine over the 27 checklist
//! items, guarded by a one-way compliance lock.
//!
//! All mutations observe the lock and apply their transition under one
//! mutex guard, so check-then-mutate is atomic. A locked ledger rejects
//! every content mutation with an explicit error; nothing no-ops
//! silently.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sieve_core::constants::PRISMA_ITEM_COUNT;
use sieve_core::errors::LedgerError;
use tracing::{debug, info};

use crate::item::{ContentType, PrismaItem};

/// One-way lock state. Once `locked` is set the ledger is read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceLock {
    pub locked: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Completion counters for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub automated: usize,
    pub human: usize,
    pub hybrid: usize,
    pub percent_complete: f64,
    pub locked: bool,
}

#[derive(Debug)]
struct LedgerState {
    /// Always exactly 27 items, sorted by number.
    items: Vec<PrismaItem>,
    lock: ComplianceLock,
}

/// Compliance ledger for one review project.
#[derive(Debug)]
pub struct LedgerEngine {
    project_id: String,
    state: Mutex<LedgerState>,
}

impl LedgerEngine {
    /// A fresh ledger with all 27 items pending.
    pub fn new(project_id: impl Into<String>) -> Self {
        let items = (1..=PRISMA_ITEM_COUNT as u8).map(PrismaItem::pending).collect();
        Self {
            project_id: project_id.into(),
            state: Mutex::new(LedgerState {
                items,
                lock: ComplianceLock::default(),
            }),
        }
    }

    /// Rehydrate a ledger from caller-persisted state.
    ///
    /// `items` must hold exactly one item per number 1..=27; order does
    /// not matter. A duplicate, out-of-range, or missing number is
    /// reported as `UnknownItem` naming the offender.
    pub fn from_parts(
        project_id: impl Into<String>,
        mut items: Vec<PrismaItem>,
        lock: ComplianceLock,
    ) -> Result<Self, LedgerError> {
        let mut seen = [false; PRISMA_ITEM_COUNT];
        for item in &items {
            let number = item.number as usize;
            if number == 0 || number > PRISMA_ITEM_COUNT || seen[number - 1] {
                return Err(LedgerError::UnknownItem {
                    number: item.number,
                });
            }
            seen[number - 1] = true;
        }
        if let Some(missing) = seen.iter().position(|present| !present) {
            return Err(LedgerError::UnknownItem {
                number: missing as u8 + 1,
            });
        }
        items.sort_unstable_by_key(|item| item.number);
        Ok(Self {
            project_id: project_id.into(),
            state: Mutex::new(LedgerState { items, lock }),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn guard(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write machine-generated content to an item.
    ///
    /// Allowed on `Pending` and `Automated` items; regeneration simply
    /// overwrites. Human-touched items (`Human`, `Hybrid`) reject the
    /// write, so automation can never clobber a reviewer's text.
    pub fn set_automated_content(
        &self,
        number: u8,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<PrismaItem, LedgerError> {
        let content = content.into();
        let mut state = self.guard();
        if state.lock.locked {
            return Err(LedgerError::ComplianceLocked {
                action: format!("set_automated_content({number})"),
            });
        }
        let item = item_mut(&mut state.items, number)?;
        if content.trim().is_empty() {
            return Err(LedgerError::EmptyContent { number });
        }
        match item.content_type {
            ContentType::Pending | ContentType::Automated => {
                item.content = content.clone();
                item.automated_content = Some(content);
                item.data_source = Some(source.into());
                item.content_type = ContentType::Automated;
                item.updated_at = Utc::now();
                debug!(item = number, "automated content set");
                Ok(item.clone())
            }
            from => Err(LedgerError::InvalidTransition {
                number,
                from: from.to_string(),
                action: "set_automated_content".to_string(),
            }),
        }
    }

    /// Record a human edit to an item's content.
    ///
    /// `Pending` becomes `Human`; `Automated` becomes `Hybrid` with the
    /// prior automated text preserved for audit. Once human or hybrid, an
    /// item stays so through further edits.
    pub fn mark_human_edited(
        &self,
        number: u8,
        content: impl Into<String>,
    ) -> Result<PrismaItem, LedgerError> {
        let content = content.into();
        let mut state = self.guard();
        if state.lock.locked {
            return Err(LedgerError::ComplianceLocked {
                action: format!("mark_human_edited({number})"),
            });
        }
        let item = item_mut(&mut state.items, number)?;
        if content.trim().is_empty() {
            return Err(LedgerError::EmptyContent { number });
        }
        let now = Utc::now();
        item.content_type = match item.content_type {
            ContentType::Pending | ContentType::Human => ContentType::Human,
            ContentType::Automated | ContentType::Hybrid => ContentType::Hybrid,
        };
        item.content = content;
        item.last_human_edit = Some(now);
        item.updated_at = now;
        debug!(item = number, content_type = %item.content_type, "human edit recorded");
        Ok(item.clone())
    }

    /// Lock the ledger. One-way: there is no unlock.
    pub fn lock(&self) -> Result<ComplianceLock, LedgerError> {
        let mut state = self.guard();
        if state.lock.locked {
            return Err(LedgerError::AlreadyLocked);
        }
        state.lock = ComplianceLock {
            locked: true,
            completed_at: Some(Utc::now()),
        };
        info!(project_id = %self.project_id, "compliance ledger locked");
        Ok(state.lock)
    }

    pub fn is_locked(&self) -> bool {
        self.guard().lock.locked
    }

    /// Current lock state, for persistence alongside `items()`.
    pub fn lock_state(&self) -> ComplianceLock {
        self.guard().lock
    }

    /// Snapshot of all 27 items in number order.
    pub fn items(&self) -> Vec<PrismaItem> {
        self.guard().items.clone()
    }

    /// Snapshot of a single item.
    pub fn item(&self, number: u8) -> Option<PrismaItem> {
        let state = self.guard();
        if number == 0 || number as usize > state.items.len() {
            return None;
        }
        Some(state.items[number as usize - 1].clone())
    }

    /// Completion counters across all items.
    pub fn stats(&self) -> LedgerStats {
        let state = self.guard();
        let mut pending = 0;
        let mut automated = 0;
        let mut human = 0;
        let mut hybrid = 0;
        for item in &state.items {
            match item.content_type {
                ContentType::Pending => pending += 1,
                ContentType::Automated => automated += 1,
                ContentType::Human => human += 1,
                ContentType::Hybrid => hybrid += 1,
            }
        }
        let total = state.items.len();
        let completed = total - pending;
        LedgerStats {
            total,
            completed,
            pending,
            automated,
            human,
            hybrid,
            percent_complete: completed as f64 / total as f64 * 100.0,
            locked: state.lock.locked,
        }
    }
}

fn item_mut(items: &mut [PrismaItem], number: u8) -> Result<&mut PrismaItem, LedgerError> {
    if number == 0 || number as usize > items.len() {
        return Err(LedgerError::UnknownItem { number });
    }
    Ok(&mut items[number as usize - 1])
}
