use crate::types::{CachedVerse, VerseRecord};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Handed out when a refresh starts; orders commits by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone)]
pub enum CommitOutcome {
    Installed(Arc<CachedVerse>),
    /// A refresh that started later already committed; the slot kept it.
    Superseded(Arc<CachedVerse>),
}

impl CommitOutcome {
    pub fn current(&self) -> &Arc<CachedVerse> {
        match self {
            CommitOutcome::Installed(v) | CommitOutcome::Superseded(v) => v,
        }
    }

    pub fn into_current(self) -> Arc<CachedVerse> {
        match self {
            CommitOutcome::Installed(v) | CommitOutcome::Superseded(v) => v,
        }
    }
}

#[derive(Default)]
struct Slot {
    ticket: Option<RefreshTicket>,
    verse: Option<Arc<CachedVerse>>,
}

/// The single "current verse" slot.
///
/// Writers only ever swap in a complete `CachedVerse`; readers get an `Arc`
/// to whatever was installed last and never wait on network I/O.
#[derive(Default)]
pub struct VerseCache {
    slot: RwLock<Slot>,
    next_ticket: AtomicU64,
}

impl VerseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<CachedVerse>> {
        self.slot.read().await.verse.clone()
    }

    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Installs `record` unless a newer refresh has already been committed.
    pub async fn commit(
        &self,
        ticket: RefreshTicket,
        record: VerseRecord,
        now: DateTime<Utc>,
    ) -> CommitOutcome {
        let mut slot = self.slot.write().await;
        if let (Some(installed), Some(verse)) = (slot.ticket, slot.verse.as_ref()) {
            if installed > ticket {
                debug!(?ticket, ?installed, "Discarding stale refresh result");
                return CommitOutcome::Superseded(verse.clone());
            }
        }

        let verse = Arc::new(CachedVerse {
            record,
            last_updated: now,
        });
        slot.ticket = Some(ticket);
        slot.verse = Some(verse.clone());
        CommitOutcome::Installed(verse)
    }
}
