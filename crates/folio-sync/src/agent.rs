//! Sync agent — persists a page's block list in the background.
//!
//! The agent is a depth-1, latest-wins queue in front of a [`RemoteStore`].
//! The editor hands it every committed snapshot; the agent PUTs only the
//! newest one, one call at a time, on a detached tokio task.
//!
//! ```text
//!   SyncHandle (Clone, sync)    watch (1 slot)    SyncWorker (tokio task)
//!   ┌──────────────────────┐  ──────────────▶  ┌────────────────────────┐
//!   │ .notify(prev, cur)   │   newest wins     │ put_page(newest)       │
//!   │ .flush().await       │                   │ one call in flight     │
//!   │ .status()            │  ◀──────────────  │ tracker.complete(seq)  │
//!   └──────────────────────┘   watch(tracker)  └────────────────────────┘
//! ```
//!
//! Snapshots that arrive while a call is in flight overwrite the slot, so
//! intermediate states are never sent. Because the worker never runs two calls
//! at once, an older snapshot can't land on the remote after a newer one.
//! Failed calls are logged and dropped: no retry, no rollback.

use std::sync::Arc;

use folio_store::Snapshot;
use folio_types::PageId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::remote::RemoteStore;
use crate::tracker::{Completion, SyncTracker};

/// A snapshot waiting to be persisted.
#[derive(Debug, Clone)]
struct Pending {
    seq: u64,
    page_id: PageId,
    blocks: Snapshot,
}

// ============================================================================
// SyncHandle (public API)
// ============================================================================

/// Handle to a running sync agent.
///
/// Cheap to clone; every clone feeds the same worker.
#[derive(Clone)]
pub struct SyncHandle {
    slot: Arc<watch::Sender<Option<Pending>>>,
    tracker: Arc<watch::Sender<SyncTracker>>,
    cancel: CancellationToken,
}

impl SyncHandle {
    /// Report a committed transition from `previous` to `current`.
    ///
    /// Schedules persistence of `current` when it differs from `previous` by
    /// identity; returns the sequence number it was tagged with. Never blocks.
    pub fn notify(
        &self,
        page_id: &PageId,
        previous: Option<&Snapshot>,
        current: &Snapshot,
    ) -> Option<u64> {
        if !SyncTracker::should_persist(previous, current) {
            trace!(page = %page_id, "snapshot unchanged, nothing to persist");
            return None;
        }
        if self.cancel.is_cancelled() {
            warn!(page = %page_id, "sync agent shut down, change not persisted");
            return None;
        }

        // Numbered under the slot lock, so the slot always ends up holding
        // the highest sequence number issued. Overwrites whatever the worker
        // hasn't picked up yet.
        let mut seq = 0;
        self.slot.send_modify(|slot| {
            self.tracker.send_modify(|tracker| seq = tracker.issue());
            *slot = Some(Pending {
                seq,
                page_id: page_id.clone(),
                blocks: current.clone(),
            });
        });
        debug!(page = %page_id, seq, blocks = current.len(), "scheduled persistence");
        Some(seq)
    }

    /// Current bookkeeping (issued / completed / acknowledged, last error).
    pub fn status(&self) -> SyncTracker {
        self.tracker.borrow().clone()
    }

    /// Watch bookkeeping changes.
    pub fn subscribe_status(&self) -> watch::Receiver<SyncTracker> {
        self.tracker.subscribe()
    }

    /// Wait until every scheduled snapshot has been sent or superseded.
    ///
    /// Never resolves if the worker was shut down with work outstanding —
    /// wrap in a timeout at the call site.
    pub async fn flush(&self) {
        let mut rx = self.tracker.subscribe();
        // Sender is owned by `self`, so the channel cannot close here.
        let _ = rx.wait_for(SyncTracker::is_settled).await;
    }

    /// Stop the worker once its current call (if any) finishes.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// ============================================================================
// SyncWorker (background task)
// ============================================================================

struct SyncWorker {
    remote: Arc<dyn RemoteStore>,
    tracker: Arc<watch::Sender<SyncTracker>>,
    cancel: CancellationToken,
}

impl SyncWorker {
    /// Drain the slot until cancelled.
    async fn run(self, mut slot: watch::Receiver<Option<Pending>>) {
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                changed = slot.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let pending = slot.borrow_and_update().clone();
            if let Some(pending) = pending {
                // Not raced against `cancel`: in-flight calls always finish.
                self.persist(pending).await;
            }
        }
        debug!("Sync worker shutting down");
    }

    async fn persist(&self, pending: Pending) {
        let Pending { seq, page_id, blocks } = pending;
        let result = self
            .remote
            .put_page(&page_id, &blocks)
            .await
            .map_err(|e| e.to_string());

        let mut completion = None;
        self.tracker
            .send_modify(|tracker| completion = Some(tracker.complete(seq, result)));

        match completion {
            Some(Completion::Applied { seq, superseded }) => {
                info!(page = %page_id, seq, blocks = blocks.len(), superseded, "page persisted");
            }
            Some(Completion::Stale { seq, last_acked }) => {
                debug!(page = %page_id, seq, last_acked, "ignoring stale completion");
            }
            Some(Completion::Failed { seq }) => {
                let error = self.tracker.borrow().last_error().unwrap_or_default().to_string();
                warn!(page = %page_id, seq, %error, "failed to persist page, keeping local state");
            }
            None => {}
        }
    }
}

// ============================================================================
// Public spawn function
// ============================================================================

/// Spawn a sync agent on the current tokio runtime.
///
/// The worker exits on [`SyncHandle::shutdown`] or when every handle is
/// dropped.
pub fn spawn_sync_agent(remote: Arc<dyn RemoteStore>) -> (SyncHandle, JoinHandle<()>) {
    let (slot_tx, slot_rx) = watch::channel(None);
    let (tracker_tx, _) = watch::channel(SyncTracker::new());
    let tracker = Arc::new(tracker_tx);
    let cancel = CancellationToken::new();

    let worker = SyncWorker {
        remote,
        tracker: Arc::clone(&tracker),
        cancel: cancel.clone(),
    };
    let task = tokio::spawn(worker.run(slot_rx));

    let handle = SyncHandle {
        slot: Arc::new(slot_tx),
        tracker,
        cancel,
    };
    (handle, task)
}
