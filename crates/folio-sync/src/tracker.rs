//! Persistence bookkeeping, independent of any runtime.
//!
//! Every snapshot handed to the agent is tagged with a monotonically
//! increasing sequence number. The tracker decides whether a change needs
//! persisting at all, hands out those numbers, and applies completions so a
//! slow answer for an old snapshot can never be mistaken for the latest one.
//!
//! ```text
//!   notify(prev, cur) ──▶ issue() = n     (latest_issued = n)
//!                          │
//!          worker picks up the newest n, PUTs it
//!                          │
//!   complete(n, ok) ──▶ Applied   n > last_acked          (last_acked = n)
//!                   ──▶ Stale     n <= last_acked         (ignored)
//!                   ──▶ Failed    request failed          (logged, no retry)
//! ```

use folio_store::Snapshot;

/// How a completed persistence call was treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Newest acknowledged state; `superseded` snapshots were never sent.
    Applied { seq: u64, superseded: u64 },
    /// An older call finished after a newer one was acknowledged.
    Stale { seq: u64, last_acked: u64 },
    /// The call failed. Local state stays authoritative.
    Failed { seq: u64 },
}

/// Sequence-number state for one page's persistence stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncTracker {
    /// Last sequence number handed out (0 = nothing issued yet).
    latest_issued: u64,
    /// Highest sequence number whose call has finished, either way.
    last_completed: u64,
    /// Highest sequence number the remote store acknowledged.
    last_acked: Option<u64>,
    /// Snapshots coalesced away without ever being sent.
    superseded: u64,
    /// Calls that failed.
    failures: u64,
    /// Message of the most recent failure, cleared on success.
    last_error: Option<String>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a transition from `previous` to `current` needs persisting.
    ///
    /// Only a real change does: there must be a previous snapshot (the
    /// initial hydration is already what the store holds) and it must not be
    /// the very same snapshot.
    pub fn should_persist(previous: Option<&Snapshot>, current: &Snapshot) -> bool {
        previous.is_some_and(|prev| !prev.same(current))
    }

    /// Hand out the next sequence number.
    pub fn issue(&mut self) -> u64 {
        self.latest_issued += 1;
        self.latest_issued
    }

    /// Record the outcome of the call for `seq`.
    pub fn complete(&mut self, seq: u64, result: Result<(), String>) -> Completion {
        let skipped = seq.saturating_sub(self.last_completed + 1);
        self.last_completed = self.last_completed.max(seq);
        self.superseded += skipped;

        match result {
            Err(message) => {
                self.failures += 1;
                self.last_error = Some(message);
                Completion::Failed { seq }
            }
            Ok(()) => match self.last_acked {
                Some(acked) if seq <= acked => Completion::Stale {
                    seq,
                    last_acked: acked,
                },
                _ => {
                    self.last_acked = Some(seq);
                    self.last_error = None;
                    Completion::Applied {
                        seq,
                        superseded: skipped,
                    }
                }
            },
        }
    }

    /// True when every issued snapshot has been either sent or superseded.
    pub fn is_settled(&self) -> bool {
        self.last_completed >= self.latest_issued
    }

    pub fn latest_issued(&self) -> u64 {
        self.latest_issued
    }

    pub fn last_completed(&self) -> u64 {
        self.last_completed
    }

    pub fn last_acked(&self) -> Option<u64> {
        self.last_acked
    }

    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
