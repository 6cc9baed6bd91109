//! Editor core for folio: intent handling and focus.
//!
//! The rendering layer reports what the user did as [`IntentEvent`]s. A
//! [`PageController`] applies them to the page's block list through
//! `folio-store`, moves focus after splits and deletes ([`FocusTracker`]),
//! and hands each committed snapshot to a [`ChangeSink`], normally a
//! `folio-sync` [`SyncHandle`](folio_sync::SyncHandle).
//!
//! Nothing here awaits. Intents are applied synchronously, one at a time.

pub mod controller;
pub mod focus;
pub mod intent;

pub use controller::{ChangeSink, ControllerConfig, ControllerError, Outcome, PageController};
pub use focus::{Caret, FocusRequest, FocusTarget, FocusTracker, RecordedFocus};
pub use intent::IntentEvent;
