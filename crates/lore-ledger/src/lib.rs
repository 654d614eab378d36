//! # lore-ledger
//!
//! Append-only record of attribute assertions and temporal anchors.
//!
//! Nothing is overwritten. Entity merges, operator reassignments and
//! re-analysed chapters are appended as [`LedgerEvent`]s; the current view
//! is rebuilt by replaying the log into a [`LedgerSnapshot`].

pub mod events;
pub mod ledger;
pub mod snapshot;

pub use events::LedgerEvent;
pub use ledger::AttributeLedger;
pub use snapshot::{EntityFacts, LedgerSnapshot};
