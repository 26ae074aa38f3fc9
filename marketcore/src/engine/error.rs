//! The core exposes exactly one error-bearing call: loading a snapshot.
//! Everything else is a total function — an unmatchable command becomes an
//! `OrderStatusEvent(Cancelled)` or a silent no-op, never an `Err`.
//! Internal invariant violations are not represented here at all; they are
//! programming defects and panic (see `debug_assert!` call sites in
//! `matching.rs`/`book.rs`) rather than surface as a recoverable error.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("snapshot failed structural decoding: {0}")]
    CorruptSnapshot(String),
}
