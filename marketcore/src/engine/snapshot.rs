//! Snapshot / restore (component D): a byte-exact image of everything a
//! market engine needs to resume from rather than replay a log from empty.
//!
//! Grounded structurally in `original_source/engine/order_book.go`'s
//! `MarketBackup`/`Load`/`Backup` trio (what a backup carries: both side
//! indexes, both pending-market queues, market id and precisions) and
//! `original_source/server/market_engine_backup.go` (the backup also
//! carries the source log's topic/partition/offset so the caller can reset
//! its consumer after a restore — the core treats that triple as opaque
//! passthrough, never interpreting it). The checksum-wrapper shape
//! (`version` + payload + checksum, validated before trusting the decode)
//! follows `joaquinbejar-OrderBook-rs`'s `OrderBookSnapshotPackage`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::book::OrderBook;
use super::error::SnapshotError;

/// Format version for [`MarketBackup`]'s `bincode` encoding. `MarketBackup`'s
/// field order is a stable wire contract once shipped; this byte is the
/// discriminator a future incompatible change would branch on.
pub const BACKUP_FORMAT_VERSION: u16 = 1;

/// The source log position a restored engine should resume consuming from.
/// Entirely opaque to the core — it is carried through `Backup`/`Load`
/// verbatim and interpreted only by the external log consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPosition {
    pub topic: String,
    pub partition: u32,
    pub offset: u64,
}

/// A byte-exact image of one market's full engine state: both price-level
/// indexes, both pending-market queues, the armed stop table, sequence
/// counters, the last trade price, and the log position to resume from.
///
/// Round-trip property: `load(backup(b)) == b` field-for-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketBackup {
    pub format_version: u16,
    pub market_id: String,
    pub price_precision: u32,
    pub volume_precision: u32,
    pub book: OrderBook,
    pub log_position: LogPosition,
}

impl MarketBackup {
    fn from_book(book: OrderBook, log_position: LogPosition) -> Self {
        MarketBackup {
            format_version: BACKUP_FORMAT_VERSION,
            market_id: book.market_id.clone(),
            price_precision: book.price_precision,
            volume_precision: book.volume_precision,
            book,
            log_position,
        }
    }

    /// Serialize to a checksummed byte payload: a `bincode`-encoded
    /// `MarketBackup` followed by a trailing CRC-32 of those bytes. The
    /// checksum lets `load` reject truncated/corrupted bytes before it ever
    /// asks `bincode` to decode them.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .expect("MarketBackup encoding is infallible for in-memory types");
        let checksum = crc32fast::hash(&body);
        let mut out = Vec::with_capacity(body.len() + 4);
        out.extend_from_slice(&body);
        out.extend_from_slice(&checksum.to_le_bytes());
        out
    }

    /// Decode a byte payload produced by [`Self::to_bytes`]. Fails with
    /// [`SnapshotError::CorruptSnapshot`] on a checksum mismatch or a
    /// structurally invalid `bincode` body — the only error-bearing call in
    /// the core.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        if bytes.len() < 4 {
            return Err(SnapshotError::CorruptSnapshot(format!(
                "payload too short to carry a checksum: {} bytes",
                bytes.len()
            )));
        }
        let (body, checksum_bytes) = bytes.split_at(bytes.len() - 4);
        let expected = u32::from_le_bytes(checksum_bytes.try_into().unwrap());
        let actual = crc32fast::hash(body);
        if actual != expected {
            warn!(expected, actual, "snapshot checksum mismatch");
            return Err(SnapshotError::CorruptSnapshot(format!(
                "checksum mismatch: expected {expected:#x}, got {actual:#x}"
            )));
        }

        let (backup, _): (MarketBackup, usize) =
            bincode::serde::decode_from_slice(body, bincode::config::standard()).map_err(|e| {
                SnapshotError::CorruptSnapshot(format!("structural decode failed: {e}"))
            })?;

        if backup.format_version != BACKUP_FORMAT_VERSION {
            return Err(SnapshotError::CorruptSnapshot(format!(
                "unsupported backup format version {} (expected {})",
                backup.format_version, BACKUP_FORMAT_VERSION
            )));
        }

        Ok(backup)
    }
}

impl super::matching::MatchingEngine {
    /// Produce a byte-exact image of the current market state plus the
    /// given log position, for the caller to persist via temp-file +
    /// atomic-rename (the file manager's job, not the core's).
    pub fn backup(&self, log_position: LogPosition) -> MarketBackup {
        MarketBackup::from_book(self.book.clone(), log_position)
    }

    /// Replace the engine's state wholesale with a previously-produced
    /// backup. The caller is responsible for resuming its log consumer at
    /// `backup.log_position` afterward.
    pub fn load(&mut self, backup: MarketBackup) {
        self.book = backup.book;
    }

    /// Build a fresh engine directly from a backup, skipping the
    /// `new` + `load` two-step.
    pub fn from_backup(backup: MarketBackup) -> Self {
        super::matching::MatchingEngine { book: backup.book }
    }

    /// Decode and load a backup produced by [`Self::backup`] +
    /// [`MarketBackup::to_bytes`] in one step — the core's `Load(bytes)`
    /// entry point, for callers that persist backups as raw bytes rather
    /// than holding a decoded [`MarketBackup`] in hand.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let backup = MarketBackup::from_bytes(bytes)?;
        self.load(backup);
        Ok(())
    }
}
