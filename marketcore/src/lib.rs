//! Single-market, price-time-priority matching engine core.
//!
//! One [`engine::matching::MatchingEngine`] owns one market exclusively: the
//! price-level index, the pending-market-order queues, the armed stop-order
//! table, and the sequence counters that stamp every emitted event. There is
//! no locking anywhere in this crate — callers are expected to give each
//! market engine its own thread or task and route commands to it in order.

use mimalloc::MiMalloc;

/// Global allocator. An allocation-churning matching loop (every fill pops
/// or pushes orders in and out of a level's deque) benefits from mimalloc's
/// lower per-call overhead versus the system allocator.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub mod engine;

pub use engine::prelude;
