use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

fn now_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Returns a process-unique, monotonically increasing identifier.
///
/// Seeded from the wall clock so ids from separate runs rarely overlap, while the counter
/// avoids the collisions "timestamp only" ids have when two are generated in the same instant.
pub fn rand_id() -> u64 {
    static COUNTER: OnceLock<AtomicU64> = OnceLock::new();
    let counter = COUNTER.get_or_init(|| AtomicU64::new(now_nanos()));
    counter.fetch_add(1, Ordering::Relaxed)
}

/// Fresh identity for a newly connected player. Never reused within the process.
pub fn player_id() -> String {
    format!("player_{}", rand_id())
}

/// Fresh identity for a newly fired projectile. Never reused within the process.
pub fn projectile_id() -> String {
    format!("projectile_{}", rand_id())
}
