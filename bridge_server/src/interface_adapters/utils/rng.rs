// Process-wide identifiers for connections and clients.

use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Returns an identifier unique for the lifetime of the process.
///
/// The counter is seeded from the wall clock once, so ids also differ across restarts.
pub fn rand_id() -> u64 {
    static NEXT: OnceLock<AtomicU64> = OnceLock::new();
    NEXT.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        AtomicU64::new(seed)
    })
    .fetch_add(1, Ordering::Relaxed)
}
