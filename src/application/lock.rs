use std::sync::{Mutex, MutexGuard};

use tracing::warn;

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    target: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                target_module = target,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                hint = "pending search timer may be stale after panic in another task",
                "Recovered from poisoned lock"
            );
            poisoned.into_inner()
        }
    }
}
