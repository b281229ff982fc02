//! Per-user admission control.

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use subfuse_models::UserId;

/// Gate limiting how many jobs each user may have in flight.
///
/// Independent of the worker pool: a slot is accounting, not execution.
/// Every successful `try_acquire` must be paired with exactly one `release`;
/// release is floored at zero so a double release cannot go negative.
#[derive(Debug)]
pub struct AdmissionController {
    slots: Mutex<HashMap<UserId, u8>>,
    per_user_cap: u8,
}

impl AdmissionController {
    pub fn new(per_user_cap: u8) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            per_user_cap,
        }
    }

    /// Try to take a slot for the user. Returns false with no side effects
    /// when the user is already at the cap.
    pub fn try_acquire(&self, user: UserId) -> bool {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let count = slots.entry(user).or_insert(0);
        if *count >= self.per_user_cap {
            debug!(user, count = *count, "admission rejected, user at cap");
            return false;
        }
        *count += 1;
        true
    }

    /// Return a slot. Idempotent against double release.
    pub fn release(&self, user: UserId) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(count) = slots.get_mut(&user) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                slots.remove(&user);
            }
        }
    }

    /// Number of slots the user currently holds.
    pub fn active_jobs(&self, user: UserId) -> u8 {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots.get(&user).copied().unwrap_or(0)
    }
}
