//! Freshness gate for nudges sent with `--if-fresh`.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Maximum session age, inclusive, for a session to still count as fresh.
pub const FRESH_MAX_AGE: Duration = Duration::from_secs(60);

/// True when `now - created_at` is at most [`FRESH_MAX_AGE`].
///
/// A creation time after `now` (clock skew between hosts) counts as fresh.
pub fn is_fresh(created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match now.signed_duration_since(created_at).to_std() {
        Ok(age) => age <= FRESH_MAX_AGE,
        Err(_) => true,
    }
}
