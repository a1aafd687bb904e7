//! Database metrics collection.
//!
//! Query timings feed the `database_query_duration_seconds` histogram; the
//! account-deletion cascade reports its per-phase row counts as counters.

use metrics::{counter, histogram};
use std::time::Instant;

/// Records one query's duration under its repository-level name.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record a completed account-deletion cascade and its per-phase row counts.
pub fn record_account_deletion(
    gatherings_deleted: u64,
    items_deleted: u64,
    items_unclaimed: u64,
    memberships_removed: u64,
) {
    counter!("accounts_deleted_total").increment(1);
    counter!("account_deletion_gatherings_total").increment(gatherings_deleted);
    counter!("account_deletion_items_total").increment(items_deleted);
    counter!("account_deletion_unclaims_total").increment(items_unclaimed);
    counter!("account_deletion_memberships_total").increment(memberships_removed);
}

/// Times one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_gathering_by_id");
/// let result = sqlx::query_as::<_, GatheringEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    /// Starts the clock for the named query.
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    /// Consumes the timer and records the elapsed duration.
    pub fn record(self) {
        record_query_duration(&self.query_name, self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_timer_keeps_name() {
        let timer = QueryTimer::new("list_items_by_gathering");
        assert_eq!(timer.query_name, "list_items_by_gathering");
    }

    #[test]
    fn test_query_timer_record_without_recorder() {
        // metrics macros are no-ops until a recorder is installed
        QueryTimer::new("noop_query").record();
    }
}
