//! Periodic removal of stale cooldown records, sessions and email tokens.

use crate::db::DbPool;
use crate::schema::{email_actions, email_tokens, sessions};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use std::sync::Arc;

/// How often the cleanup runs.
pub const CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(7 * 24 * 60 * 60);

/// Cooldown records older than this many hours are dropped.
const EMAIL_ACTION_MAX_AGE_HOURS: i64 = 1;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub email_actions: usize,
    pub sessions: usize,
    pub email_tokens: usize,
}

pub fn email_action_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(EMAIL_ACTION_MAX_AGE_HOURS)
}

pub fn run_cleanup(conn: &mut PgConnection, now: DateTime<Utc>) -> QueryResult<CleanupReport> {
    let email_actions = diesel::delete(
        email_actions::table.filter(email_actions::last_sent_at.lt(email_action_cutoff(now))),
    )
    .execute(conn)?;

    let sessions =
        diesel::delete(sessions::table.filter(sessions::expires_at.lt(now))).execute(conn)?;

    let email_tokens = diesel::delete(
        email_tokens::table.filter(
            email_tokens::expires_at
                .lt(now)
                .or(email_tokens::used_at.is_not_null()),
        ),
    )
    .execute(conn)?;

    Ok(CleanupReport {
        email_actions,
        sessions,
        email_tokens,
    })
}

/// Spawn the background cleanup loop. The first run happens one interval
/// after startup.
pub fn spawn_cleanup_task(pool: Arc<DbPool>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let pool = pool.clone();
            let result = tokio::task::spawn_blocking(move || {
                let mut conn = pool.get().map_err(|e| e.to_string())?;
                run_cleanup(&mut conn, Utc::now()).map_err(|e| e.to_string())
            })
            .await;

            match result {
                Ok(Ok(report)) => tracing::info!(
                    email_actions = report.email_actions,
                    sessions = report.sessions,
                    email_tokens = report.email_tokens,
                    "Cleanup finished"
                ),
                Ok(Err(e)) => tracing::error!(error = %e, "Cleanup failed"),
                Err(e) => tracing::error!(error = %e, "Cleanup task panicked"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cutoff_is_one_hour_back() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            email_action_cutoff(now),
            Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_interval_is_weekly() {
        assert_eq!(CLEANUP_INTERVAL.as_secs(), 604_800);
    }
}
