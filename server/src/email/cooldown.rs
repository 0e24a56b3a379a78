use crate::models::NewEmailAction;
use crate::schema::email_actions;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Rate-limited email kinds, one cooldown window per user and kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailAction {
    VerifyEmail,
    ResetPassword,
}

impl EmailAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailAction::VerifyEmail => "verify-email",
            EmailAction::ResetPassword => "reset-password",
        }
    }

    pub fn cooldown_minutes(&self) -> i64 {
        match self {
            EmailAction::VerifyEmail => 1,
            EmailAction::ResetPassword => 2,
        }
    }
}

/// `Err` carries the client-facing message when `now` is still inside the
/// cooldown window that started at `last_sent`.
pub fn check_cooldown(
    last_sent: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    action: EmailAction,
) -> Result<(), String> {
    let Some(last_sent) = last_sent else {
        return Ok(());
    };

    if now - last_sent < Duration::minutes(action.cooldown_minutes()) {
        return Err(format!(
            "You can only request {} every {} minutes",
            action.as_str(),
            action.cooldown_minutes()
        ));
    }

    Ok(())
}

pub fn last_sent_at(
    conn: &mut PgConnection,
    user_id: Uuid,
    action: EmailAction,
) -> QueryResult<Option<DateTime<Utc>>> {
    email_actions::table
        .find((user_id, action.as_str()))
        .select(email_actions::last_sent_at)
        .first(conn)
        .optional()
}

pub fn record_sent(
    conn: &mut PgConnection,
    user_id: Uuid,
    action: EmailAction,
    at: DateTime<Utc>,
) -> QueryResult<()> {
    diesel::insert_into(email_actions::table)
        .values(&NewEmailAction {
            user_id,
            action: action.as_str(),
            last_sent_at: at,
        })
        .on_conflict((email_actions::user_id, email_actions::action))
        .do_update()
        .set(email_actions::last_sent_at.eq(at))
        .execute(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, minute, second).unwrap()
    }

    #[test]
    fn test_first_email_is_allowed() {
        assert!(check_cooldown(None, at(0, 0), EmailAction::VerifyEmail).is_ok());
    }

    #[test]
    fn test_verify_email_cooldown_is_one_minute() {
        let last = Some(at(0, 0));
        let err = check_cooldown(last, at(0, 59), EmailAction::VerifyEmail).unwrap_err();
        assert_eq!(err, "You can only request verify-email every 1 minutes");
        assert!(check_cooldown(last, at(1, 0), EmailAction::VerifyEmail).is_ok());
    }

    #[test]
    fn test_reset_password_cooldown_is_two_minutes() {
        let last = Some(at(0, 0));
        let err = check_cooldown(last, at(1, 30), EmailAction::ResetPassword).unwrap_err();
        assert_eq!(err, "You can only request reset-password every 2 minutes");
        assert!(check_cooldown(last, at(2, 0), EmailAction::ResetPassword).is_ok());
    }
}
