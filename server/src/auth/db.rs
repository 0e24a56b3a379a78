use crate::models::{NewEmailToken, NewSession, User};
use crate::schema::{email_tokens, sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::crypto::{generate_token, hash_token};

/// Purpose of a single-use emailed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPurpose {
    VerifyEmail,
    ResetPassword,
}

impl TokenPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenPurpose::VerifyEmail => "verify-email",
            TokenPurpose::ResetPassword => "reset-password",
        }
    }

    pub fn lifetime(&self) -> Duration {
        match self {
            TokenPurpose::VerifyEmail => Duration::hours(1),
            TokenPurpose::ResetPassword => Duration::minutes(15),
        }
    }
}

/// Create a session and return the plaintext bearer token.
pub fn create_session(
    conn: &mut PgConnection,
    user_id: Uuid,
    ttl_minutes: i64,
) -> Result<String, diesel::result::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::minutes(ttl_minutes);

    let new_session = NewSession {
        user_id,
        token_hash: &token_hash,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&new_session)
        .execute(conn)?;

    Ok(token)
}

/// Resolve a bearer token to its session id and an enabled user.
pub fn get_session_user(
    conn: &mut PgConnection,
    token: &str,
) -> Result<Option<(Uuid, User)>, diesel::result::Error> {
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .filter(users::is_enabled.eq(true))
        .select((sessions::id, User::as_select()))
        .first(conn)
        .optional()
}

pub fn delete_session(conn: &mut PgConnection, session_id: Uuid) -> QueryResult<usize> {
    diesel::delete(sessions::table.find(session_id)).execute(conn)
}

/// Drop every session of a user, e.g. after a password reset or when disabled.
pub fn revoke_sessions(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<usize> {
    diesel::delete(sessions::table.filter(sessions::user_id.eq(user_id))).execute(conn)
}

/// Store a new single-use token for `purpose` and return its plaintext value.
pub fn issue_email_token(
    conn: &mut PgConnection,
    user_id: Uuid,
    purpose: TokenPurpose,
) -> QueryResult<String> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    diesel::insert_into(email_tokens::table)
        .values(&NewEmailToken {
            user_id,
            purpose: purpose.as_str(),
            token_hash: &token_hash,
            expires_at: Utc::now() + purpose.lifetime(),
        })
        .execute(conn)?;

    Ok(token)
}

/// Mark a token used and return its owner. `None` when the token is unknown,
/// expired, already used, or issued for another purpose.
pub fn consume_email_token(
    conn: &mut PgConnection,
    token: &str,
    purpose: TokenPurpose,
) -> QueryResult<Option<Uuid>> {
    let token_hash = hash_token(token);
    let now = Utc::now();

    // The used_at filter makes the UPDATE itself the single-use check
    diesel::update(
        email_tokens::table
            .filter(email_tokens::token_hash.eq(&token_hash))
            .filter(email_tokens::purpose.eq(purpose.as_str()))
            .filter(email_tokens::used_at.is_null())
            .filter(email_tokens::expires_at.gt(now)),
    )
    .set(email_tokens::used_at.eq(now))
    .returning(email_tokens::user_id)
    .get_result(conn)
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_purposes() {
        assert_eq!(TokenPurpose::VerifyEmail.as_str(), "verify-email");
        assert_eq!(TokenPurpose::ResetPassword.as_str(), "reset-password");
        assert_eq!(TokenPurpose::VerifyEmail.lifetime(), Duration::hours(1));
        assert_eq!(TokenPurpose::ResetPassword.lifetime(), Duration::minutes(15));
    }
}
