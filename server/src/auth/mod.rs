mod crypto;
mod db;
mod extractor;
mod roles;

pub use crypto::{hash_password, verify_password};
pub use db::{
    consume_email_token, create_session, delete_session, issue_email_token, revoke_sessions,
    TokenPurpose,
};
pub use extractor::{AuthUser, CurrentSession};
pub use roles::Role;
