use super::OutgoingMail;
use chrono::{Datelike, Utc};

pub fn verify_email_mail(from: &str, to: &str, verify_url: &str) -> OutgoingMail {
    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Verify your email".to_string(),
        text: format!(
            "Hello,\n\n\
             Thanks for signing up. Confirm your email address by opening the link below:\n\n\
             {verify_url}\n\n\
             The link expires in one hour. If you did not create an account, ignore this email.\n\n\
             (c) {year} Cocktail API",
            year = Utc::now().year()
        ),
    }
}

pub fn reset_password_mail(from: &str, to: &str, reset_url: &str) -> OutgoingMail {
    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Reset your password".to_string(),
        text: format!(
            "Hello,\n\n\
             Someone asked to reset the password for this account. Choose a new password here:\n\n\
             {reset_url}\n\n\
             The link expires in 15 minutes. If you did not ask for this, ignore this email.\n\n\
             (c) {year} Cocktail API",
            year = Utc::now().year()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mails_contain_link() {
        let mail = verify_email_mail("bar@example.com", "a@b.c", "http://x/auth/verify-email?token=t");
        assert_eq!(mail.subject, "Verify your email");
        assert!(mail.text.contains("http://x/auth/verify-email?token=t"));

        let mail = reset_password_mail("bar@example.com", "a@b.c", "http://x/reset-password/t");
        assert_eq!(mail.to, "a@b.c");
        assert!(mail.text.contains("http://x/reset-password/t"));
    }
}
