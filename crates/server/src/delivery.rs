//! Best-effort email copies of portal notifications.
//!
//! Called after the triggering change has committed. Errors are logged and
//! reported back as an [`EmailDelivery`] but never fail the request.

use shared_types::{EmailDelivery, FeatureFlags, User};
use sqlx::{Pool, Postgres};

use crate::mailgun::EmailMessage;

/// Look up `user_id` and email them `message`.
pub async fn email_user(
    pool: &Pool<Postgres>,
    features: &FeatureFlags,
    user_id: i64,
    message: &EmailMessage,
) -> EmailDelivery {
    if !features.mailgun {
        tracing::debug!(user_id, subject = %message.subject, "Email skipped, mailgun disabled");
        return EmailDelivery::skipped("email delivery is disabled");
    }

    match crate::repo::user::find_by_id(pool, user_id).await {
        Ok(Some(user)) => email(features, &user, message).await,
        Ok(None) => {
            tracing::warn!(user_id, "Email skipped, recipient account not found");
            EmailDelivery::skipped("recipient account not found")
        }
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Email failed, could not load recipient");
            EmailDelivery::failed(e.message)
        }
    }
}

/// Email an already-loaded user.
pub async fn email(features: &FeatureFlags, recipient: &User, message: &EmailMessage) -> EmailDelivery {
    if !features.mailgun {
        return EmailDelivery::skipped("email delivery is disabled");
    }
    if recipient.email.trim().is_empty() {
        return EmailDelivery::skipped("recipient has no email address");
    }

    match crate::mailgun::send_email(&recipient.email, &message.subject, &message.html).await {
        Ok(()) => EmailDelivery::Sent,
        Err(e) => {
            tracing::warn!(error = %e, to = %recipient.email, subject = %message.subject, "Email delivery failed");
            EmailDelivery::failed(e)
        }
    }
}
