//! Share-link dispatch.
//!
//! Composes the invitation email for a birthday and hands it to the mail relay.

use crate::db::Repository;
use crate::errors::AppError;
use crate::mail::{MailRelay, OutgoingMail};
use crate::models::{Birthday, ShareReceipt, ShareRequest};

/// Build the public link for a birthday page.
pub fn birthday_link(app_url: &str, birthday_id: &str) -> String {
    format!("{}/birthday/{}", app_url.trim_end_matches('/'), birthday_id)
}

/// Compose the invitation email for a birthday.
pub fn compose_share_mail(
    birthday: &Birthday,
    app_url: &str,
    from_name: &str,
    recipients: Vec<String>,
) -> OutgoingMail {
    let link = birthday_link(app_url, &birthday.id);

    OutgoingMail {
        from_name: from_name.to_string(),
        recipients,
        subject: format!("Help Celebrate {}'s Birthday!", birthday.name),
        text_body: format!(
            "Please join us in celebrating {}. Link: {}",
            birthday.name, link
        ),
        html_body: format!(
            "<h2>Celebrate {name}'s Birthday!</h2>\n\
             <p>\n  We're collecting heartfelt messages.\n  \
             <a href=\"{link}\">Click here</a> to view the page and post your wish.\n</p>\n",
            name = html_escape::encode_text(&birthday.name),
            link = html_escape::encode_double_quoted_attribute(&link),
        ),
    }
}

/// Validate a share request, look up the birthday and send the invitation.
///
/// Nothing reaches the relay unless the request names a birthday that exists
/// and at least one recipient.
pub async fn share_birthday(
    repo: &Repository,
    relay: &dyn MailRelay,
    app_url: &str,
    from_name: &str,
    request: &ShareRequest,
) -> Result<ShareReceipt, AppError> {
    let page_id = request
        .page_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let recipients = request
        .emails
        .as_ref()
        .map(|emails| emails.addresses())
        .unwrap_or_default();

    let Some(page_id) = page_id.filter(|_| !recipients.is_empty()) else {
        return Err(AppError::Validation(
            "Missing birthdayId or emails".to_string(),
        ));
    };

    let birthday = repo
        .get_birthday(page_id)
        .await?
        .ok_or_else(AppError::birthday_not_found)?;

    let count = recipients.len();
    let mail = compose_share_mail(&birthday, app_url, from_name, recipients);
    relay.send(&mail).await?;

    tracing::info!("Shared birthday {} with {} recipients", birthday.id, count);

    Ok(ShareReceipt {
        message: "Emails sent successfully!".to_string(),
    })
}
