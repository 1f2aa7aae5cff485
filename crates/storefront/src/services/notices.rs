//! Notices queued in the session for the next page render.

use tower_sessions::Session;

use sell_restrict_core::Notice;

use crate::models::session_keys;

/// Append notices to the session queue.
///
/// # Errors
///
/// Returns an error if the session store cannot be read or written.
pub async fn queue(
    session: &Session,
    notices: impl IntoIterator<Item = Notice>,
) -> Result<(), tower_sessions::session::Error> {
    let mut queued = session
        .get::<Vec<Notice>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    let before = queued.len();
    queued.extend(notices);

    if queued.len() != before {
        session.insert(session_keys::NOTICES, queued).await?;
    }
    Ok(())
}

/// Remove and return every queued notice.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn take(session: &Session) -> Result<Vec<Notice>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<Notice>>(session_keys::NOTICES)
        .await?
        .unwrap_or_default())
}
