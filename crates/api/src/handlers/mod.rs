//! Request handlers, one module per resource.

pub mod actor;
pub mod admin;
pub mod movie;
pub mod review;
pub mod user;

use reelview_notify::OutboundEmail;
use serde::Serialize;

use crate::state::AppState;

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Hand an email to the mailer. Delivery failures are logged, never
/// surfaced to the client.
pub(crate) async fn send_email(state: &AppState, email: OutboundEmail) {
    let to = email.to.clone();
    let subject = email.subject.clone();
    match state.mailer.send(email).await {
        Ok(()) => tracing::debug!(%to, %subject, "Email sent"),
        Err(e) => tracing::warn!(error = %e, %to, %subject, "Email delivery failed"),
    }
}
