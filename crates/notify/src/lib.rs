//! Outbound account email.
//!
//! Handlers build an [`OutboundEmail`] with one of the [`templates`] and
//! hand it to a [`Mailer`]. [`SmtpMailer`] delivers over SMTP when
//! `SMTP_HOST` is configured; [`LogMailer`] stands in otherwise.

pub mod mailer;
pub mod smtp;
pub mod templates;

pub use mailer::{EmailError, LogMailer, Mailer, OutboundEmail};
pub use smtp::{SmtpConfig, SmtpMailer};
