//! Outgoing mail for the Agora forum service.
//!
//! [`mailer::Mailer`] decides between sending inline and enqueueing, and
//! drains the queue in batches. The actual send goes through a
//! [`transport::MailTransport`]: SMTP when configured, a logging
//! transport otherwise. [`notify`] fans topic events out to subscribers.

pub mod error;
pub mod mailer;
pub mod notify;
pub mod smtp;
pub mod transport;

pub use error::MailError;
pub use mailer::{DeliveryReport, DrainReport, Mailer};
pub use transport::{LogTransport, MailTransport, OutgoingMail};
