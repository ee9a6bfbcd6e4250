//! Clients for external collaborators.

mod mailer;

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
pub use mailer::{LogMailer, Mailer};
