//! Outbound mail collaborator
//!
//! Email delivery is an external concern; this implementation records the
//! would-be message in the log. Callers treat a send failure as non-fatal:
//! registration succeeds whether or not the verification mail went out.

use crate::error::ApiResult;

#[derive(Clone, Default)]
pub struct Mailer;

impl Mailer {
    pub fn new() -> Self {
        Self
    }

    pub fn send_verification(&self, email: &str, token: &str) -> ApiResult<()> {
        tracing::info!(
            email = %email,
            token = %token,
            "verification mail queued"
        );
        Ok(())
    }
}
