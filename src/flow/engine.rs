//! GuideEngine — drives the conversation one step per user message.
//!
//! Every user message dispatches exactly one stage handler and appends
//! exactly one bot reply. All failure modes degrade into a bot chat line;
//! nothing is thrown past this boundary.

use std::sync::Arc;

use tokio::time::timeout;

use crate::config::Timeouts;
use crate::error::LlmError;
use crate::extract::LocationExtractor;
use crate::flow::{Stage, replies};
use crate::info::InfoProvider;
use crate::otp::OtpAuthenticator;
use crate::session::Session;

/// The conversation state machine.
pub struct GuideEngine {
    extractor: Arc<dyn LocationExtractor>,
    auth: OtpAuthenticator,
    info: Arc<dyn InfoProvider>,
    timeouts: Timeouts,
}

impl GuideEngine {
    pub fn new(
        extractor: Arc<dyn LocationExtractor>,
        auth: OtpAuthenticator,
        info: Arc<dyn InfoProvider>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            extractor,
            auth,
            info,
            timeouts,
        }
    }

    /// Open the conversation on a freshly created session: append the static
    /// greeting and advance past `Greet`. Consumes no user message, so a
    /// session carries one more bot line than it has user turns.
    pub fn greet(&self, session: &mut Session) {
        if session.stage != Stage::Greet {
            return;
        }
        session.push_bot(replies::GREETING);
        self.advance(session);
    }

    /// Feed one user message through the machine. Appends the user line,
    /// dispatches the current stage's handler, and appends its single reply.
    pub async fn handle_message(&self, session: &mut Session, input: &str) {
        session.push_user(input);
        tracing::debug!(stage = %session.stage, "Handling message");

        let reply = match session.stage {
            // Host skipped greet(); the greeting is this turn's reply.
            Stage::Greet => {
                self.advance(session);
                replies::GREETING.to_string()
            }
            Stage::AwaitLocation => self.on_location(session, input).await,
            Stage::AwaitEmail => self.on_email(session, input).await,
            Stage::AwaitOtp => self.on_otp(session, input).await,
            Stage::ProvideInfo => self.on_provide_info(session).await,
            Stage::Complete => replies::SESSION_COMPLETE.to_string(),
        };

        session.push_bot(reply);
    }

    /// Run the extractor over the message. A hit stores the location and
    /// moves on; a miss (or a timed-out extraction) re-prompts in place.
    async fn on_location(&self, session: &mut Session, input: &str) -> String {
        let extracted = timeout(self.timeouts.extract, self.extractor.extract(input)).await;

        match extracted {
            Ok(Some(location)) => {
                tracing::info!(location = %location, "Location extracted");
                session.location = Some(location.clone());
                self.advance(session);
                replies::location_confirmed(&location)
            }
            Ok(None) => replies::LOCATION_RETRY.to_string(),
            Err(_) => {
                tracing::warn!("Location extraction timed out");
                replies::LOCATION_RETRY.to_string()
            }
        }
    }

    /// Store anything containing `@` as the email and send a code. The
    /// session moves to AwaitOtp whether or not delivery succeeded; the code
    /// is already on record.
    async fn on_email(&self, session: &mut Session, input: &str) -> String {
        let candidate = input.trim();
        if !candidate.contains('@') {
            return replies::EMAIL_RETRY.to_string();
        }

        session.email = Some(candidate.to_string());
        let sent = timeout(self.timeouts.send, self.auth.send_code(candidate)).await;
        self.advance(session);

        match sent {
            Ok(Ok(())) => replies::OTP_SENT.to_string(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "OTP delivery failed");
                replies::OTP_SEND_FAILED.to_string()
            }
            Err(_) => {
                tracing::warn!("OTP delivery timed out");
                replies::OTP_SEND_FAILED.to_string()
            }
        }
    }

    /// Check the message against the stored code. A match verifies the
    /// session and delivers the monument info in the same reply; a mismatch
    /// re-prompts in place.
    async fn on_otp(&self, session: &mut Session, input: &str) -> String {
        let Some(email) = session.email.clone() else {
            tracing::warn!("AwaitOtp reached without a stored email");
            return replies::EMAIL_RETRY.to_string();
        };

        if !self.auth.verify(&email, input.trim()) {
            return replies::OTP_INVALID.to_string();
        }

        tracing::info!(email = %email, "OTP verified");
        session.otp_verified = true;
        self.advance(session);

        match self.fetch_info(session).await {
            Ok(text) => format!("{}\n\n{}", replies::OTP_VERIFIED, text),
            Err(_) => format!("{}\n\n{}", replies::OTP_VERIFIED, replies::INFO_UNAVAILABLE),
        }
    }

    /// Retry the info fetch after an earlier failure.
    async fn on_provide_info(&self, session: &mut Session) -> String {
        match self.fetch_info(session).await {
            Ok(text) => text,
            Err(_) => replies::INFO_UNAVAILABLE.to_string(),
        }
    }

    /// Fetch monument info for the stored location; advances to Complete on
    /// success. Failures are logged here and turned into chat lines by the
    /// callers.
    async fn fetch_info(&self, session: &mut Session) -> Result<String, LlmError> {
        let Some(location) = session.location.clone() else {
            tracing::warn!("ProvideInfo reached without a stored location");
            return Err(LlmError::InvalidResponse {
                provider: "guide".to_string(),
                reason: "no location on session".to_string(),
            });
        };

        let result = match timeout(self.timeouts.generate, self.info.describe(&location)).await {
            Ok(inner) => inner,
            Err(_) => Err(LlmError::Timeout {
                timeout: self.timeouts.generate,
            }),
        };

        match result {
            Ok(text) => {
                self.advance(session);
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(error = %e, location = %location, "Info fetch failed");
                Err(e)
            }
        }
    }

    fn advance(&self, session: &mut Session) {
        match session.advance() {
            Ok(stage) => tracing::debug!(stage = %stage, "Advanced"),
            Err(e) => tracing::warn!(error = %e, "Stage advance refused"),
        }
    }
}
