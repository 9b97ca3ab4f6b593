//! One-time passcodes: generation, storage, and verification.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::Rng;

use crate::error::MailError;
use crate::mail::MailTransport;

/// Subject line for the code delivery email.
const OTP_SUBJECT: &str = "Your OTP Code";

/// Process-wide store of the most recently sent code per email address.
///
/// Last write wins; codes are compared on verification, never consumed, and
/// never expire. The map is shared by every authenticator clone, so a code
/// sent through one session is verifiable from another holding the same
/// store.
#[derive(Debug, Default)]
pub struct OtpStore {
    codes: Mutex<HashMap<String, String>>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `code` for `email`, replacing any previous code.
    pub fn put(&self, email: &str, code: &str) {
        let mut codes = self.codes.lock().unwrap();
        codes.insert(email.to_string(), code.to_string());
    }

    /// The current code for `email`, if one was ever sent.
    pub fn get(&self, email: &str) -> Option<String> {
        let codes = self.codes.lock().unwrap();
        codes.get(email).cloned()
    }
}

/// Generate a uniformly random 6-digit code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Sends and verifies one-time passcodes for email addresses.
///
/// Clones share the same store and transport.
#[derive(Clone)]
pub struct OtpAuthenticator {
    store: Arc<OtpStore>,
    transport: Arc<dyn MailTransport>,
}

impl OtpAuthenticator {
    pub fn new(store: Arc<OtpStore>, transport: Arc<dyn MailTransport>) -> Self {
        Self { store, transport }
    }

    /// Generate a fresh code for `email`, store it, and deliver it.
    ///
    /// The code is stored before the delivery attempt, so a failed send still
    /// leaves the code on record for that address.
    pub async fn send_code(&self, email: &str) -> Result<(), MailError> {
        let code = generate_code();
        self.store.put(email, &code);

        let body = format!("Your OTP for verification is: {code}");
        self.transport.send(email, OTP_SUBJECT, &body).await?;
        tracing::info!(to = %email, "OTP delivered");
        Ok(())
    }

    /// True iff the stored code for `email` exactly equals `candidate`.
    ///
    /// No code on record means false. The code is not invalidated on a
    /// successful check.
    pub fn verify(&self, email: &str, candidate: &str) -> bool {
        self.store.get(email).is_some_and(|code| code == candidate)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Records every delivery; optionally fails after recording.
    struct RecordingTransport {
        sent: Mutex<Vec<(String, String, String)>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }

        fn last_body(&self) -> Option<String> {
            self.sent.lock().unwrap().last().map(|(_, _, b)| b.clone())
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            if self.fail {
                Err(MailError::Send("mock transport down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn code_from_body(body: &str) -> String {
        body.rsplit(' ').next().unwrap().to_string()
    }

    fn auth_with(fail: bool) -> (OtpAuthenticator, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new(fail));
        let auth = OtpAuthenticator::new(Arc::new(OtpStore::new()), transport.clone());
        (auth, transport)
    }

    #[test]
    fn generated_code_is_six_digits_in_range() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[tokio::test]
    async fn round_trip() {
        let (auth, transport) = auth_with(false);
        auth.send_code("a@b.com").await.unwrap();

        let code = code_from_body(&transport.last_body().unwrap());
        assert!(auth.verify("a@b.com", &code));
        assert!(!auth.verify("a@b.com", "000000"));
        assert!(!auth.verify("unknown@b.com", &code));
    }

    #[tokio::test]
    async fn second_send_overwrites_first() {
        let (auth, transport) = auth_with(false);

        auth.send_code("a@b.com").await.unwrap();
        let first = code_from_body(&transport.last_body().unwrap());

        auth.send_code("a@b.com").await.unwrap();
        let second = code_from_body(&transport.last_body().unwrap());

        assert!(auth.verify("a@b.com", &second));
        if first != second {
            assert!(!auth.verify("a@b.com", &first));
        }
    }

    #[tokio::test]
    async fn code_is_stored_even_when_delivery_fails() {
        let (auth, transport) = auth_with(true);

        let result = auth.send_code("a@b.com").await;
        assert!(result.is_err());

        // The transport saw the body before failing; its code is on record.
        let code = code_from_body(&transport.last_body().unwrap());
        assert!(auth.verify("a@b.com", &code));
    }

    #[tokio::test]
    async fn verify_allows_replay() {
        let (auth, transport) = auth_with(false);
        auth.send_code("a@b.com").await.unwrap();
        let code = code_from_body(&transport.last_body().unwrap());

        assert!(auth.verify("a@b.com", &code));
        assert!(auth.verify("a@b.com", &code));
    }

    #[tokio::test]
    async fn subject_and_body_format() {
        let (auth, transport) = auth_with(false);
        auth.send_code("a@b.com").await.unwrap();

        let sent = transport.sent.lock().unwrap();
        let (to, subject, body) = sent.last().unwrap();
        assert_eq!(to, "a@b.com");
        assert_eq!(subject, "Your OTP Code");
        assert!(body.starts_with("Your OTP for verification is: "));
    }

    #[tokio::test]
    async fn clones_share_the_store() {
        let (auth, transport) = auth_with(false);
        let other = auth.clone();

        auth.send_code("a@b.com").await.unwrap();
        let code = code_from_body(&transport.last_body().unwrap());
        assert!(other.verify("a@b.com", &code));
    }
}
