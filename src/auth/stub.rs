use chrono::Utc;
use std::time::Duration;

use crate::auth::{Authenticator, Credentials, Session};
use crate::error::AuthError;

/// Accepts any well-formed credentials after a fixed delay.
///
/// Makes no network call; the password is never stored or checked.
#[derive(Debug, Clone)]
pub struct StubAuthenticator {
    delay: Duration,
}

impl StubAuthenticator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    fn open_session(&self, credentials: &Credentials) -> Session {
        std::thread::sleep(self.delay);
        Session {
            phone: credentials.phone.clone(),
            signed_in_at: Utc::now(),
        }
    }
}

impl Authenticator for StubAuthenticator {
    fn sign_in(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        log::info!("signing in {}", credentials.phone);
        Ok(self.open_session(credentials))
    }

    fn register(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        log::info!("registering {}", credentials.phone);
        Ok(self.open_session(credentials))
    }
}
