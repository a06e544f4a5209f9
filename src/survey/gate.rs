use crate::survey::*;

/// Keeps the dashboard closed until the shared password is given.
///
/// The password is compared in clear and the unlocked state only lives as
/// long as the process. An empty or missing password leaves the gate open.
#[derive(Debug, Clone)]
pub struct AccessGate {
    secret: Option<String>,
    authenticated: bool,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> AccessGate {
        AccessGate {
            secret: secret.filter(|s| !s.is_empty()),
            authenticated: false,
        }
    }

    /// Returns true if the gate is open after this attempt.
    pub fn unlock(&mut self, attempt: &str) -> bool {
        if self.secret.as_deref() == Some(attempt) {
            self.authenticated = true;
        } else {
            warn!("unlock: wrong dashboard password");
        }
        self.is_authenticated()
    }

    pub fn is_authenticated(&self) -> bool {
        self.secret.is_none() || self.authenticated
    }

    pub fn require(&self) -> SurveyResult<()> {
        ensure!(self.is_authenticated(), AccessDeniedSnafu {});
        Ok(())
    }
}
