//! Signed-in state of the presentation client.
//!
//! A [`Session`] exists only between a successful sign-in/sign-up and
//! [`SessionStore::logout`]. It is never written anywhere, and it only ever
//! holds records returned by the service.

use super::api_client::{ApiClient, ClientError};
use crate::models::{derive_referral_code, User};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: User,
}

impl Session {
    pub fn user(&self) -> &User {
        &self.user
    }
}

#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Look up the referral code derived from `name`.
    pub async fn sign_in(&mut self, api: &ApiClient, name: &str) -> Result<&Session, ClientError> {
        let name = required(name, "Name")?;
        let user = api.user_by_code(&derive_referral_code(name)).await?;
        Ok(self.start(user))
    }

    pub async fn sign_up(&mut self, api: &ApiClient, name: &str, email: &str) -> Result<&Session, ClientError> {
        let name = required(name, "Name")?;
        let email = required(email, "Email")?;
        let user = api.create_user(name, email).await?;
        Ok(self.start(user))
    }

    /// Add a donation for the signed-in user. The session only changes when
    /// the service confirms the new total.
    pub async fn donate(&mut self, api: &ApiClient, amount: i64) -> Result<&Session, ClientError> {
        if amount <= 0 {
            return Err(ClientError::InvalidInput("Donation amount must be positive".to_string()));
        }
        let code = match &self.current {
            Some(session) => session.user.referral_code.clone(),
            None => return Err(ClientError::InvalidInput("Not signed in".to_string())),
        };

        let user = api.donate(&code, amount).await?;
        Ok(self.start(user))
    }

    pub fn logout(&mut self) -> Option<Session> {
        self.current.take()
    }

    fn start(&mut self, user: User) -> &Session {
        self.current.insert(Session { user })
    }
}

fn required<'a>(value: &'a str, label: &str) -> Result<&'a str, ClientError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidInput(format!("{} is required", label)));
    }
    Ok(trimmed)
}
