//! Identity capability
//!
//! The intake and directory flows never look at identity. Callers that
//! show a profile pass a [`Session`] around explicitly, obtained from an
//! [`IdentityProvider`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServiceError};

/// Label shown when a user has neither a display name nor an email
pub const GUEST_LABEL: &str = "Guest";

/// Projection of the signed-in account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl CurrentUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            created_at: None,
            last_login_at: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Display name, else the local part of the email, else "Guest"
    pub fn display_label(&self) -> &str {
        let from_name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let from_email = || {
            self.email
                .as_deref()
                .and_then(|e| e.split('@').next())
                .map(str::trim)
                .filter(|local| !local.is_empty())
        };

        from_name.or_else(from_email).unwrap_or(GUEST_LABEL)
    }
}

/// Identity state handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: Option<CurrentUser>,
    pub auth_error: Option<String>,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Label for the current user, "Guest" when signed out
    pub fn display_label(&self) -> &str {
        self.user.as_ref().map_or(GUEST_LABEL, CurrentUser::display_label)
    }
}

/// Sign-in backend
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Current identity state
    async fn current_session(&self) -> Session;

    /// Sign in; the failure message is also recorded on the session
    async fn sign_in(&self) -> Result<CurrentUser>;

    /// Sign out; a no-op when nobody is signed in
    async fn sign_out(&self) -> Result<()>;
}

/// In-process identity provider backed by a single preconfigured account
#[derive(Debug, Default)]
pub struct LocalIdentityProvider {
    account: Option<CurrentUser>,
    session: Mutex<Session>,
}

impl LocalIdentityProvider {
    /// Provider that signs in as `account`
    pub fn with_account(account: CurrentUser) -> Self {
        Self {
            account: Some(account),
            session: Mutex::new(Session::default()),
        }
    }

    /// Provider with no account; sign-in always fails
    pub fn unconfigured() -> Self {
        Self::default()
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_session(&self) -> Session {
        self.lock_session().clone()
    }

    async fn sign_in(&self) -> Result<CurrentUser> {
        let mut session = self.lock_session();

        let Some(account) = self.account.as_ref() else {
            let message = "Sign-in is temporarily unavailable (identity provider not configured).";
            warn!("{}", message);
            session.auth_error = Some(message.to_string());
            return Err(ServiceError::configuration(message));
        };

        let now = Utc::now();
        let mut user = account.clone();
        user.created_at.get_or_insert(now);
        user.last_login_at = Some(now);

        info!("Signed in as {}", user.display_label());
        session.user = Some(user.clone());
        session.auth_error = None;
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        let mut session = self.lock_session();
        if session.user.take().is_some() {
            info!("Signed out");
        }
        Ok(())
    }
}
