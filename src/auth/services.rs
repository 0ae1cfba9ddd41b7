use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        claims::{Claims, IssuedToken},
        dto::PublicUser,
        jwt::TokenSigner,
        password::CredentialHasher,
        repo::UserStore,
    },
    error::AuthError,
    state::AppState,
};

pub const SIGNUP_MESSAGE: &str = "User registered successfully";
pub const SIGNIN_MESSAGE: &str = "Login successful";
pub const SIGNOUT_MESSAGE: &str = "Signout successful (handled on client side)";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Trims and lower-cases, then checks the shape of the address.
fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AuthError::Validation("Email is required".into()));
    }
    if !is_valid_email(&email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    Ok(email)
}

fn require_password(password: &str) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("Password is required".into()));
    }
    Ok(())
}

/// Signup, signin and signout over an injected store and signer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    signer: Arc<dyn TokenSigner>,
    hasher: CredentialHasher,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.signer.clone(), state.hasher)
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        signer: Arc<dyn TokenSigner>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            users,
            signer,
            hasher,
        }
    }

    /// Creates the account. A taken email surfaces as `Conflict` from the
    /// store's uniqueness constraint; nothing is overwritten.
    pub async fn signup(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let email = normalize_email(email)?;
        require_password(password)?;

        let hasher = self.hasher;
        let plain = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .context("password hashing task failed")??;

        let user = self.users.create_user(&email, &hash).await.map_err(|e| {
            let e = AuthError::from(e);
            if matches!(e, AuthError::Conflict) {
                warn!(email = %email, "email already registered");
            }
            e
        })?;

        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let email = normalize_email(email)?;
        require_password(password)?;

        let user = match self.users.find_user_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "signin unknown email");
                return Err(AuthError::NotFound);
            }
        };

        let hasher = self.hasher;
        let plain = password.to_owned();
        let stored = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || hasher.verify(&plain, &stored))
            .await
            .context("password verify task failed")??;

        if !ok {
            warn!(email = %email, user_id = %user.id, "signin incorrect password");
            return Err(AuthError::InvalidCredential);
        }

        let issued = self.signer.sign(user.id, &user.email)?;
        info!(
            user_id = %user.id,
            email = %user.email,
            expires_at = %issued.expires_at,
            "user signed in"
        );
        Ok(issued)
    }

    /// Tokens are stateless, so there is nothing to invalidate here.
    pub fn signout(&self) -> &'static str {
        SIGNOUT_MESSAGE
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.signer.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AuthError::Unauthorized
        })
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<PublicUser, AuthError> {
        let user = self
            .users
            .find_user_by_email(&claims.email)
            .await?
            .filter(|u| u.id == claims.sub)
            .ok_or(AuthError::NotFound)?;
        Ok(user.into())
    }
}
