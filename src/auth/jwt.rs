use anyhow::Context;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::{Claims, IssuedToken};
use crate::config::JwtConfig;

/// Mints and checks bearer tokens.
pub trait TokenSigner: Send + Sync {
    fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<IssuedToken>;
    fn verify(&self, token: &str) -> anyhow::Result<Claims>;
}

/// HS256 keys. New tokens are signed with the current secret; verification
/// also accepts any secret listed as previous.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: Vec<DecodingKey>,
    /// Token lifetime in seconds; `None` when the configured value overflows.
    ttl_secs: Option<i64>,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        let decoding = std::iter::once(&cfg.secret)
            .chain(cfg.previous_secrets.iter())
            .map(|s| DecodingKey::from_secret(s.as_bytes()))
            .collect();
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding,
            ttl_secs: cfg.ttl_minutes.max(0).checked_mul(60),
        }
    }
}

impl TokenSigner for JwtKeys {
    fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<IssuedToken> {
        let now = OffsetDateTime::now_utc();
        let ttl = self.ttl_secs.context("token lifetime out of range")?;
        let exp = now
            .checked_add(TimeDuration::seconds(ttl))
            .context("token expiry out of range")?;
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let validation = Validation::default();
        let mut last_err = None;
        for key in &self.decoding {
            match decode::<Claims>(token, key, &validation) {
                Ok(data) => {
                    debug!(user_id = %data.claims.sub, "jwt verified");
                    return Ok(data.claims);
                }
                // Try the next (older) secret.
                Err(e) if matches!(e.kind(), ErrorKind::InvalidSignature) => last_err = Some(e),
                Err(e) => return Err(e.into()),
            }
        }
        match last_err {
            Some(e) => Err(e.into()),
            None => anyhow::bail!("no verification keys configured"),
        }
    }
}
