use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Key used to sign new tokens.
    pub secret: String,
    /// Rotated-out keys still accepted when verifying.
    pub previous_secrets: Vec<String>,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordConfig {
    /// Argon2 time cost (number of passes).
    pub cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

pub const DEFAULT_TTL_MINUTES: i64 = 60 * 24;
/// Ten years; anything longer falls back to the default.
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;
pub const DEFAULT_HASH_COST: u32 = 10;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            previous_secrets: lookup("JWT_PREVIOUS_SECRETS")
                .map(|v| parse_secret_list(&v))
                .unwrap_or_default(),
            ttl_minutes: lookup("JWT_TTL_MINUTES")
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| (1..=MAX_TTL_MINUTES).contains(v))
                .unwrap_or(DEFAULT_TTL_MINUTES),
        };
        if jwt.secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let password = PasswordConfig {
            cost: lookup("PASSWORD_HASH_COST")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(DEFAULT_HASH_COST),
        };
        Ok(Self {
            database_url,
            jwt,
            password,
        })
    }
}

fn parse_secret_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn secret_list_skips_blanks() {
        assert_eq!(
            parse_secret_list(" old-1 ,, old-2 ,"),
            vec!["old-1".to_string(), "old-2".to_string()]
        );
        assert!(parse_secret_list("").is_empty());
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    const BASE: [(&str, &str); 2] = [("DATABASE_URL", "postgres://db"), ("JWT_SECRET", "s3cret")];

    #[test]
    fn unset_values_use_one_day_and_cost_ten() {
        let cfg = AppConfig::from_lookup(lookup_from(&BASE)).unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 1440);
        assert_eq!(cfg.password.cost, 10);
        assert!(cfg.jwt.previous_secrets.is_empty());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        for (ttl, cost) in [("abc", "x"), ("0", "0"), ("-5", "-1"), ("10000000000", "")] {
            let mut vars = BASE.to_vec();
            vars.push(("JWT_TTL_MINUTES", ttl));
            vars.push(("PASSWORD_HASH_COST", cost));
            let cfg = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
            assert_eq!(cfg.jwt.ttl_minutes, DEFAULT_TTL_MINUTES, "ttl {ttl}");
            assert_eq!(cfg.password.cost, DEFAULT_HASH_COST, "cost {cost}");
        }
    }

    #[test]
    fn explicit_values_are_kept() {
        let mut vars = BASE.to_vec();
        vars.push(("JWT_TTL_MINUTES", "30"));
        vars.push(("PASSWORD_HASH_COST", "3"));
        vars.push(("JWT_PREVIOUS_SECRETS", "old"));
        let cfg = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, 30);
        assert_eq!(cfg.password.cost, 3);
        assert_eq!(cfg.jwt.previous_secrets, vec!["old".to_string()]);
    }

    #[test]
    fn missing_or_blank_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db")]))
            .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"), "{err}");

        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("JWT_SECRET", "   "),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"), "{err}");
    }

    #[test]
    fn missing_database_url_is_named() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"), "{err}");
    }

    #[test]
    fn default_config_issues_one_day_tokens() {
        use crate::auth::jwt::{JwtKeys, TokenSigner};

        let cfg = AppConfig::from_lookup(lookup_from(&BASE)).unwrap();
        let keys = JwtKeys::from(&cfg.jwt);
        let issued = keys.sign(uuid::Uuid::new_v4(), "a@example.com").unwrap();
        let claims = keys.verify(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 86_400);
    }
}
