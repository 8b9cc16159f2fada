use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub token_ttl_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("BLOGLIST_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("BLOGLIST_JWT_SECRET is unset or still a placeholder");
        }

        let db_path = lookup("BLOGLIST_DB_PATH").unwrap_or_else(|| "bloglist.db".into());
        let host = lookup("BLOGLIST_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("BLOGLIST_PORT")
            .unwrap_or_else(|| "3003".into())
            .parse()
            .context("BLOGLIST_PORT is not a valid port")?;
        let token_ttl_secs: i64 = lookup("BLOGLIST_TOKEN_TTL_SECS")
            .unwrap_or_else(|| "3600".into())
            .parse()
            .context("BLOGLIST_TOKEN_TTL_SECS is not a number")?;
        if token_ttl_secs <= 0 {
            bail!("BLOGLIST_TOKEN_TTL_SECS must be positive");
        }

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl_secs,
        })
    }
}
