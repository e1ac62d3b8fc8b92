use std::path::PathBuf;

use anyhow::{Result, bail};

/// Placeholder secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

pub struct Config {
    /// Keys the credential hash and signs session cookies.
    pub secret: String,
    pub db_path: PathBuf,
    pub public_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub https: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let secret = var("SQUIGG_SECRET").unwrap_or_default();
        if secret.is_empty() || PLACEHOLDER_SECRETS.contains(&secret.as_str()) {
            bail!("SQUIGG_SECRET is unset or still a placeholder");
        }

        let port: u16 = var("SQUIGG_PORT").unwrap_or_else(|| "3000".into()).parse()?;
        let https = match var("SQUIGG_HTTPS").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => bail!("SQUIGG_HTTPS must be true or false, got {:?}", other),
        };

        Ok(Self {
            secret,
            db_path: var("SQUIGG_DB_PATH").unwrap_or_else(|| "db.json".into()).into(),
            public_dir: var("SQUIGG_PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
            host: var("SQUIGG_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            https,
        })
    }
}
