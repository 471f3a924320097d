use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
};

use anyhow::{bail, Context};
use jsonwebtoken::Algorithm;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    /// Empty means any origin is accepted.
    pub allowed_origins: Vec<String>,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests do not have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v),
                _ => bail!("missing required configuration value {key}"),
            }
        };

        let database_url = required("DATABASE_URL")?;
        let secret = required("JWT_SECRET")?;

        let algorithm_name = lookup("JWT_ALGORITHM").unwrap_or_else(|| "HS256".into());
        let algorithm = Algorithm::from_str(algorithm_name.trim())
            .with_context(|| format!("unknown JWT_ALGORITHM {algorithm_name}"))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            bail!("JWT_ALGORITHM must be a symmetric HMAC algorithm, got {algorithm_name}");
        }

        let ttl_minutes = parse_or(&lookup, "JWT_TTL_MINUTES", 30i64)?;
        if ttl_minutes <= 0 {
            bail!("JWT_TTL_MINUTES must be positive");
        }

        let defaults = PasswordConfig::default();
        let password = PasswordConfig {
            memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or(&lookup, "APP_PORT", 8080u16)?;
        let ip = host
            .trim()
            .parse::<IpAddr>()
            .with_context(|| format!("invalid APP_HOST {host}"))?;
        let listen_addr = SocketAddr::new(ip, port);

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10u32)?,
            jwt: JwtConfig {
                secret,
                algorithm,
                issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "salesbuddy".into()),
                audience: lookup("JWT_AUDIENCE")
                    .unwrap_or_else(|| "salesbuddy-extension".into()),
                ttl_minutes,
            },
            password,
            allowed_origins,
            listen_addr,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => v
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {v}")),
        None => Ok(default),
    }
}
