use std::{env, net::SocketAddr, path::PathBuf};
use anyhow::{Context, Result};

use crate::services::session::MissingSessionPolicy;

/// Where the persisted demo flag lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlagBackend {
    /// Process memory; lost on restart.
    Memory,
    /// A JSON file on disk.
    File(PathBuf),
    /// A Redis server.
    Redis(String),
}

/// The application's configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The persisted flag storage.
    pub flag_backend: FlagBackend,
    /// Whether protected routes redirect signed-out users to the login page.
    pub require_auth: bool,
    /// What a profile update does when nobody is signed in.
    pub missing_session_policy: MissingSessionPolicy,
    /// The duration of a session in days.
    pub session_duration_days: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            flag_backend: FlagBackend::Memory,
            require_auth: false,
            missing_session_policy: MissingSessionPolicy::Reject,
            session_duration_days: 7,
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => anyhow::bail!("{} must be true or false, got {:?}", name, other),
    }
}

fn parse_policy(value: &str) -> Result<MissingSessionPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reject" => Ok(MissingSessionPolicy::Reject),
        "ignore" => Ok(MissingSessionPolicy::Ignore),
        other => anyhow::bail!(
            "PROFILE_UPDATE_WITHOUT_SESSION must be reject or ignore, got {:?}",
            other
        ),
    }
}

/// The longest session a deployment may configure, in days.
const MAX_SESSION_DURATION_DAYS: i64 = 3650;

fn parse_session_duration(value: &str) -> Result<i64> {
    let days: i64 = value
        .trim()
        .parse()
        .context("Invalid SESSION_DURATION_DAYS")?;

    if !(1..=MAX_SESSION_DURATION_DAYS).contains(&days) {
        anyhow::bail!(
            "SESSION_DURATION_DAYS must be between 1 and {}, got {}",
            MAX_SESSION_DURATION_DAYS,
            days
        );
    }
    Ok(days)
}

fn parse_flag_backend(kind: &str, file: String, redis_url: String) -> Result<FlagBackend> {
    match kind.trim().to_ascii_lowercase().as_str() {
        "memory" => Ok(FlagBackend::Memory),
        "file" => Ok(FlagBackend::File(PathBuf::from(file))),
        "redis" => Ok(FlagBackend::Redis(redis_url)),
        other => anyhow::bail!("FLAG_STORE must be file, memory or redis, got {:?}", other),
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;

        let flag_backend = parse_flag_backend(
            &env::var("FLAG_STORE").unwrap_or_else(|_| "file".to_string()),
            env::var("FLAG_FILE").unwrap_or_else(|_| "data/local-storage.json".to_string()),
            env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        )?;

        let require_auth = parse_bool(
            "REQUIRE_AUTH",
            &env::var("REQUIRE_AUTH").unwrap_or_else(|_| "false".to_string()),
        )?;

        let missing_session_policy = parse_policy(
            &env::var("PROFILE_UPDATE_WITHOUT_SESSION").unwrap_or_else(|_| "reject".to_string()),
        )?;

        let session_duration_days = parse_session_duration(
            &env::var("SESSION_DURATION_DAYS").unwrap_or_else(|_| "7".to_string()),
        )?;

        Ok(Self {
            bind_addr,
            flag_backend,
            require_auth,
            missing_session_policy,
            session_duration_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_values() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }

    #[test]
    fn policy_values() {
        assert_eq!(parse_policy("Ignore").unwrap(), MissingSessionPolicy::Ignore);
        assert_eq!(parse_policy("reject").unwrap(), MissingSessionPolicy::Reject);
        assert!(parse_policy("silent").is_err());
    }

    #[test]
    fn session_duration_is_bounded() {
        assert_eq!(parse_session_duration("7").unwrap(), 7);
        assert_eq!(parse_session_duration("3650").unwrap(), 3650);
        assert!(parse_session_duration("0").is_err());
        assert!(parse_session_duration("-3").is_err());
        assert!(parse_session_duration("3651").is_err());
        assert!(parse_session_duration("100000000").is_err());
        assert!(parse_session_duration("a week").is_err());
    }

    #[test]
    fn flag_backend_values() {
        assert_eq!(
            parse_flag_backend("file", "flags.json".into(), String::new()).unwrap(),
            FlagBackend::File(PathBuf::from("flags.json"))
        );
        assert_eq!(
            parse_flag_backend("redis", String::new(), "redis://x".into()).unwrap(),
            FlagBackend::Redis("redis://x".to_string())
        );
        assert!(parse_flag_backend("s3", String::new(), String::new()).is_err());
    }
}
