use std::fmt;

use crate::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL,
    error::{Result, SkillError},
    poll::PollPolicy,
    retry::RetryPolicy,
};

/// A resolved grsai API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Snapshot of the environment variables the tools care about. Read once in
/// `main` and passed down, so nothing below reads the process environment.
#[derive(Debug, Clone, Default)]
pub struct Env {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Env {
    pub fn from_process() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            base_url: std::env::var(BASE_URL_ENV).ok(),
        }
    }
}

/// The explicit key wins over the environment. Empty strings count as absent.
pub fn resolve_api_key(explicit: Option<&str>, env: Option<&str>) -> Result<ApiKey> {
    explicit
        .filter(|k| !k.is_empty())
        .or(env.filter(|k| !k.is_empty()))
        .map(ApiKey::new)
        .ok_or(SkillError::MissingCredential)
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub base_url: String,
    pub retry: RetryPolicy,
    pub poll: PollPolicy,
}

impl Config {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            retry: RetryPolicy::default(),
            poll: PollPolicy::default(),
        }
    }

    /// Resolves the key from the flag or `env` and applies the optional host
    /// override.
    pub fn resolve(explicit_key: Option<&str>, env: &Env) -> Result<Self> {
        let api_key = resolve_api_key(explicit_key, env.api_key.as_deref())?;
        let mut cfg = Self::new(api_key);
        if let Some(url) = env.base_url.as_deref().filter(|u| !u.is_empty()) {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(cfg)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}
