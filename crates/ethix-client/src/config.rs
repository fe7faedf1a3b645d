//! # Client Configuration
//!
//! Configuration management for the checkout client.
//! API keys are loaded from environment variables or a TOML file.

use ethix_core::{Endpoints, Environment, EthixError};
use serde::Deserialize;
use std::env;
use std::time::Duration;

/// What the poller does when its attempt budget runs out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutBehavior {
    /// Stop quietly; neither callback fires
    Silent,
    /// Fire the failure callback with `POLL_TIMED_OUT`
    NotifyFailure,
}

impl Default for TimeoutBehavior {
    fn default() -> Self {
        TimeoutBehavior::Silent
    }
}

/// Fixed-interval polling parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between attempts
    pub interval: Duration,
    /// Attempts before giving up
    pub max_attempts: u32,
    pub on_timeout: TimeoutBehavior,
}

impl PollPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 36;

    /// Upper bound on the time spent waiting between attempts
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            on_timeout: TimeoutBehavior::Silent,
        }
    }
}

/// Checkout client configuration
#[derive(Debug, Clone)]
pub struct EthixConfig {
    /// Company id issued by the payment processor
    pub third_party_id: String,

    /// API key used against the sandbox
    pub sandbox_api_key: String,

    /// API key used against production
    pub production_api_key: String,

    /// Active environment
    pub environment: Environment,

    /// Endpoint override (mock servers); `None` uses the environment's defaults
    pub endpoints: Option<Endpoints>,

    pub poll: PollPolicy,

    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl EthixConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `ETHIX_SANDBOX_API_KEY` (sandbox) or `ETHIX_PRODUCTION_API_KEY` (production)
    ///
    /// Optional:
    /// - `ETHIX_THIRD_PARTY_ID`
    /// - `ETHIX_ENVIRONMENT` (`sandbox` | `production`, default `sandbox`)
    /// - `ETHIX_POLL_INTERVAL_SECS`, `ETHIX_POLL_MAX_ATTEMPTS`
    /// - `ETHIX_NOTIFY_ON_TIMEOUT` (`true` to report `POLL_TIMED_OUT`)
    pub fn from_env() -> Result<Self, EthixError> {
        Self::from_env_with(None)
    }

    /// Like [`from_env`](Self::from_env), with `environment` taking precedence
    /// over `ETHIX_ENVIRONMENT`
    pub fn from_env_with(environment: Option<Environment>) -> Result<Self, EthixError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment = match (environment, env::var("ETHIX_ENVIRONMENT")) {
            (Some(environment), _) => environment,
            (None, Ok(value)) => value.parse().map_err(EthixError::Configuration)?,
            (None, Err(_)) => Environment::Sandbox,
        };

        let mut poll = PollPolicy::default();
        if let Some(secs) = parse_var::<u64>("ETHIX_POLL_INTERVAL_SECS")? {
            poll.interval = Duration::from_secs(secs);
        }
        if let Some(attempts) = parse_var::<u32>("ETHIX_POLL_MAX_ATTEMPTS")? {
            poll.max_attempts = attempts;
        }
        if parse_var::<bool>("ETHIX_NOTIFY_ON_TIMEOUT")?.unwrap_or(false) {
            poll.on_timeout = TimeoutBehavior::NotifyFailure;
        }

        let config = Self {
            third_party_id: env::var("ETHIX_THIRD_PARTY_ID").unwrap_or_default(),
            sandbox_api_key: env::var("ETHIX_SANDBOX_API_KEY").unwrap_or_default(),
            production_api_key: env::var("ETHIX_PRODUCTION_API_KEY").unwrap_or_default(),
            environment,
            endpoints: None,
            poll,
            http_timeout: Duration::from_secs(30),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document
    ///
    /// ```toml
    /// third_party_id = "studio"
    /// sandbox_api_key = "sk_sandbox"
    /// environment = "sandbox"
    ///
    /// [poll]
    /// interval_secs = 5
    /// max_attempts = 36
    /// on_timeout = "notify_failure"
    /// ```
    pub fn from_toml_str(toml_str: &str) -> Result<Self, EthixError> {
        let file: ConfigFile = toml::from_str(toml_str)
            .map_err(|e| EthixError::Configuration(format!("invalid config file: {e}")))?;

        let defaults = PollPolicy::default();
        let config = Self {
            third_party_id: file.third_party_id,
            sandbox_api_key: file.sandbox_api_key,
            production_api_key: file.production_api_key,
            environment: file.environment,
            endpoints: file.endpoints,
            poll: PollPolicy {
                interval: file
                    .poll
                    .interval_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.interval),
                max_attempts: file.poll.max_attempts.unwrap_or(defaults.max_attempts),
                on_timeout: file.poll.on_timeout,
            },
            http_timeout: Duration::from_secs(file.http_timeout_secs.unwrap_or(30)),
        };
        config.validate()?;
        Ok(config)
    }

    /// Create a sandbox config with explicit values (for testing)
    pub fn new(
        third_party_id: impl Into<String>,
        sandbox_api_key: impl Into<String>,
        production_api_key: impl Into<String>,
    ) -> Self {
        Self {
            third_party_id: third_party_id.into(),
            sandbox_api_key: sandbox_api_key.into(),
            production_api_key: production_api_key.into(),
            environment: Environment::Sandbox,
            endpoints: None,
            poll: PollPolicy::default(),
            http_timeout: Duration::from_secs(30),
        }
    }

    fn validate(&self) -> Result<(), EthixError> {
        if self.api_key().is_empty() {
            let var = match self.environment {
                Environment::Sandbox => "ETHIX_SANDBOX_API_KEY",
                Environment::Production => "ETHIX_PRODUCTION_API_KEY",
            };
            return Err(EthixError::Configuration(format!("{var} not set")));
        }
        if self.poll.max_attempts == 0 {
            return Err(EthixError::Configuration(
                "poll max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// API key for the active environment
    pub fn api_key(&self) -> &str {
        match self.environment {
            Environment::Sandbox => &self.sandbox_api_key,
            Environment::Production => &self.production_api_key,
        }
    }

    /// Endpoints for the active environment, honoring any override
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
            .clone()
            .unwrap_or_else(|| self.environment.endpoints())
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    /// Builder: select the environment
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Builder: point every endpoint at a custom base URL (for testing)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.endpoints = Some(Endpoints::with_base_url(url));
        self
    }

    /// Builder: set the poll policy
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, EthixError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| EthixError::Configuration(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    third_party_id: String,
    #[serde(default)]
    sandbox_api_key: String,
    #[serde(default)]
    production_api_key: String,
    #[serde(default)]
    environment: Environment,
    #[serde(default)]
    endpoints: Option<Endpoints>,
    #[serde(default)]
    poll: PollSection,
    #[serde(default)]
    http_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PollSection {
    interval_secs: Option<u64>,
    max_attempts: Option<u32>,
    #[serde(default)]
    on_timeout: TimeoutBehavior,
}
