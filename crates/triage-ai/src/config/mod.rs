use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::triage::{CompletionPolicy, ScoringStrategy};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub triage: TriageOptions,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let default_strategy = match env::var("APP_SCORING_STRATEGY") {
            Ok(raw) => parse_strategy(&raw)?,
            Err(_) => ScoringStrategy::YesRatio,
        };

        let minimum_answers = match env::var("APP_MIN_ANSWERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidMinimumAnswers)?,
            Err(_) => CompletionPolicy::default().minimum_answers,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            triage: TriageOptions {
                default_strategy,
                minimum_answers,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Scoring defaults applied to interactive sessions.
#[derive(Debug, Clone, Copy)]
pub struct TriageOptions {
    pub default_strategy: ScoringStrategy,
    pub minimum_answers: usize,
}

impl TriageOptions {
    pub fn completion_policy(&self) -> CompletionPolicy {
        CompletionPolicy {
            minimum_answers: self.minimum_answers,
        }
    }
}

fn parse_strategy(raw: &str) -> Result<ScoringStrategy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "weighted_keyword" => Ok(ScoringStrategy::WeightedKeyword),
        "yes_ratio" => Ok(ScoringStrategy::YesRatio),
        _ => Err(ConfigError::UnknownScoringStrategy {
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMinimumAnswers,
    UnknownScoringStrategy { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMinimumAnswers => {
                write!(f, "APP_MIN_ANSWERS must be a non-negative integer")
            }
            ConfigError::UnknownScoringStrategy { value } => {
                write!(
                    f,
                    "APP_SCORING_STRATEGY '{value}' is not one of: weighted_keyword, yes_ratio"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMinimumAnswers
            | ConfigError::UnknownScoringStrategy { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_SCORING_STRATEGY");
        env::remove_var("APP_MIN_ANSWERS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.triage.default_strategy, ScoringStrategy::YesRatio);
        assert_eq!(config.triage.minimum_answers, 2);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn parses_scoring_strategy_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_STRATEGY", "weighted_keyword");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.triage.default_strategy,
            ScoringStrategy::WeightedKeyword
        );
        reset_env();
    }

    #[test]
    fn rejects_unknown_scoring_strategy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SCORING_STRATEGY", "coin_flip");
        match AppConfig::load() {
            Err(ConfigError::UnknownScoringStrategy { value }) => assert_eq!(value, "coin_flip"),
            other => panic!("expected strategy error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn minimum_answers_override_applies() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MIN_ANSWERS", "3");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.triage.minimum_answers, 3);
        assert_eq!(config.triage.completion_policy().minimum_answers, 3);
        reset_env();
    }
}
