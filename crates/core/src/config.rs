use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delay::{DelayPolicy, DEFAULT_DELAY_THRESHOLD_MINUTES};
use crate::error::FlightwatchError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    profiled_env_opt(profile, key)
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Split a comma-separated list, dropping blanks and upper-casing codes.
pub fn parse_code_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub store: StoreConfig,
    pub poller: PollerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FLIGHTWATCH_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("FLIGHTWATCH_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            provider: ProviderConfig::from_env_profiled(p),
            store: StoreConfig::from_env_profiled(p),
            poller: PollerConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Check the settings the polling loop cannot run without.
    pub fn validate(&self) -> Result<(), FlightwatchError> {
        if !self.provider.is_configured() {
            return Err(FlightwatchError::Config(
                "AVIATIONSTACK_KEY is not set".to_string(),
            ));
        }
        if self.provider.airport_limit == 0
            || self.provider.airline_limit == 0
            || self.provider.flight_limit == 0
        {
            return Err(FlightwatchError::Config(
                "page limits must be greater than zero".to_string(),
            ));
        }
        if self.poller.interval_secs == 0 {
            return Err(FlightwatchError::Config(
                "POLL_INTERVAL_SECS must be greater than zero".to_string(),
            ));
        }
        if self.provider.timeout_secs == 0 {
            return Err(FlightwatchError::Config(
                "PROVIDER_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:    {}:{}", self.server.host, self.server.port);
        tracing::info!(
            "  provider:  url={}, key={}, timeout={}s",
            self.provider.base_url,
            if self.provider.is_configured() { "(set)" } else { "(none)" },
            self.provider.timeout_secs
        );
        tracing::info!(
            "  scope:     airports={} (limit {}), airlines={} (limit {}), departures=[{}] (limit {})",
            self.provider.airport_country,
            self.provider.airport_limit,
            self.provider.airline_country,
            self.provider.airline_limit,
            self.provider.flight_departures.join(","),
            self.provider.flight_limit
        );
        tracing::info!("  store:     backend={}", self.store.backend_label());
        tracing::info!(
            "  poller:    interval={}s, delay_threshold={}m, prune_stale_delays={}",
            self.poller.interval_secs,
            self.poller.delay_threshold_minutes,
            self.poller.prune_stale_delays
        );
    }

    /// Return a redacted view safe for API responses (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "server": { "host": self.server.host, "port": self.server.port },
            "provider": {
                "base_url": self.provider.base_url,
                "configured": self.provider.is_configured(),
                "timeout_secs": self.provider.timeout_secs,
                "airport_country": self.provider.airport_country,
                "airline_country": self.provider.airline_country,
                "flight_departures": self.provider.flight_departures,
            },
            "store": { "backend": self.store.backend_label() },
            "poller": {
                "interval_secs": self.poller.interval_secs,
                "delay_threshold_minutes": self.poller.delay_threshold_minutes,
                "prune_stale_delays": self.poller.prune_stale_delays,
            },
        })
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 8000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
        }
    }
}

// ── Flight data provider ──────────────────────────────────────

pub const DEFAULT_PROVIDER_URL: &str = "https://api.aviationstack.com/v1";
pub const DEFAULT_FLIGHT_DEPARTURES: &str = "FRA,MUC,BER,HAM,DUS";

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Provider access credential; never logged or serialized.
    #[serde(skip_serializing)]
    pub access_key: Option<String>,
    /// Upper bound for a single outbound request.
    pub timeout_secs: u64,
    pub airport_country: String,
    pub airline_country: String,
    /// Departure airports for the flights query (empty = unfiltered).
    pub flight_departures: Vec<String>,
    pub airport_limit: u32,
    pub airline_limit: u32,
    pub flight_limit: u32,
}

impl ProviderConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            base_url: profiled_env_or(p, "AVIATIONSTACK_URL", DEFAULT_PROVIDER_URL),
            access_key: profiled_env_opt(p, "AVIATIONSTACK_KEY"),
            timeout_secs: profiled_env_parse(p, "PROVIDER_TIMEOUT_SECS", 30),
            airport_country: profiled_env_or(p, "AIRPORT_COUNTRY", "DE"),
            airline_country: profiled_env_or(p, "AIRLINE_COUNTRY", "DE"),
            flight_departures: parse_code_list(&profiled_env_or(
                p,
                "FLIGHT_DEPARTURES",
                DEFAULT_FLIGHT_DEPARTURES,
            )),
            airport_limit: profiled_env_parse(p, "AIRPORT_LIMIT", 100),
            airline_limit: profiled_env_parse(p, "AIRLINE_LIMIT", 50),
            flight_limit: profiled_env_parse(p, "FLIGHT_LIMIT", 100),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            access_key: None,
            timeout_secs: 30,
            airport_country: "DE".to_string(),
            airline_country: "DE".to_string(),
            flight_departures: parse_code_list(DEFAULT_FLIGHT_DEPARTURES),
            airport_limit: 100,
            airline_limit: 50,
            flight_limit: 100,
        }
    }
}

// Hand-written so the access key never ends up in debug output.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("access_key", &self.access_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("airport_country", &self.airport_country)
            .field("airline_country", &self.airline_country)
            .field("flight_departures", &self.flight_departures)
            .field("airport_limit", &self.airport_limit)
            .field("airline_limit", &self.airline_limit)
            .field("flight_limit", &self.flight_limit)
            .finish()
    }
}

// ── Document store ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    Postgres,
    Memory,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Explicit backend; `None` picks Postgres when a URL is set.
    pub backend: Option<StoreBackendKind>,
    #[serde(skip_serializing)]
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl StoreConfig {
    fn from_env_profiled(p: &str) -> Self {
        let backend = profiled_env_opt(p, "STORE_BACKEND").and_then(|v| {
            match v.to_ascii_lowercase().as_str() {
                "postgres" | "pg" => Some(StoreBackendKind::Postgres),
                "memory" | "mem" => Some(StoreBackendKind::Memory),
                other => {
                    tracing::warn!(backend = %other, "unknown STORE_BACKEND, falling back to auto-detect");
                    None
                }
            }
        });
        Self {
            backend,
            database_url: profiled_env_opt(p, "DATABASE_URL"),
            max_connections: profiled_env_parse(p, "DB_MAX_CONNECTIONS", 5),
        }
    }

    /// Backend actually selected after auto-detection.
    pub fn resolved_backend(&self) -> StoreBackendKind {
        match self.backend {
            Some(kind) => kind,
            None if self.database_url.is_some() => StoreBackendKind::Postgres,
            None => StoreBackendKind::Memory,
        }
    }

    pub fn backend_label(&self) -> &'static str {
        match self.resolved_backend() {
            StoreBackendKind::Postgres => "postgres",
            StoreBackendKind::Memory => "memory",
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: Some(StoreBackendKind::Memory),
            database_url: None,
            max_connections: 5,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("backend", &self.backend)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

// ── Polling driver ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Pause after each completed cycle.
    pub interval_secs: u64,
    pub delay_threshold_minutes: i64,
    /// Remove delay records whose flight no longer meets the threshold.
    pub prune_stale_delays: bool,
}

impl PollerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            interval_secs: profiled_env_parse(p, "POLL_INTERVAL_SECS", 300),
            delay_threshold_minutes: profiled_env_parse(
                p,
                "DELAY_THRESHOLD_MINUTES",
                DEFAULT_DELAY_THRESHOLD_MINUTES,
            ),
            prune_stale_delays: profiled_env_bool(p, "PRUNE_STALE_DELAYS", true),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn delay_policy(&self) -> DelayPolicy {
        DelayPolicy::new(self.delay_threshold_minutes)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            delay_threshold_minutes: DEFAULT_DELAY_THRESHOLD_MINUTES,
            prune_stale_delays: true,
        }
    }
}
