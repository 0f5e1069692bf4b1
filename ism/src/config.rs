//! Module configuration with TOML file support.

use oism_modules::{DelegateResolver, StaticWatcherSet, WatcherSet};
use oism_types::{Address, Clock, Domain};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::IsmError;
use crate::ism::OptimisticIsm;

/// Configuration for one module instance.
///
/// ```toml
/// owner = "0x…"
/// fraud_window_secs = 1800
/// watchers = ["0x…", "0x…", "0x…"]
/// threshold = 2
///
/// [[routes]]
/// origin = 5
/// delegate = "0x…"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsmConfig {
    /// Identity allowed to change the fraud window and routes.
    pub owner: Address,

    /// Seconds a pre-verification stays open to accusations.
    #[serde(default = "default_fraud_window_secs")]
    pub fraud_window_secs: u64,

    /// Identities allowed to accuse delegates, in order.
    #[serde(default)]
    pub watchers: Vec<Address>,

    /// Accusations needed to block finalization for a delegate.
    #[serde(default = "default_threshold")]
    pub threshold: u8,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial origin → delegate routes. Kept last: TOML tables follow plain keys.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub origin: Domain,
    pub delegate: Address,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_fraud_window_secs() -> u64 {
    30 * 60
}

fn default_threshold() -> u8 {
    1
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl IsmConfig {
    /// A configuration with defaults for everything but the owner and watchers.
    pub fn new(owner: Address, watchers: Vec<Address>, threshold: u8) -> Self {
        Self {
            owner,
            fraud_window_secs: default_fraud_window_secs(),
            watchers,
            threshold,
            routes: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, IsmError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| IsmError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, IsmError> {
        toml::from_str(s).map_err(|e| IsmError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, IsmError> {
        toml::to_string_pretty(self).map_err(|e| IsmError::Config(e.to_string()))
    }

    /// Check everything an instance built from this configuration would reject.
    pub fn validate(&self) -> Result<(), IsmError> {
        if self.owner.is_zero() {
            return Err(IsmError::ZeroOwner);
        }
        if self.fraud_window_secs == 0 {
            return Err(IsmError::InvalidFraudWindow(0));
        }
        WatcherSet::new(self.watchers.clone(), self.threshold)?;
        Ok(())
    }

    pub fn watcher_set(&self) -> Result<StaticWatcherSet, IsmError> {
        Ok(StaticWatcherSet::new(self.watchers.clone(), self.threshold)?)
    }
}

impl OptimisticIsm {
    /// Build an instance from configuration and apply its routes as the owner.
    pub fn from_config(
        config: &IsmConfig,
        delegates: Arc<dyn DelegateResolver>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, IsmError> {
        config.validate()?;
        let ism = Self::new(
            config.owner,
            config.fraud_window_secs,
            Arc::new(config.watcher_set()?),
            delegates,
            clock,
        )?;
        for route in &config.routes {
            ism.set_route(config.owner, route.delegate, route.origin)?;
        }
        Ok(ism)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oism_modules::{DelegateDirectory, WatcherSetError};
    use oism_types::SystemClock;

    fn addr(n: u8) -> Address {
        Address::new([n; 32])
    }

    fn hex(n: u8) -> String {
        addr(n).to_string()
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let toml = format!("owner = \"{}\"\nwatchers = [\"{}\"]\n", hex(1), hex(2));
        let config = IsmConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.owner, addr(1));
        assert_eq!(config.fraud_window_secs, 1800);
        assert_eq!(config.threshold, 1);
        assert!(config.routes.is_empty());
        assert_eq!(config.log_format, "human");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_owner_is_an_error() {
        assert!(matches!(
            IsmConfig::from_toml_str(""),
            Err(IsmError::Config(_))
        ));
    }

    #[test]
    fn routes_and_short_addresses_parse() {
        let toml = format!(
            r#"
            owner = "0x{acct}"
            fraud_window_secs = 100
            watchers = ["{a}", "{b}", "{c}"]
            threshold = 2

            [[routes]]
            origin = 5
            delegate = "{d}"
            "#,
            acct = "11".repeat(20),
            a = hex(2),
            b = hex(3),
            c = hex(4),
            d = hex(9),
        );
        let config = IsmConfig::from_toml_str(&toml).expect("should parse");
        assert_eq!(config.owner, Address::from_account([0x11; 20]));
        assert_eq!(config.watchers.len(), 3);
        assert_eq!(config.routes, vec![RouteConfig { origin: 5, delegate: addr(9) }]);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = IsmConfig::new(addr(1), vec![addr(2), addr(3)], 2);
        config.routes.push(RouteConfig { origin: 7, delegate: addr(8) });
        let toml = config.to_toml_string().unwrap();
        assert_eq!(IsmConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = IsmConfig::new(addr(1), vec![addr(2)], 1);
        config.fraud_window_secs = 0;
        assert_eq!(config.validate(), Err(IsmError::InvalidFraudWindow(0)));

        let config = IsmConfig::new(addr(1), vec![addr(2)], 2);
        assert_eq!(
            config.validate(),
            Err(IsmError::WatcherSet(WatcherSetError::InvalidThreshold {
                threshold: 2,
                watchers: 1
            }))
        );

        let config = IsmConfig::new(Address::ZERO, vec![addr(2)], 1);
        assert_eq!(config.validate(), Err(IsmError::ZeroOwner));
    }

    #[test]
    fn from_config_applies_routes() {
        let mut config = IsmConfig::new(addr(1), vec![addr(2)], 1);
        config.routes.push(RouteConfig { origin: 5, delegate: addr(9) });
        let ism = OptimisticIsm::from_config(
            &config,
            Arc::new(DelegateDirectory::new()),
            Arc::new(SystemClock),
        )
        .unwrap();
        assert_eq!(ism.route(5), Some(addr(9)));
        assert_eq!(ism.fraud_window(), 1800);
        assert_eq!(ism.owner(), addr(1));
    }
}
