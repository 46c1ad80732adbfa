use std::path::Path;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use crate::error::BrokerServerError;

const DEFAULT_CONFIG_PATH: &str = "procon.toml";

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    /// Listen address, `host:port` or `:port`.
    #[serde(default = "default_listen")]
    pub listen: String,
    /// How long in-flight requests may take to finish after a shutdown signal.
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
}

fn default_listen() -> String {
    ":7122".into()
}
fn default_shutdown_grace_secs() -> u64 {
    5
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
        }
    }
}

impl BrokerConfig {
    pub fn load(path: &str) -> Result<Self, BrokerServerError> {
        let content = std::fs::read_to_string(path).map_err(|e| BrokerServerError::Config {
            context: "read",
            detail: format!("'{path}': {e}"),
        })?;
        Self::parse(&content).map_err(|e| match e {
            BrokerServerError::Config { context, detail } => BrokerServerError::Config {
                context,
                detail: format!("'{path}': {detail}"),
            },
            other => other,
        })
    }

    pub fn parse(toml_str: &str) -> Result<Self, BrokerServerError> {
        toml::from_str(toml_str).map_err(|e| BrokerServerError::Config {
            context: "parse",
            detail: e.to_string(),
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Path to a TOML config file (default: ./procon.toml if present)
    #[arg(long, env = "PROCON_CONFIG")]
    pub config: Option<String>,

    /// Listen address, e.g. ":7122" or "127.0.0.1:7122"
    #[arg(long, env = "PROCON_LISTEN")]
    pub listen: Option<String>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings: config file < env/CLI.
#[derive(Debug)]
pub struct Effective {
    pub listen: String,
    pub shutdown_grace: Duration,
}

impl Effective {
    pub fn new(args: &ServeArgs) -> Result<Self, BrokerServerError> {
        let cfg = match &args.config {
            Some(path) => BrokerConfig::load(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                BrokerConfig::load(DEFAULT_CONFIG_PATH)?
            }
            None => BrokerConfig::default(),
        };
        Ok(Self::merge(args, cfg))
    }

    fn merge(args: &ServeArgs, cfg: BrokerConfig) -> Self {
        let listen = args.listen.clone().unwrap_or(cfg.listen);
        Self {
            listen: listen_addr(&listen),
            shutdown_grace: Duration::from_secs(cfg.shutdown_grace_secs),
        }
    }
}

/// `:7122` binds every interface, like `0.0.0.0:7122`.
pub fn listen_addr(raw: &str) -> String {
    let raw = raw.trim();
    match raw.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg = BrokerConfig::parse("").unwrap();
        assert_eq!(cfg.listen, ":7122");
        assert_eq!(cfg.shutdown_grace_secs, 5);
    }

    #[test]
    fn file_values_are_read() {
        let cfg = BrokerConfig::parse("listen = \"127.0.0.1:9000\"\nshutdown_grace_secs = 1\n").unwrap();
        assert_eq!(cfg.listen, "127.0.0.1:9000");
        assert_eq!(cfg.shutdown_grace_secs, 1);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = BrokerConfig::parse("port = 1").unwrap_err();
        assert!(matches!(err, BrokerServerError::Config { context: "parse", .. }));
    }

    #[test]
    fn cli_overrides_file() {
        let args = ServeArgs {
            config: None,
            listen: Some(":8000".into()),
        };
        let cfg = BrokerConfig {
            listen: "10.0.0.1:1".into(),
            shutdown_grace_secs: 2,
        };
        let eff = Effective::merge(&args, cfg);
        assert_eq!(eff.listen, "0.0.0.0:8000");
        assert_eq!(eff.shutdown_grace, Duration::from_secs(2));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let args = ServeArgs {
            config: Some("/nonexistent/procon.toml".into()),
            listen: None,
        };
        let err = Effective::new(&args).unwrap_err();
        assert!(matches!(err, BrokerServerError::Config { context: "read", .. }));
    }

    #[test]
    fn listen_shorthand() {
        assert_eq!(listen_addr(":7122"), "0.0.0.0:7122");
        assert_eq!(listen_addr("127.0.0.1:7122"), "127.0.0.1:7122");
    }
}
