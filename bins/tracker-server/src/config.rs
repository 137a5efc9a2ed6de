use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use tracker_api_server::DEFAULT_IDENTIFIER_FIELD;

use crate::error::ServerError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;

#[derive(Parser)]
#[command(name = "tracker-server", about = "In-memory record tracking HTTP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Запустить HTTP сервер
    Serve(ServeArgs),
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Путь к TOML конфиг файлу (необязательный)
    #[arg(long, env = "TRACKER_CONFIG")]
    pub config: Option<String>,

    /// Адрес интерфейса
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// HTTP порт
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
}

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// JSON ключ идентификатора в `POST /api/data`.
    pub identifier_field: Option<String>,
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self, ServerError> {
        let content = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            context: "read",
            detail: format!("'{path}': {e}"),
        })?;
        toml::from_str(&content).map_err(|e| ServerError::Config {
            context: "parse",
            detail: format!("'{path}': {e}"),
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация: defaults < config.toml < env/CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effective {
    pub host: String,
    pub port: u16,
    pub identifier_field: String,
}

impl Effective {
    pub fn new(args: &ServeArgs) -> Result<Self, ServerError> {
        let cfg = match &args.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        Self::merge(args, cfg)
    }

    pub fn merge(args: &ServeArgs, cfg: ServerConfig) -> Result<Self, ServerError> {
        let identifier_field = cfg
            .identifier_field
            .unwrap_or_else(|| DEFAULT_IDENTIFIER_FIELD.to_string());
        if identifier_field.is_empty() {
            return Err(ServerError::Config {
                context: "validate",
                detail: "identifier_field must not be empty".into(),
            });
        }

        Ok(Self {
            host: args
                .host
                .clone()
                .or(cfg.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(cfg.port).unwrap_or(DEFAULT_PORT),
            identifier_field,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let eff = Effective::merge(&ServeArgs::default(), ServerConfig::default()).unwrap();

        assert_eq!(
            eff,
            Effective {
                host: "0.0.0.0".into(),
                port: 5000,
                identifier_field: "identifier".into(),
            }
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let args = ServeArgs {
            config: None,
            host: None,
            port: Some(8080),
        };
        let cfg: ServerConfig = toml::from_str(
            r#"
            host = "127.0.0.1"
            port = 9000
            identifier_field = "username"
            "#,
        )
        .unwrap();

        let eff = Effective::merge(&args, cfg).unwrap();
        assert_eq!(eff.host, "127.0.0.1");
        assert_eq!(eff.port, 8080);
        assert_eq!(eff.identifier_field, "username");
    }

    #[test]
    fn test_empty_identifier_field_rejected() {
        let cfg = ServerConfig {
            identifier_field: Some(String::new()),
            ..Default::default()
        };

        let err = Effective::merge(&ServeArgs::default(), cfg).unwrap_err();
        assert!(matches!(err, ServerError::Config { context: "validate", .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let parsed: Result<ServerConfig, _> = toml::from_str("prot = 5000");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServerConfig::load("/nonexistent/tracker.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config { context: "read", .. }));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("tracker-{}.toml", std::process::id()));
        std::fs::write(&path, "port = 5050\n").unwrap();

        let cfg = ServerConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cfg.port, Some(5050));
        assert_eq!(cfg.host, None);
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = Cli::try_parse_from([
            "tracker-server",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "7000",
        ])
        .unwrap();

        let Commands::Serve(args) = cli.command;
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(7000));

        let cli = Cli::try_parse_from(["tracker-server", "serve", "--port", "7000"]).unwrap();
        let Commands::Serve(args) = cli.command;
        assert_eq!(args.port, Some(7000));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tracker-server"]).is_err());
        assert!(Cli::try_parse_from(["tracker-server", "--port", "7000"]).is_err());
    }
}
