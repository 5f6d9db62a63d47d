// Configuration module entry point
// Layered configuration: defaults, optional file, environment, CLI flags

mod state;
mod types;

use std::net::SocketAddr;

use crate::cli::Cli;

// Re-export public types
pub use state::AppState;
pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig, StaticConfig};

impl Config {
    /// Load configuration: programmatic defaults, then an optional config
    /// file, then `SERVER_*` environment variables, then CLI flags on top.
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8100)?
            .set_default("static_files.root", ".")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;

        // Command-line flags take precedence over file and environment.
        if let Some(port) = cli.port {
            cfg.server.port = port;
        }
        if let Some(ref dir) = cli.dir {
            cfg.static_files.root = dir.clone();
        }
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        use clap::Parser;
        Cli::parse_from(std::iter::once("gzserve").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_the_documented_interface() {
        let cfg = Config::load(&cli(&["-c", "no_such_config"])).unwrap();
        assert_eq!(cfg.server.port, 8100);
        assert_eq!(cfg.static_files.root, ".");
        assert_eq!(cfg.static_files.index_files, ["index.html", "index.htm"]);
        assert_eq!(cfg.logging.access_log_format, "combined");
    }

    #[test]
    fn cli_flags_override_defaults() {
        let cfg = Config::load(&cli(&["-c", "no_such_config", "-p", "9000", "-d", "site"])).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.static_files.root, "site");
    }

    #[test]
    fn socket_addr_combines_host_and_port() {
        let mut cfg = Config::load(&cli(&["-c", "no_such_config"])).unwrap();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8100;
        assert_eq!(cfg.socket_addr().unwrap().port(), 8100);
    }
}
