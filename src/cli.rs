//! Command-line interface
//!
//! Flags mirror the config file's most-used knobs; anything set here wins
//! over file and environment values.

use clap::Parser;

/// Static file server with `.html` fallback and gzip-compressed responses.
#[derive(Parser, Debug)]
#[command(name = "gzserve", version, about)]
pub struct Cli {
    /// Port to serve on
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Directory of static files to host
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<String>,

    /// Config file basename (extension resolved by the loader)
    #[arg(short = 'c', long, default_value = "config")]
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_flags_parse() {
        let cli = Cli::parse_from(["gzserve", "-p", "8100", "-d", "public"]);
        assert_eq!(cli.port, Some(8100));
        assert_eq!(cli.dir.as_deref(), Some("public"));
        assert_eq!(cli.config, "config");
    }

    #[test]
    fn flags_default_to_unset() {
        let cli = Cli::parse_from(["gzserve"]);
        assert_eq!(cli.port, None);
        assert_eq!(cli.dir, None);
    }
}
