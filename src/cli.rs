//! Command-line interface argument parsing.
//!
//! Without a subcommand the portal opens the terminal homepage.  The `admin`
//! subcommand manages carousel slides, devotionals and history entries, and
//! `init-config` writes a starter configuration file.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// church-portal - homepage and content admin for the church content API
///
/// Examples:
///   church-portal --api-url https://gereja.example/api
///   church-portal --devotional 12
///   church-portal admin slides list
///   church-portal admin history create --file milestone.json
///   church-portal init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Base URL of the content API
    ///
    /// Overrides `[api] base_url` from the configuration file.
    #[arg(long, value_name = "URL", env = "CHURCH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for church-portal.toml in the current directory
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Open the devotional detail page for this id instead of the homepage
    #[arg(long, value_name = "ID")]
    pub devotional: Option<i64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Manage homepage content
    Admin {
        /// Which collection to manage
        #[arg(value_enum)]
        resource: Resource,

        #[command(subcommand)]
        action: AdminAction,
    },

    /// Write a default church-portal.toml to the current directory
    InitConfig,
}

/// Collections the admin commands can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    /// Homepage carousel slides
    Slides,
    /// Daily devotionals
    Devotionals,
    /// Church history milestones
    History,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    /// Print every record
    List,
    /// Print one record
    Show { id: i64 },
    /// Create a record from a JSON file ("-" reads stdin)
    Create {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Replace a record from a JSON file ("-" reads stdin)
    Update {
        id: i64,
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Delete a record
    Delete { id: i64 },
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.devotional.is_some() && self.command.is_some() {
            return Err("--devotional only applies to the interactive portal".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn no_subcommand_opens_portal() {
        let args = parse(&["church-portal", "--api-url", "http://localhost:8000/api"]);
        assert!(args.command.is_none());
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:8000/api"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn parses_admin_update() {
        let args = parse(&[
            "church-portal",
            "admin",
            "devotionals",
            "update",
            "12",
            "--file",
            "renungan.json",
        ]);
        assert_eq!(
            args.command,
            Some(Command::Admin {
                resource: Resource::Devotionals,
                action: AdminAction::Update {
                    id: 12,
                    file: PathBuf::from("renungan.json"),
                },
            })
        );
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let args = parse(&["church-portal", "admin", "history", "list", "-v"]);
        assert!(args.verbose);
    }

    #[test]
    fn rejects_non_http_api_url() {
        let args = parse(&["church-portal", "--api-url", "ftp://example.com"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let args = parse(&["church-portal", "--timeout", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn devotional_flag_conflicts_with_admin() {
        let args = parse(&["church-portal", "--devotional", "3", "init-config"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = parse(&["church-portal"]);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
    }
}
