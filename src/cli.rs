//! Command-line interface parsing for quotd
//!
//! Subcommands map onto the quote service operations; global flags (with
//! environment fallbacks) feed the runtime configuration.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::quote::Role;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified role name is not recognized
    #[error("Invalid role: '{0}'. Valid roles: admin, faculty, student")]
    InvalidRole(String),

    /// The specified date is not `YYYY-MM-DD`
    #[error("Invalid date: '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// quotd - Quote of the day for the library portal
#[derive(Parser, Debug)]
#[command(name = "quotd")]
#[command(about = "Quote of the day with daily caching and midnight refresh")]
#[command(version)]
pub struct Cli {
    /// Base URL of the quotes API
    #[arg(long, global = true, env = "QUOTD_API_BASE", value_name = "URL")]
    pub api_base: Option<String>,

    /// Directory holding the persisted quote
    #[arg(long, global = true, env = "QUOTD_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds between day-rollover checks in watch mode
    #[arg(long, global = true, env = "QUOTD_POLL_SECS", value_name = "SECS")]
    pub poll_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Role selection shared by subcommands
#[derive(Args, Debug, Clone)]
pub struct RoleArg {
    /// Portal role: admin, faculty or student
    #[arg(long, short, default_value = "student", value_parser = parse_role_arg)]
    pub role: Role,
}

/// Arguments of commands that print a quote
#[derive(Args, Debug, Clone)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub role: RoleArg,

    /// Print the response as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show today's quote, fetching it only if not cached today
    Today(QuoteArgs),

    /// Fetch a random quote without touching the daily cache
    Random {
        #[command(flatten)]
        role: RoleArg,

        /// Category to draw from (omit for any category)
        #[arg(long, short)]
        category: Option<String>,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the cache and fetch a fresh quote of the day
    Refresh(QuoteArgs),

    /// Show which category a role gets on a given day
    Category {
        #[command(flatten)]
        role: RoleArg,

        /// Day to evaluate (defaults to today)
        #[arg(long, short, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,
    },

    /// Remove the cached quote
    Clear,

    /// Live quote widget that refreshes at midnight
    Watch(RoleArg),
}

impl Cli {
    /// The command to run; no subcommand means `today --role student`
    pub fn resolved_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Today(QuoteArgs {
            role: RoleArg {
                role: Role::Student,
            },
            json: false,
        }))
    }
}

/// Parses a role argument
///
/// # Returns
/// * `Ok(Role)` if the string names a role
/// * `Err(CliError::InvalidRole)` otherwise
pub fn parse_role_arg(s: &str) -> Result<Role, CliError> {
    s.parse().map_err(|_| CliError::InvalidRole(s.to_string()))
}

/// Parses a `YYYY-MM-DD` date argument
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_arg() {
        assert_eq!(parse_role_arg("admin").unwrap(), Role::Admin);
        assert_eq!(parse_role_arg("FACULTY").unwrap(), Role::Faculty);

        let err = parse_role_arg("janitor").unwrap_err();
        assert!(err.to_string().contains("Invalid role"));
        assert!(err.to_string().contains("janitor"));
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date_arg("03/01/2024").is_err());
        assert!(parse_date_arg("2024-02-30").is_err());
    }

    #[test]
    fn test_no_args_defaults_to_student_today() {
        let cli = Cli::parse_from(["quotd"]);
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.resolved_command(),
            Command::Today(QuoteArgs {
                role: RoleArg {
                    role: Role::Student
                },
                json: false,
            })
        ));
    }

    #[test]
    fn test_today_with_role() {
        let cli = Cli::parse_from(["quotd", "today", "--role", "admin"]);
        assert!(matches!(
            cli.resolved_command(),
            Command::Today(QuoteArgs {
                role: RoleArg { role: Role::Admin },
                json: false,
            })
        ));
    }

    #[test]
    fn test_random_with_category() {
        let cli = Cli::parse_from(["quotd", "random", "-c", "wisdom", "-r", "faculty"]);
        match cli.resolved_command() {
            Command::Random {
                role,
                category,
                json,
            } => {
                assert_eq!(role.role, Role::Faculty);
                assert_eq!(category.as_deref(), Some("wisdom"));
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_category_with_date() {
        let cli = Cli::parse_from(["quotd", "category", "--date", "2024-03-01"]);
        match cli.resolved_command() {
            Command::Category { role, date } => {
                assert_eq!(role.role, Role::Student);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "quotd",
            "watch",
            "--poll-secs",
            "5",
            "--api-base",
            "http://localhost:8888",
        ]);
        assert_eq!(cli.poll_secs, Some(5));
        assert_eq!(cli.api_base.as_deref(), Some("http://localhost:8888"));
    }

    #[test]
    fn test_invalid_role_is_rejected() {
        assert!(Cli::try_parse_from(["quotd", "today", "--role", "librarian"]).is_err());
    }

    #[test]
    fn test_json_flag_only_on_quote_commands() {
        let cli = Cli::parse_from(["quotd", "today", "--json"]);
        assert!(matches!(cli.resolved_command(), Command::Today(QuoteArgs { json: true, .. })));

        let cli = Cli::parse_from(["quotd", "refresh", "--json", "-r", "admin"]);
        assert!(matches!(cli.resolved_command(), Command::Refresh(QuoteArgs { json: true, .. })));

        let cli = Cli::parse_from(["quotd", "random", "--json"]);
        assert!(matches!(cli.resolved_command(), Command::Random { json: true, .. }));

        assert!(Cli::try_parse_from(["quotd", "clear", "--json"]).is_err());
        assert!(Cli::try_parse_from(["quotd", "category", "--json"]).is_err());
        assert!(Cli::try_parse_from(["quotd", "watch", "--json"]).is_err());
    }
}
