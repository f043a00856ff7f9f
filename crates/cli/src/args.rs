//! Command-line argument definitions.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};

use reunite_client::{Gender, ReportStatus};

/// Command-line client for the reunite missing-person registry.
#[derive(Debug, Parser)]
#[command(name = "reunite", version, about = "Report and search missing persons")]
pub struct Cli {
    /// Base URL of the registry API.
    #[arg(long, env = "REUNITE_API_URL", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and sign in.
    Register {
        /// Desired username.
        #[arg(long)]
        username: String,

        /// Contact email.
        #[arg(long)]
        email: String,

        /// Account password.
        #[arg(long, env = "REUNITE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Contact phone.
        #[arg(long)]
        phone: Option<String>,
    },

    /// Sign in to an existing account.
    Login {
        /// Username.
        #[arg(long)]
        username: String,

        /// Account password.
        #[arg(long, env = "REUNITE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and discard the stored credential.
    Logout,

    /// Show the signed-in account.
    Whoami,

    /// File a new missing-person report.
    Submit(SubmitArgs),

    /// Search reports.
    Search {
        /// Free-text search over names, locations, and descriptions.
        #[arg(long)]
        query: Option<String>,

        /// Restrict to one gender (male, female, or other).
        #[arg(long)]
        gender: Option<Gender>,

        /// Status to list (missing, found, or closed).
        #[arg(long)]
        status: Option<ReportStatus>,

        /// Page to fetch.
        #[arg(long)]
        page: Option<u32>,

        /// Page size.
        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Show one report in full.
    Show {
        /// Report id.
        id: i64,
    },

    /// Change the lifecycle status of a report you filed.
    Status {
        /// Report id.
        id: i64,

        /// New status (missing, found, or closed).
        status: ReportStatus,
    },

    /// Delete a report you filed.
    Delete {
        /// Report id.
        id: i64,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Show your reports alongside the most recent ones.
    Dashboard,
}

/// Everything needed to file a report from the command line.
#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Full name of the missing person.
    #[arg(long)]
    pub full_name: String,

    /// Age in years.
    #[arg(long)]
    pub age: Option<u32>,

    /// Gender (male, female, or other).
    #[arg(long)]
    pub gender: Option<Gender>,

    /// Height in centimeters.
    #[arg(long)]
    pub height: Option<f64>,

    /// Weight in kilograms.
    #[arg(long)]
    pub weight: Option<f64>,

    /// Hair color.
    #[arg(long)]
    pub hair_color: Option<String>,

    /// Eye color.
    #[arg(long)]
    pub eye_color: Option<String>,

    /// Where the person was last seen.
    #[arg(long)]
    pub last_seen_location: Option<String>,

    /// When the person was last seen, as YYYY-MM-DD.
    #[arg(long, value_parser = parse_date)]
    pub last_seen_date: Option<NaiveDateTime>,

    /// Free-form description.
    #[arg(long)]
    pub description: Option<String>,

    /// Photo to attach. Repeatable.
    #[arg(long = "photo", value_name = "FILE")]
    pub photos: Vec<PathBuf>,

    /// Relative contact as key=value pairs, e.g.
    /// `name=Sam,relationship=brother,phone=555-0100`. Repeatable.
    #[arg(long = "relative", value_name = "SPEC")]
    pub relatives: Vec<RelativeArg>,
}

/// A relative contact parsed from `key=value` pairs.
// TODO: support quoted values so addresses can contain commas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativeArg {
    /// Contact name.
    pub name: String,
    /// Relationship to the missing person.
    pub relationship: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Contact address.
    pub address: String,
}

impl FromStr for RelativeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut relative = Self::default();

        for pair in s.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got {pair:?}"))?;

            match key.trim() {
                "name" => relative.name = value.trim().to_string(),
                "relationship" => relative.relationship = value.trim().to_string(),
                "phone" => relative.phone = value.trim().to_string(),
                "email" => relative.email = value.trim().to_string(),
                "address" => relative.address = value.trim().to_string(),
                other => {
                    return Err(format!(
                        "unknown key {other:?} (expected name, relationship, phone, email, or address)"
                    ));
                }
            }
        }

        if relative.name.is_empty() {
            return Err("a relative needs at least name=...".to_string());
        }
        Ok(relative)
    }
}

/// Parse a calendar date into the wire's naive datetime, at midnight.
fn parse_date(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|e| format!("invalid date {value:?} (expected YYYY-MM-DD): {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_arg_full_spec() {
        let parsed: RelativeArg =
            "name=Sam Doe, relationship=brother, phone=555-0100, email=sam@example.com"
                .parse()
                .unwrap();

        assert_eq!(parsed.name, "Sam Doe");
        assert_eq!(parsed.relationship, "brother");
        assert_eq!(parsed.phone, "555-0100");
        assert_eq!(parsed.email, "sam@example.com");
        assert_eq!(parsed.address, "");
    }

    #[test]
    fn test_relative_arg_requires_name() {
        let err = "relationship=brother".parse::<RelativeArg>().unwrap_err();
        assert!(err.contains("name"));
    }

    #[test]
    fn test_relative_arg_rejects_unknown_key() {
        let err = "name=Sam,nickname=S".parse::<RelativeArg>().unwrap_err();
        assert!(err.contains("nickname"));
    }

    #[test]
    fn test_parse_date_midnight() {
        let parsed = parse_date("2024-03-02").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-02 00:00:00");
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("03/02/2024").is_err());
    }

    #[test]
    fn test_cli_parses_submit() {
        let cli = Cli::parse_from([
            "reunite",
            "submit",
            "--full-name",
            "Jane Doe",
            "--gender",
            "female",
            "--last-seen-date",
            "2024-03-02",
            "--relative",
            "name=Sam,relationship=brother",
        ]);

        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.full_name, "Jane Doe");
        assert_eq!(args.gender, Some(Gender::Female));
        assert_eq!(args.relatives.len(), 1);
        assert_eq!(args.relatives[0].name, "Sam");
    }
}
