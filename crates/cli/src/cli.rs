//! Command-line definitions for the `vantage` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// `vantage` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vantage",
    about = "Command-line client for the Vantage analytics platform",
    version
)]
pub struct Cli {
    /// Enable verbose (debug) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subscription id override. Falls back to `VANTAGE_SUBSCRIPTION_ID`.
    #[arg(long, global = true, value_name = "id")]
    pub subscription: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Segment management
    #[command(subcommand)]
    Segment(SegmentAction),

    /// Query visitors, accounts, or activity
    #[command(subcommand)]
    Query(QueryAction),

    /// Export data to a file
    Export(ExportArgs),
}

#[derive(Debug, Clone, Subcommand)]
pub enum SegmentAction {
    /// List all segments
    List,

    /// Create a new segment
    Create {
        /// Segment name
        #[arg(long)]
        name: String,
        /// Segment description
        #[arg(long)]
        description: Option<String>,
    },

    /// Update an existing segment
    Update {
        /// Segment id to update
        segment_id: String,
        /// New segment name
        #[arg(long)]
        name: Option<String>,
        /// New segment description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a segment
    Delete {
        /// Segment id to delete
        segment_id: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum QueryAction {
    /// Query visitor records
    Visitors(WindowArgs),

    /// Query account records
    Accounts(WindowArgs),

    /// Run an activity aggregation grouped by one or more fields
    Activity {
        #[command(flatten)]
        window: WindowArgs,
        /// Comma-separated group-by fields (ordering sets column order)
        #[arg(long, value_name = "field,field", value_delimiter = ',', required = true)]
        group_by: Vec<String>,
    },

    /// Unique visitors with activity in the last N days
    Wau {
        /// Window size in days (clamped to 1..=365)
        #[arg(long, default_value_t = 7, value_name = "N")]
        last_days: i64,
    },

    /// Total count for a named track event
    Events {
        /// Track event name
        #[arg(long, value_name = "name")]
        event_name: String,
        /// Start date YYYY-MM-DD
        #[arg(long, value_name = "date")]
        from_date: String,
        /// End date YYYY-MM-DD
        #[arg(long, value_name = "date")]
        to_date: String,
        /// Filter by visitor country code, e.g. US
        #[arg(long, value_name = "code")]
        country: Option<String>,
    },
}

#[derive(Debug, Clone, Args)]
pub struct WindowArgs {
    /// Relative window: the last N days
    #[arg(long, value_name = "N", conflicts_with_all = ["from_date", "to_date"])]
    pub last_days: Option<i64>,

    /// Explicit window start YYYY-MM-DD
    #[arg(long, value_name = "date", requires = "to_date")]
    pub from_date: Option<String>,

    /// Explicit window end YYYY-MM-DD
    #[arg(long, value_name = "date", requires = "from_date")]
    pub to_date: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// What to export
    #[arg(value_enum)]
    pub target: ExportTarget,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Output file path
    #[arg(long, value_name = "path")]
    pub output: std::path::PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Segments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_segment_create() {
        let cli = Cli::try_parse_from([
            "vantage",
            "segment",
            "create",
            "--name",
            "Power Users",
            "--description",
            "weekly active",
        ])
        .expect("parse");

        match cli.command {
            Commands::Segment(SegmentAction::Create { name, description }) => {
                assert_eq!(name, "Power Users");
                assert_eq!(description.as_deref(), Some("weekly active"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_activity_group_by_list() {
        let cli = Cli::try_parse_from([
            "vantage",
            "query",
            "activity",
            "--last-days",
            "7",
            "--group-by",
            "day,eventName",
        ])
        .expect("parse");

        match cli.command {
            Commands::Query(QueryAction::Activity { group_by, window }) => {
                assert_eq!(group_by, vec!["day".to_string(), "eventName".to_string()]);
                assert_eq!(window.last_days, Some(7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn window_forms_conflict() {
        let result = Cli::try_parse_from([
            "vantage",
            "query",
            "visitors",
            "--last-days",
            "7",
            "--from-date",
            "2026-01-01",
            "--to-date",
            "2026-02-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn export_defaults_to_json() {
        let cli = Cli::try_parse_from([
            "vantage", "export", "segments", "--output", "out.json",
        ])
        .expect("parse");

        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.target, ExportTarget::Segments);
                assert_eq!(args.format, ExportFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
