// insights/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "insights")]
#[command(about = "Profiles game analytics exports: schema, roles, quality and alerts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// More logs on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📊 Full analysis of a data file (types, roles, template, quality, KPIs)
    Analyze {
        /// CSV, TSV, JSON, NDJSON or Parquet file
        file: PathBuf,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also write the report to <target>/reports/<dataset>.json
        #[arg(long)]
        save: bool,
    },

    /// ✅ Data-quality score and issues for a file
    Quality {
        file: PathBuf,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Exit with an error when the score is below this value
        #[arg(long)]
        min_score: Option<u8>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 🧩 Lists engine templates, or ranks them against a file
    Templates {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Rank the templates against this file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// 🔎 Analyses every supported file of the data directory
    Scan {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Data directory relative to the project (default: `data-path` from config)
        #[arg(long)]
        data_dir: Option<String>,

        /// Exit with an error when any file scores below this value
        #[arg(long)]
        min_score: Option<u8>,

        /// Files analysed at the same time
        #[arg(long, default_value = "4")]
        concurrency: usize,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 🔔 Alert rules and raised alerts
    Alerts {
        #[arg(long, default_value = ".", global = true)]
        project_dir: PathBuf,

        #[command(subcommand)]
        action: AlertAction,
    },

    /// 🧹 Cleans generated artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum AlertAction {
    /// Analyse a file and evaluate the alert rules against its metrics
    Check { file: PathBuf },

    /// Show stored alerts
    List {
        /// active | acknowledged | resolved | dismissed
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark an alert as seen
    Ack { id: String },

    Resolve { id: String },

    Dismiss { id: String },

    /// Drop closed alerts older than the retention period
    Prune,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_analyze_defaults() -> Result<()> {
        let args = Cli::parse_from(["insights", "analyze", "events.csv"]);
        match args.command {
            Commands::Analyze {
                file,
                project_dir,
                format,
                save,
            } => {
                assert_eq!(file.to_string_lossy(), "events.csv");
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert_eq!(format, OutputFormat::Table);
                assert!(!save);
                Ok(())
            }
            _ => bail!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_quality_gate() -> Result<()> {
        let args = Cli::parse_from([
            "insights",
            "quality",
            "events.csv",
            "--min-score",
            "80",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::Quality {
                min_score, format, ..
            } => {
                assert_eq!(min_score, Some(80));
                assert_eq!(format, OutputFormat::Json);
                Ok(())
            }
            _ => bail!("Expected Quality command"),
        }
    }

    #[test]
    fn test_cli_parse_alerts_with_global_project_dir() -> Result<()> {
        let args = Cli::parse_from(["insights", "-vv", "alerts", "ack", "1234", "--project-dir", "/tmp/p"]);
        assert_eq!(args.verbose, 2);
        match args.command {
            Commands::Alerts {
                project_dir,
                action,
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp/p");
                assert_eq!(action, AlertAction::Ack { id: "1234".into() });
                Ok(())
            }
            _ => bail!("Expected Alerts command"),
        }
    }

    #[test]
    fn test_cli_parse_scan() -> Result<()> {
        let args = Cli::parse_from(["insights", "scan", "--data-dir", "exports", "--concurrency", "2"]);
        match args.command {
            Commands::Scan {
                data_dir,
                concurrency,
                min_score,
                ..
            } => {
                assert_eq!(data_dir.as_deref(), Some("exports"));
                assert_eq!(concurrency, 2);
                assert_eq!(min_score, None);
                Ok(())
            }
            _ => bail!("Expected Scan command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["insights", "analyze", "f.csv", "--format", "xml"]).is_err());
    }
}
