use crate::models::{Pollutant, WeekdaySet};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aq-explorer")]
#[command(about = "Explore hourly air-quality station data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and clean a station file, then report what was repaired
    Clean {
        #[arg(short, long, help = "Station CSV file [default: from config]")]
        input: Option<PathBuf>,

        #[arg(long, help = "Print the cleaning report as JSON")]
        json: bool,
    },

    /// Describe the cleaned dataset
    Summary {
        #[arg(short, long, help = "Station CSV file [default: from config]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Number of sample rows to show [default: from config]")]
        sample: Option<usize>,
    },

    /// Compute the hourly, weekly, correlation and scatter views
    Dashboard {
        #[arg(short, long, help = "Station CSV file [default: from config]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "PM2.5, PM10, SO2, NO2, CO or O3 [default: from config]")]
        pollutant: Option<Pollutant>,

        #[arg(
            short,
            long,
            default_value = "all",
            help = "Weekdays to include, e.g. '0,5,6', 'mon,sat', 'all' or 'none'"
        )]
        weekdays: WeekdaySet,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,

        #[arg(
            short,
            long,
            help = "Write the JSON report to a file [default: output/aq-dashboard-{YYMMDD}.json]"
        )]
        output: Option<Option<PathBuf>>,
    },

    /// Pearson correlation between measurement columns over the full dataset
    Correlation {
        #[arg(short, long, help = "Station CSV file [default: from config]")]
        input: Option<PathBuf>,

        #[arg(
            short,
            long,
            value_delimiter = ',',
            help = "Columns to correlate, e.g. WSPM,PM2.5,O3 [default: from config]"
        )]
        columns: Vec<crate::models::Measurement>,

        #[arg(long, help = "Print the matrix as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dashboard_arguments() {
        let cli = Cli::parse_from([
            "aq-explorer",
            "dashboard",
            "--pollutant",
            "NO2",
            "--weekdays",
            "sat,sun",
            "--json",
        ]);

        match cli.command {
            Commands::Dashboard {
                pollutant,
                weekdays,
                json,
                output,
                ..
            } => {
                assert_eq!(pollutant, Some(Pollutant::No2));
                assert_eq!(weekdays.iter().collect::<Vec<_>>(), vec![5, 6]);
                assert!(json);
                assert!(output.is_none());
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_output_flag_with_and_without_path() {
        let cli = Cli::parse_from(["aq-explorer", "dashboard", "--output"]);
        match cli.command {
            Commands::Dashboard { output, .. } => assert_eq!(output, Some(None)),
            _ => panic!("expected dashboard command"),
        }

        let cli = Cli::parse_from(["aq-explorer", "dashboard", "-o", "out/report.json"]);
        match cli.command {
            Commands::Dashboard { output, .. } => {
                assert_eq!(output, Some(Some(PathBuf::from("out/report.json"))))
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_parse_correlation_columns() {
        let cli = Cli::parse_from(["aq-explorer", "-v", "correlation", "-c", "WSPM,PM2.5"]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Correlation { columns, .. } => assert_eq!(columns.len(), 2),
            _ => panic!("expected correlation command"),
        }
    }

    #[test]
    fn test_rejects_unknown_pollutant() {
        let result = Cli::try_parse_from(["aq-explorer", "dashboard", "--pollutant", "WSPM"]);
        assert!(result.is_err());
    }
}
