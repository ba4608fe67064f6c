use crate::analyzers::{build_dashboard, correlation_matrix, DashboardRequest, DatasetAnalyzer};
use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::loader::{DatasetCache, LoadedDataset};
use crate::models::{weekday_name, CleanedRecord};
use crate::readers::StationFileReader;
use crate::utils::filename::generate_default_report_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};

/// Settings plus the dataset cache shared by everything a command does.
struct Session {
    config: AppConfig,
    cache: DatasetCache,
    quiet: bool,
}

impl Session {
    fn new(config: AppConfig, quiet: bool) -> Self {
        let reader = StationFileReader::with_mmap(config.use_mmap);
        Self {
            config,
            cache: DatasetCache::with_reader(reader),
            quiet,
        }
    }

    fn dataset(&mut self, input: Option<PathBuf>) -> Result<Arc<LoadedDataset>> {
        let path = input.unwrap_or_else(|| self.config.dataset_path.clone());
        let progress =
            ProgressReporter::new_spinner(&format!("Loading {}...", path.display()), self.quiet);

        let dataset = self
            .cache
            .get_or_load(&path)
            .with_context(|| format!("Failed to load dataset from {}", path.display()))?;

        progress.finish_and_clear();
        debug!(
            hits = self.cache.hits(),
            misses = self.cache.misses(),
            "Dataset cache state"
        );
        Ok(dataset)
    }
}

fn init_logging(verbose: bool, level: &str) {
    let level = if verbose {
        Level::DEBUG
    } else {
        level.parse::<Level>().unwrap_or(Level::INFO)
    };

    // stderr keeps stdout clean for JSON output
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
    {
        debug!("Keeping the existing tracing subscriber: {}", err);
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(cli.verbose, &config.log_level);

    match cli.command {
        Commands::Clean { input, json } => {
            let mut session = Session::new(config, json);
            let dataset = session.dataset(input)?;

            if json {
                JsonWriter::new().write_to_stdout(&dataset.report)?;
            } else {
                println!("{}", dataset.report.generate_summary());
                println!("Cleaned table: {} rows, no missing values", dataset.table.len());
            }
        }

        Commands::Summary { input, sample } => {
            let sample = sample.unwrap_or(config.sample_size);
            let mut session = Session::new(config, false);
            let dataset = session.dataset(input)?;

            let stats = DatasetAnalyzer::new().analyze(&dataset.table)?;
            println!("{}", stats.detailed_summary());

            if sample > 0 {
                println!("Sample Records (showing {} records):", sample);
                for (i, record) in dataset.table.iter().take(sample).enumerate() {
                    println!("{}. {}", i + 1, format_record(record));
                }
            }
        }

        Commands::Dashboard {
            input,
            pollutant,
            weekdays,
            json,
            output,
        } => {
            let pollutant = pollutant.unwrap_or(config.default_pollutant);
            let request = DashboardRequest::new(pollutant, weekdays)
                .with_correlation_columns(config.correlation_columns.clone());

            let mut session = Session::new(config, json);
            let dataset = session.dataset(input)?;
            let report = build_dashboard(&dataset.table, &request)?;

            let writer = JsonWriter::new();
            if json {
                writer.write_to_stdout(&report)?;
            } else {
                println!("{}", report.render_text());
            }

            if let Some(path) = output {
                let path = path.unwrap_or_else(generate_default_report_filename);
                writer.write_to_path(&report, &path)?;
                if !json {
                    println!("Report written to {}", path.display());
                }
            }
        }

        Commands::Correlation {
            input,
            columns,
            json,
        } => {
            let columns = if columns.is_empty() {
                config.correlation_columns.clone()
            } else {
                columns
            };

            let mut session = Session::new(config, json);
            let dataset = session.dataset(input)?;
            let matrix = correlation_matrix(&dataset.table, &columns)?;

            if json {
                JsonWriter::new().write_to_stdout(&matrix)?;
            } else {
                println!("Pearson correlation over {} rows:", dataset.table.len());
                println!("{}", matrix.render_table());
            }
        }
    }

    Ok(())
}

fn format_record(record: &CleanedRecord) -> String {
    let values = record
        .values
        .iter()
        .map(|(m, v)| format!("{}={:.1}", m, v))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        "{} ({}) {}",
        record.timestamp,
        weekday_name(record.day_of_week).unwrap_or("?"),
        values
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_tolerates_existing_subscriber() {
        init_logging(false, "info");
        init_logging(true, "not-a-level");
    }
}
