//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_operations_writer::CsvOperationsWriter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_report_source::FileReportSource;
use crate::domain::config_validation::{build_convert_config, delimiter_byte, ConvertConfig};
use crate::domain::error::ReportError;
use crate::domain::format::parse_format_choice;
use crate::domain::pipeline::{mt_report, parse_report, tables_from_report, ParsedReport};
use crate::domain::schema::concat;
use crate::ports::operations_sink::OperationsSink;
use crate::ports::report_source::ReportSource;

#[derive(Parser, Debug)]
#[command(
    name = "btreport",
    about = "Normalize MT and GBX backtest HTML reports into one closed-trade table"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert one report to canonical CSV
    Convert {
        report: PathBuf,
        /// auto, mt or gbx
        #[arg(short, long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        delimiter: Option<char>,
    },
    /// Convert several reports into one CSV
    Combine {
        #[arg(required = true)]
        reports: Vec<PathBuf>,
        #[arg(short, long)]
        format: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the header of an MT report
    Header { report: PathBuf },
    /// Print the shape of every raw table in a report
    Tables { report: PathBuf },
    /// Validate a configuration file
    ValidateConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Convert {
            report,
            format,
            output,
            config,
            delimiter,
        } => resolve_config(config.as_ref(), format.as_deref(), output, delimiter)
            .and_then(|cfg| run_convert(&report, &cfg)),
        Command::Combine {
            reports,
            format,
            output,
            config,
        } => resolve_config(config.as_ref(), format.as_deref(), output, None)
            .and_then(|cfg| run_combine(&reports, &cfg)),
        Command::Header { report } => run_header(&report),
        Command::Tables { report } => run_tables(&report),
        Command::ValidateConfig { config } => run_validate_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ReportError> {
    FileConfigAdapter::from_file(path)
}

/// Config file values, overridden by command-line flags.
pub fn resolve_config(
    config_path: Option<&PathBuf>,
    format: Option<&str>,
    output: Option<PathBuf>,
    delimiter: Option<char>,
) -> Result<ConvertConfig, ReportError> {
    let mut cfg = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            build_convert_config(&load_config(path)?)?
        }
        None => ConvertConfig::default(),
    };

    if let Some(f) = format {
        cfg.format = parse_format_choice(f).map_err(|e| ReportError::ConfigInvalid {
            section: "convert".into(),
            key: "format".into(),
            reason: e.to_string(),
        })?;
    }
    if output.is_some() {
        cfg.output = output;
    }
    if let Some(d) = delimiter {
        cfg.delimiter = delimiter_byte(d)?;
    }
    Ok(cfg)
}

fn load_report(path: &Path, cfg: &ConvertConfig) -> Result<ParsedReport, ReportError> {
    let content = FileReportSource::new().read_report(path)?;
    parse_report(&content, cfg.format, &cfg.coercion)
}

fn open_output(output: Option<&PathBuf>) -> Result<Box<dyn Write>, ReportError> {
    Ok(match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn print_header(report: &ParsedReport) {
    if let Some(header) = &report.header {
        for (key, value) in header.entries() {
            eprintln!("  {key:<14} {value}");
        }
    }
}

pub fn run_convert(report_path: &Path, cfg: &ConvertConfig) -> Result<(), ReportError> {
    eprintln!("Reading report {}", report_path.display());
    let report = load_report(report_path, cfg)?;
    eprintln!(
        "{} report: {} operations",
        report.format,
        report.operations.len()
    );
    if cfg.include_header {
        print_header(&report);
    }

    let mut out = open_output(cfg.output.as_ref())?;
    CsvOperationsWriter::new(cfg.delimiter).write(&report.operations, &mut out)?;
    if let Some(path) = &cfg.output {
        eprintln!("Operations written to: {}", path.display());
    }
    Ok(())
}

pub fn run_combine(report_paths: &[PathBuf], cfg: &ConvertConfig) -> Result<(), ReportError> {
    let mut tables = Vec::with_capacity(report_paths.len());
    for path in report_paths {
        eprintln!("Reading report {}", path.display());
        let report = load_report(path, cfg)?;
        eprintln!(
            "  {} report: {} operations",
            report.format,
            report.operations.len()
        );
        tables.push(report.operations);
    }

    let combined = concat(tables)?;
    eprintln!("Combined: {} operations", combined.len());

    let mut out = open_output(cfg.output.as_ref())?;
    CsvOperationsWriter::new(cfg.delimiter).write(&combined, &mut out)?;
    if let Some(path) = &cfg.output {
        eprintln!("Operations written to: {}", path.display());
    }
    Ok(())
}

fn run_header(report_path: &Path) -> Result<(), ReportError> {
    let content = FileReportSource::new().read_report(report_path)?;
    let report = mt_report(&content)?;
    for (key, value) in report.header.entries() {
        println!("{key}\t{value}");
    }
    Ok(())
}

fn run_tables(report_path: &Path) -> Result<(), ReportError> {
    let content = FileReportSource::new().read_report(report_path)?;
    let tables = tables_from_report(&content)?;
    eprintln!("{} table(s) in {}", tables.len(), report_path.display());
    for (i, table) in tables.iter().enumerate() {
        println!("table {i}: {} rows x {} cells", table.len(), table.width());
    }
    Ok(())
}

fn run_validate_config(config_path: &Path) -> Result<(), ReportError> {
    eprintln!("Validating config: {}", config_path.display());
    let cfg = build_convert_config(&load_config(config_path)?)?;
    eprintln!(
        "  format:    {}",
        cfg.format
            .map(|f| f.to_string())
            .unwrap_or_else(|| "auto".to_string())
    );
    eprintln!(
        "  output:    {}",
        cfg.output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string())
    );
    eprintln!("  delimiter: {:?}", cfg.delimiter as char);
    eprintln!(
        "  thousands separator: {:?}",
        cfg.coercion.thousands_separator
    );
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
