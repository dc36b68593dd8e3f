// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! sqlscope CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::json;
use sqlscope_detector::{BatchReport, Detector, DetectorConfig, Issue, detect_batch};
use sqlscope_ir::Dialect;
use sqlscope_rules::{RuleSpec, Severity};
use sqlscope_semantic::QueryMetadata;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sqlscope")]
#[command(author, version, about = "Structural analysis for SQL queries", long_about = None)]
struct Cli {
    /// SQL files to analyze; reads stdin when none are given
    files: Vec<PathBuf>,

    /// SQL dialect (generic, mysql, postgresql, snowflake, ...)
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Config file (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Print query metadata as JSON instead of issues
    #[arg(long)]
    metadata: bool,

    /// Per-input analysis deadline in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Minimum severity to report
    #[arg(long = "min-severity", value_name = "LEVEL")]
    min_severity: Option<Severity>,

    /// Disable a rule (can be used multiple times)
    #[arg(long = "disable", value_name = "RULE")]
    disable: Vec<String>,

    /// List the available rules and exit
    #[arg(long = "list-rules")]
    list_rules: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One analyzed input
struct Input {
    label: String,
    sql: String,
}

#[derive(Serialize)]
struct FileIssues<'a> {
    file: &'a str,
    issues: &'a [Issue],
}

#[derive(Serialize)]
struct FileMetadata<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<QueryMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to install log subscriber: {e}");
    }

    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let dialect = config.dialect;
    let deadline = config.timeout();
    let format = cli.format;
    let detector = Arc::new(Detector::new(config));

    if cli.list_rules {
        print_rules(&detector, format)?;
        return Ok(ExitCode::SUCCESS);
    }

    let inputs = read_inputs(&cli.files)?;
    tracing::info!(inputs = inputs.len(), %dialect, "Analyzing");

    if cli.metadata {
        let results: Vec<FileMetadata> = inputs
            .iter()
            .map(|input| match detector.extract_metadata(&input.sql, dialect) {
                Ok(metadata) => FileMetadata {
                    file: &input.label,
                    metadata: Some(metadata),
                    error: None,
                },
                Err(e) => FileMetadata {
                    file: &input.label,
                    metadata: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(ExitCode::SUCCESS);
    }

    let sources = inputs.iter().map(|input| input.sql.clone()).collect();
    let reports = detect_batch(Arc::clone(&detector), sources, dialect, deadline).await;
    print_reports(&inputs, &reports, format)?;
    Ok(ExitCode::SUCCESS)
}

/// Config file values, then CLI overrides
fn load_config(cli: &Cli) -> Result<DetectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DetectorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DetectorConfig::default(),
    };
    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }
    if let Some(severity) = cli.min_severity {
        config.min_severity = severity;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.disabled_rules.extend(cli.disable.iter().cloned());
    config.validate()?;
    Ok(config)
}

fn read_inputs(files: &[PathBuf]) -> Result<Vec<Input>> {
    if files.is_empty() {
        let mut sql = String::new();
        io::stdin()
            .read_to_string(&mut sql)
            .context("reading stdin")?;
        return Ok(vec![Input {
            label: "<stdin>".to_string(),
            sql,
        }]);
    }
    files
        .iter()
        .map(|path| {
            let sql = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Ok(Input {
                label: path.display().to_string(),
                sql,
            })
        })
        .collect()
}

fn print_reports(inputs: &[Input], reports: &[BatchReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let files: Vec<FileIssues> = inputs
                .iter()
                .zip(reports)
                .map(|(input, report)| FileIssues {
                    file: &input.label,
                    issues: &report.issues,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&files)?);
        }
        OutputFormat::Text => {
            for (input, report) in inputs.iter().zip(reports) {
                if report.issues.is_empty() {
                    println!("{}: no issues", input.label);
                    continue;
                }
                let penalty: u32 = report.issues.iter().map(|i| i.penalty).sum();
                println!(
                    "{}: {} issue(s), penalty {}",
                    input.label,
                    report.issues.len(),
                    penalty
                );
                for issue in &report.issues {
                    println!("  {issue}");
                    if !issue.suggestion.is_empty() {
                        println!("    suggestion: {}", issue.suggestion);
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_rules(detector: &Detector, format: OutputFormat) -> Result<()> {
    let rules: Vec<&RuleSpec> = detector.registry().iter().collect();
    match format {
        OutputFormat::Json => {
            let listing: Vec<_> = rules
                .iter()
                .map(|rule| {
                    json!({
                        "id": rule.id,
                        "name": rule.name,
                        "severity": rule.severity,
                        "category": rule.category,
                        "penalty": rule.penalty,
                        "dialects": rule.dialects,
                        "description": rule.description,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            for rule in rules {
                let dialects = if rule.dialects.is_empty() {
                    "all".to_string()
                } else {
                    rule.dialects
                        .iter()
                        .map(Dialect::as_str)
                        .collect::<Vec<_>>()
                        .join(",")
                };
                println!(
                    "{:<14} {:<12} {:>3}  {:<12} {:<40} [{}]",
                    rule.id,
                    rule.severity.as_str(),
                    rule.penalty,
                    rule.category.as_str(),
                    rule.name,
                    dialects
                );
            }
        }
    }
    Ok(())
}
