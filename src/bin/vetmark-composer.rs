//! vetmark-composer - Compose a diagnostic report from model verdicts
//!
//! Usage:
//!   vetmark-composer -c case.json                  # Raw report text
//!   vetmark-composer -c case.json --normalize      # Normalized markdown
//!   vetmark-composer -c case.json --forecast forecast.json --current current.json
//!   vetmark-composer -c case.json -n -o report.md

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use vetmark::climate::{self, CurrentConditions, ForecastReading};
use vetmark::compose::{compose_report, CaseFile};
use vetmark::normalizer::{HeadingPolicy, KeywordLocale, NormalizeOptions, ReportNormalizer};

#[derive(ValueEnum, Clone, Debug)]
enum PolicyArg {
    /// Pick heading levels from the keyword rule table
    Keyword,
    /// Every section marker becomes an h2 heading
    Flat,
}

#[derive(ValueEnum, Clone, Debug)]
enum LocaleArg {
    /// English rule table
    English,
    /// Hindi rule table
    Hindi,
}

#[derive(Parser)]
#[command(name = "vetmark-composer")]
#[command(about = "Compose a diagnostic report from model verdicts and case data")]
#[command(version)]
struct Cli {
    /// Case file with model verdicts and features (JSON)
    #[arg(short, long, value_name = "CASE_FILE")]
    case: PathBuf,

    /// Forecast payload to derive climate features from (JSON)
    #[arg(long, value_name = "FILE")]
    forecast: Option<PathBuf>,

    /// Current-conditions payload to derive climate features from (JSON)
    #[arg(long, value_name = "FILE")]
    current: Option<PathBuf>,

    /// Normalize the composed report to markdown
    #[arg(short, long)]
    normalize: bool,

    /// Heading policy for normalization
    #[arg(long, value_enum, default_value = "keyword")]
    policy: PolicyArg,

    /// Keyword locale for normalization
    #[arg(long, value_enum, default_value = "english")]
    locale: LocaleArg,

    /// Output file (writes to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Provider forecast envelope, readings under "list"
#[derive(serde::Deserialize)]
struct ForecastFile {
    list: Vec<ForecastReading>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let case_text = fs::read_to_string(&cli.case)
        .with_context(|| format!("failed to read case file {}", cli.case.display()))?;
    let case: CaseFile = serde_json::from_str(&case_text)
        .with_context(|| format!("failed to parse case file {}", cli.case.display()))?;

    let mut features = case.features.clone();

    if let Some(path) = &cli.current {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read current conditions {}", path.display()))?;
        let current: CurrentConditions = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse current conditions {}", path.display()))?;
        climate::fill_from_current(&mut features, &current);
        log::info!("filled climate features from current conditions");
    }

    if let Some(path) = &cli.forecast {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read forecast {}", path.display()))?;
        let forecast: ForecastFile = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse forecast {}", path.display()))?;
        match climate::summarize_forecast(&forecast.list) {
            Some(summary) => {
                log::info!(
                    "forecast summary: {} day(s), {} wet",
                    summary.forecast_days,
                    summary.wet_days
                );
                climate::fill_from_forecast(&mut features, &summary);
            }
            None => log::warn!("forecast file {} has no readings", path.display()),
        }
    }

    let report = compose_report(&case.findings, &features, &case.context);

    let output = if cli.normalize {
        let policy = match cli.policy {
            PolicyArg::Keyword => HeadingPolicy::Keyword,
            PolicyArg::Flat => HeadingPolicy::Flat,
        };
        let locale = match cli.locale {
            LocaleArg::English => KeywordLocale::English,
            LocaleArg::Hindi => KeywordLocale::Hindi,
        };
        let options = NormalizeOptions::new(policy).with_locale(locale);
        let normalizer = ReportNormalizer::new(options);

        let input_name = cli.case.display().to_string();
        let output_name = cli
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string());
        normalizer
            .normalize(&report, &input_name, &output_name)
            .markdown
    } else {
        report
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            log::info!("report written to {}", path.display());
        }
        None => println!("{}", output),
    }

    Ok(())
}
