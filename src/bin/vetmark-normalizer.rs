//! vetmark-normalizer - Normalize model-generated report text to markdown
//!
//! Usage:
//!   vetmark-normalizer -f report.txt -o report.md
//!   vetmark-normalizer -f report.txt -o report.md --policy flat
//!   vetmark-normalizer -d ./reports -o ./markdown --pattern "*.txt"
//!   cat report.txt | vetmark-normalizer > report.md

use std::fs;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser as ClapParser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

use vetmark::normalizer::{
    HeadingPolicy, KeywordLocale, NormalizeOptions, NormalizeReport, NoteKind, ReportNormalizer,
    RuleTable,
};
use vetmark::scrub::strip_model_fences;

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

#[derive(ValueEnum, Clone, Debug)]
enum ReportFormat {
    /// JSON format
    Json,
    /// Human-readable text
    Text,
}

#[derive(ClapParser)]
#[command(
    version,
    about = "Normalize model-generated report text to markdown",
    long_about = "Normalizes diagnostic report text into markdown with two policies:\n\n\
                  - keyword: pick heading levels from a keyword rule table\n\
                  - flat: every section marker becomes an h2 heading\n\n\
                  If no input file is specified, reads from stdin.\n\
                  If no output file is specified, writes to stdout."
)]
struct Cli {
    /// Input report file (reads from stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Output markdown file (writes to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Heading policy
    #[arg(short, long, value_enum, default_value = "keyword")]
    policy: PolicyArg,

    /// Keyword locale for the builtin rule table
    #[arg(long, value_enum, default_value = "english")]
    locale: LocaleArg,

    /// Custom rule table file (overrides --locale)
    #[arg(long, value_name = "RULES_FILE")]
    rules: Option<PathBuf>,

    /// Strip model code fences before normalizing
    #[arg(long)]
    strip_fences: bool,

    /// Batch normalize directory
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// File pattern for batch normalization
    #[arg(long, default_value = "*.txt")]
    pattern: String,

    /// Generate normalization report
    #[arg(long, value_name = "REPORT_FILE")]
    report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    report_format: ReportFormat,

    /// Dry run (show what would be written without writing)
    #[arg(long)]
    dry_run: bool,

    /// Debug log file
    #[arg(long, value_name = "FILE")]
    debuglogfile: Option<PathBuf>,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

fn init_logger(filter_level: log::LevelFilter, logfile: Option<PathBuf>) {
    let mut loggers = Vec::new();
    if let Some(filename) = logfile {
        loggers.push(simplelog::WriteLogger::new(
            filter_level,
            simplelog::Config::default(),
            File::create(filename).unwrap(),
        ) as Box<dyn simplelog::SharedLogger>)
    }
    simplelog::CombinedLogger::init(loggers).unwrap();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logger(args.verbose.log_level_filter(), args.debuglogfile.clone());
    let verbose = args.verbose.log_level_filter() > log::LevelFilter::Info;

    let policy = match args.policy {
        PolicyArg::Keyword => HeadingPolicy::Keyword,
        PolicyArg::Flat => HeadingPolicy::Flat,
    };
    let locale = match args.locale {
        LocaleArg::English => KeywordLocale::English,
        LocaleArg::Hindi => KeywordLocale::Hindi,
    };

    let table = match &args.rules {
        Some(path) => RuleTable::load(path)?,
        None => RuleTable::builtin(locale),
    };

    let options = NormalizeOptions::new(policy).with_table(table);
    let normalizer = ReportNormalizer::new(options);

    // Handle batch normalization
    if let Some(ref dir) = args.directory {
        return batch_normalize(&normalizer, dir, &args, verbose);
    }

    // Single file normalization
    let (input_content, input_name) = match &args.file {
        Some(path) => (fs::read_to_string(path)?, path.display().to_string()),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (buffer, "stdin".to_string())
        }
    };

    let input_content = if args.strip_fences {
        strip_model_fences(&input_content)
    } else {
        input_content
    };

    let output_name = args
        .output
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());

    // Normalize
    let result = normalizer.normalize(&input_content, &input_name, &output_name);

    // Suspect lines always go to stderr, all notes when verbose
    for note in &result.report.notes {
        if verbose || note.kind == NoteKind::SuspectHeading {
            eprintln!("⚠ {}", note);
        }
    }

    // Dry run - just show report
    if args.dry_run {
        eprintln!("\n{}", result.report.to_text());
        return Ok(());
    }

    // Write output
    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            writer.write_all(result.markdown.as_bytes())?;
            writer.flush()?;

            eprintln!(
                "✓ Normalized {} to {} (policy: {})",
                input_name,
                path.display(),
                result.report.policy
            );

            if result.report.suspect_count() == 0 {
                eprintln!(
                    "✓ {} heading(s) converted across {} line(s)",
                    result.report.statistics.converted_headings,
                    result.report.statistics.total_lines
                );
            } else {
                eprintln!(
                    "✓ {} heading(s) converted with {} suspect line(s)",
                    result.report.statistics.converted_headings,
                    result.report.suspect_count()
                );
            }
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            writer.write_all(result.markdown.as_bytes())?;
            writer.flush()?;
        }
    }

    // Write report if requested
    if let Some(report_path) = args.report {
        write_report(&result.report, &report_path, &args.report_format)?;
        eprintln!("✓ Report written to {}", report_path.display());
    }

    Ok(())
}

fn batch_normalize(
    normalizer: &ReportNormalizer,
    dir: &Path,
    args: &Cli,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = args
        .output
        .as_ref()
        .ok_or("Output directory required for batch normalization")?;

    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }

    let start_time = Instant::now();
    let mut total_files = 0;
    let mut succeeded = 0;
    let mut failed = 0;
    let mut total_notes = 0;
    let mut all_reports = Vec::new();

    // Find all matching files
    let pattern = format!("{}/{}", dir.display(), args.pattern);
    let entries: Vec<_> = glob::glob(&pattern)
        .map_err(|e| format!("Invalid pattern: {}", e))?
        .filter_map(|e| e.ok())
        .collect();

    for entry in entries {
        total_files += 1;

        let input_path = entry.clone();
        let relative = entry
            .strip_prefix(dir)
            .unwrap_or(&entry)
            .with_extension("md");
        let output_path = output_dir.join(relative);

        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        if verbose {
            eprintln!(
                "Normalizing {} -> {}",
                input_path.display(),
                output_path.display()
            );
        }

        let input_content = match fs::read_to_string(&input_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("✗ Failed to read {}: {}", input_path.display(), e);
                failed += 1;
                continue;
            }
        };

        let input_content = if args.strip_fences {
            strip_model_fences(&input_content)
        } else {
            input_content
        };

        let result = normalizer.normalize(
            &input_content,
            &input_path.display().to_string(),
            &output_path.display().to_string(),
        );

        total_notes += result.report.notes.len();
        all_reports.push(result.report.clone());

        if !args.dry_run {
            if let Err(e) = fs::write(&output_path, &result.markdown) {
                eprintln!("✗ Failed to write {}: {}", output_path.display(), e);
                failed += 1;
                continue;
            }
        }

        succeeded += 1;

        if verbose && !result.report.notes.is_empty() {
            for note in &result.report.notes {
                eprintln!("  ⚠ {}", note);
            }
        }
    }

    let duration = start_time.elapsed();

    eprintln!("\nBatch Normalization Summary");
    eprintln!("===========================");
    eprintln!("Files processed: {}", total_files);
    eprintln!("Succeeded:       {}", succeeded);
    eprintln!("Failed:          {}", failed);
    eprintln!("Total notes:     {}", total_notes);
    eprintln!("Duration:        {:?}", duration);

    if args.dry_run {
        eprintln!("\n(Dry run - no files were written)");
    }

    // Write batch report if requested
    if let Some(report_path) = &args.report {
        let batch_report = create_batch_report(
            dir,
            output_dir,
            &all_reports,
            failed,
            duration.as_millis() as u64,
        );

        let report_content = match args.report_format {
            ReportFormat::Json => serde_json::to_string_pretty(&batch_report)?,
            ReportFormat::Text => format_batch_report_text(&batch_report),
        };

        fs::write(report_path, report_content)?;
        eprintln!("✓ Report written to {}", report_path.display());
    }

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn write_report(
    report: &NormalizeReport,
    path: &Path,
    format: &ReportFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Text => report.to_text(),
    };
    fs::write(path, content)?;
    Ok(())
}

#[derive(serde::Serialize)]
struct BatchReport {
    input_directory: String,
    output_directory: String,
    files_processed: usize,
    files_succeeded: usize,
    files_failed: usize,
    total_notes: usize,
    duration_ms: u64,
    files: Vec<FileReport>,
}

#[derive(serde::Serialize)]
struct FileReport {
    input: String,
    output: String,
    converted_headings: usize,
    suspect_lines: usize,
    duration_ms: u64,
}

fn create_batch_report(
    input_dir: &Path,
    output_dir: &Path,
    reports: &[NormalizeReport],
    failed: usize,
    duration_ms: u64,
) -> BatchReport {
    let files: Vec<FileReport> = reports
        .iter()
        .map(|r| FileReport {
            input: r.input_name.clone(),
            output: r.output_name.clone(),
            converted_headings: r.statistics.converted_headings,
            suspect_lines: r.suspect_count(),
            duration_ms: r.duration_ms,
        })
        .collect();

    let total_notes: usize = reports.iter().map(|r| r.notes.len()).sum();

    BatchReport {
        input_directory: input_dir.display().to_string(),
        output_directory: output_dir.display().to_string(),
        files_processed: reports.len() + failed,
        files_succeeded: reports.len(),
        files_failed: failed,
        total_notes,
        duration_ms,
        files,
    }
}

fn format_batch_report_text(report: &BatchReport) -> String {
    let mut output = String::new();

    output.push_str("Batch Normalization Report\n");
    output.push_str("==========================\n");
    output.push_str(&format!("Input directory:  {}\n", report.input_directory));
    output.push_str(&format!("Output directory: {}\n", report.output_directory));
    output.push_str(&format!("Duration:         {}ms\n\n", report.duration_ms));

    output.push_str("Summary\n");
    output.push_str("-------\n");
    output.push_str(&format!("Files processed:  {}\n", report.files_processed));
    output.push_str(&format!("Succeeded:        {}\n", report.files_succeeded));
    output.push_str(&format!("Failed:           {}\n", report.files_failed));
    output.push_str(&format!("Total notes:      {}\n\n", report.total_notes));

    output.push_str("Files\n");
    output.push_str("-----\n");
    for file in &report.files {
        let status_icon = if file.suspect_lines == 0 { "✓" } else { "⚠" };
        output.push_str(&format!(
            "{} {} -> {} ({} headings, {} suspect, {}ms)\n",
            status_icon,
            file.input,
            file.output,
            file.converted_headings,
            file.suspect_lines,
            file.duration_ms
        ));
    }

    output
}
