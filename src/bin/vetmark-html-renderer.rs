use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{Parser as ClapParser, ValueEnum};

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

#[derive(ClapParser)]
#[command(version, about, long_about=None)]
struct Cli {
    /// an input report file (reads from stdin if not specified)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// an output html file (writes to stdout if not specified)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// theme, light or dark
    #[arg(short, long, value_name = "THEME", default_value = "light")]
    theme: String,
    /// input is already markdown, skip normalization
    #[arg(long)]
    markdown: bool,
    /// heading policy for normalization
    #[arg(long, value_enum, default_value = "keyword")]
    policy: PolicyArg,
    /// keyword locale for normalization
    #[arg(long, value_enum, default_value = "english")]
    locale: LocaleArg,

    /// debug log file
    #[arg(short, long, value_name = "FILE")]
    debuglogfile: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

use vetmark::normalizer::{HeadingPolicy, KeywordLocale, NormalizeOptions, ReportNormalizer};

use clap_verbosity_flag::{InfoLevel, Verbosity};
use pulldown_cmark::{html, Options, Parser};
use std::fs::File;

const REPORT_CSS: &str = include_str!("../../assets/vetmark-report.css");

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

fn page_title(markdown: &str) -> String {
    markdown
        .lines()
        .next()
        .and_then(|line| line.trim().strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| "Diagnostic Report".to_string())
}

fn render_html(markdown: &str, theme: &str) -> Result<String, Box<dyn std::error::Error>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    let parser = Parser::new_ext(markdown, options);

    let mut body = String::new();
    html::push_html(&mut body, parser);

    let theme_class = match theme {
        "dark" => "theme-dark",
        _ => "theme-light",
    };
    let title = page_title(markdown);
    let title = html_escape::encode_text(&title);

    let mut buf = Vec::new();
    write!(
        buf,
        r#"<!DOCTYPE html>
<html lang="en" class="{theme_class}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>
{REPORT_CSS}
</style>
</head>
<body>
<div class="vetmark-container">
"#
    )?;
    buf.write_all(body.as_bytes())?;
    write!(buf, "</div>\n</body>\n</html>\n")?;
    Ok(String::from_utf8(buf)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logger(args.verbose.log_level_filter(), args.debuglogfile);

    let text = match &args.file {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let markdown = if args.markdown {
        text
    } else {
        let policy = match args.policy {
            PolicyArg::Keyword => HeadingPolicy::Keyword,
            PolicyArg::Flat => HeadingPolicy::Flat,
        };
        let locale = match args.locale {
            LocaleArg::English => KeywordLocale::English,
            LocaleArg::Hindi => KeywordLocale::Hindi,
        };
        let normalize_options = NormalizeOptions::new(policy).with_locale(locale);
        let normalizer = ReportNormalizer::new(normalize_options);

        let input_name = args
            .file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdin".to_string());
        let output_name = args
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "stdout".to_string());
        normalizer.normalize(&text, &input_name, &output_name).markdown
    };

    let html_content = render_html(&markdown, &args.theme)?;

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            write!(writer, "{}", html_content)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            writer.write_all(html_content.as_bytes())?;
            writer.flush()?;
        }
    }

    Ok(())
}
