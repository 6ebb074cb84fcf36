//! Diagnostic report composition

use serde::{Deserialize, Serialize};

/// Report title emitted as a bold-delimited line, so the default
/// normalizer policy promotes it to h1
pub const REPORT_TITLE: &str = "Lumpy Skin Disease Diagnostic Report";

/// Verdict of one prediction model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Disease detected
    Lumpy,
    /// No disease detected
    NotLumpy,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Lumpy => write!(f, "Lumpy"),
            Verdict::NotLumpy => write!(f, "Not Lumpy"),
        }
    }
}

/// Model verdicts for one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFindings {
    /// Clinical (tabular) model verdict
    pub clinical: Verdict,
    /// Image model verdict
    pub image: Verdict,
}

/// Clinical and climate inputs of one case, all optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseFeatures {
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub cloud_cover: Option<f64>,
    #[serde(default)]
    pub evapotranspiration: Option<f64>,
    #[serde(default)]
    pub precipitation: Option<f64>,
    #[serde(default)]
    pub min_temp: Option<f64>,
    #[serde(default)]
    pub mean_temp: Option<f64>,
    #[serde(default)]
    pub max_temp: Option<f64>,
    #[serde(default)]
    pub vapour_pressure: Option<f64>,
    #[serde(default)]
    pub wet_day_freq: Option<f64>,
}

impl CaseFeatures {
    /// Features with their report labels, in report order
    pub fn labeled(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("Longitude", self.longitude),
            ("Latitude", self.latitude),
            ("Monthly Cloud Cover", self.cloud_cover),
            ("Potential EvapoTranspiration", self.evapotranspiration),
            ("Precipitation", self.precipitation),
            ("Minimum Temperature", self.min_temp),
            ("Mean Temperature", self.mean_temp),
            ("Maximum Temperature", self.max_temp),
            ("Vapour Pressure", self.vapour_pressure),
            ("Wet Day Frequency", self.wet_day_freq),
        ]
    }
}

/// Optional case context rendered as a trailing section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseContext {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub language: Option<String>,
}

impl CaseContext {
    /// True when no context field is set
    pub fn is_empty(&self) -> bool {
        self.city.is_none() && self.temperature.is_none() && self.language.is_none()
    }
}

/// One case as read from a JSON case file
#[derive(Debug, Clone, Deserialize)]
pub struct CaseFile {
    pub findings: ModelFindings,
    #[serde(default)]
    pub features: CaseFeatures,
    #[serde(default)]
    pub context: CaseContext,
}

/// Compose the raw diagnostic-report preamble for one case.
///
/// The output is plain report text in the shape the normalizer expects:
/// a bold-delimited title followed by inline-bold verdict lines and an
/// input-data section listing every feature. Missing values render as
/// "not available"; present values keep two decimal places.
pub fn compose_report(
    findings: &ModelFindings,
    features: &CaseFeatures,
    context: &CaseContext,
) -> String {
    let mut lines = Vec::new();

    lines.push(bold_line(REPORT_TITLE));
    lines.push(String::new());
    lines.push(bold_field(
        "Clinical Model Prediction",
        &findings.clinical.to_string(),
    ));
    lines.push(bold_field(
        "Image Model Prediction",
        &findings.image.to_string(),
    ));
    lines.push(String::new());
    lines.push(bold_line("Input Data"));
    for (label, value) in features.labeled() {
        lines.push(bullet(&format!("{}: {}", label, format_value(value))));
    }

    if !context.is_empty() {
        lines.push(String::new());
        lines.push(bold_line("Case Context"));
        if let Some(city) = &context.city {
            lines.push(bullet(&format!("Location: {}", city)));
        }
        if let Some(temperature) = context.temperature {
            lines.push(bullet(&format!("Current Temperature: {:.2}°C", temperature)));
        }
        if let Some(language) = &context.language {
            lines.push(bullet(&format!("Report Language: {}", language)));
        }
    }

    lines.join("\n")
}

fn bold_line(text: &str) -> String {
    format!("**{}**", text)
}

fn bold_field(label: &str, value: &str) -> String {
    format!("**{}:** {}", label, value)
}

fn bullet(text: &str) -> String {
    format!("* {}", text)
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "not available".to_string(),
    }
}
