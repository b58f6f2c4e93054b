use chrono::{DateTime, Local};
use colored::Color;
use serde::{Deserialize, Serialize};

pub const NO_FIX_PLACEHOLDER: &str = "no fix available";
pub const NO_DESCRIPTION_PLACEHOLDER: &str = "no description";

/// Risk tier of a finding. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Unknown,
    ];

    /// Anything the scanner emits that we don't recognize counts as UNKNOWN.
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "CRITICAL" => Severity::Critical,
            "HIGH" => Severity::High,
            "MEDIUM" => Severity::Medium,
            "LOW" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Unknown => "UNKNOWN",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Severity::Critical => Color::BrightRed,
            Severity::High => Color::Yellow,
            Severity::Medium => Color::BrightYellow,
            Severity::Low => Color::Cyan,
            Severity::Unknown => Color::BrightBlack,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One normalized vulnerability finding. The same CVE may legitimately
/// appear once per (target, package) it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnRecord {
    pub id: Option<String>,
    pub package: String,
    pub installed_version: String,
    /// None means no patched version is published. A real state, not an error.
    pub fixed_version: Option<String>,
    pub severity: Severity,
    pub description: Option<String>,
    pub target: String,
    pub target_type: String,
}

impl VulnRecord {
    pub fn is_fixable(&self) -> bool {
        self.fixed_version.is_some()
    }

    pub fn id_display(&self) -> &str {
        self.id.as_deref().unwrap_or("-")
    }

    pub fn fixed_version_display(&self) -> &str {
        self.fixed_version.as_deref().unwrap_or(NO_FIX_PLACEHOLDER)
    }

    pub fn description_display(&self) -> &str {
        self.description.as_deref().unwrap_or(NO_DESCRIPTION_PLACEHOLDER)
    }
}

/// Everything one scan produced, in the scanner's emission order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub image: String,
    pub scanned_at: DateTime<Local>,
    pub records: Vec<VulnRecord>,
}
