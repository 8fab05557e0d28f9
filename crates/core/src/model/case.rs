use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

//
// ─── ANALYSIS TYPE ─────────────────────────────────────────────────────────────
//

/// Method the backend uses to analyze a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnalysisType {
    /// Issue, Rule, Application, Conclusion.
    #[default]
    Irac,
    Brief,
    Summary,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 3] = [Self::Irac, Self::Brief, Self::Summary];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Irac => "irac",
            Self::Brief => "brief",
            Self::Summary => "summary",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Irac => "IRAC Method",
            Self::Brief => "Case Brief",
            Self::Summary => "Summary",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown analysis type: {0}")]
pub struct UnknownAnalysisType(pub String);

impl FromStr for AnalysisType {
    type Err = UnknownAnalysisType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "irac" => Ok(Self::Irac),
            "brief" => Ok(Self::Brief),
            "summary" => Ok(Self::Summary),
            _ => Err(UnknownAnalysisType(s.to_owned())),
        }
    }
}

//
// ─── ANALYSIS RESULT ───────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IracAnalysis {
    pub issue: String,
    pub rule: String,
    pub application: String,
    pub conclusion: String,
    pub key_facts: Vec<String>,
    pub legal_principles: Vec<String>,
}

/// Structured result of a case analysis; the shape depends on the analysis type.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseAnalysis {
    Irac(IracAnalysis),
    /// Brief and summary analyses have no fixed schema; fields are kept for display.
    Fields {
        analysis_type: AnalysisType,
        fields: Map<String, Value>,
    },
}

impl CaseAnalysis {
    #[must_use]
    pub fn analysis_type(&self) -> AnalysisType {
        match self {
            Self::Irac(_) => AnalysisType::Irac,
            Self::Fields { analysis_type, .. } => *analysis_type,
        }
    }
}

//
// ─── RESEARCH ──────────────────────────────────────────────────────────────────
//

/// A case returned by search or area browsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaseRecord {
    pub id: Option<String>,
    pub title: String,
    pub citation: Option<String>,
    pub court: Option<String>,
    pub year: Option<i32>,
    pub area_of_law: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalArea {
    pub id: String,
    pub name: String,
}

/// An analysis previously saved by the current user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedAnalysis {
    pub id: Option<String>,
    pub title: Option<String>,
    pub analysis_type: AnalysisType,
    pub case_summary: Option<String>,
    pub confidence_score: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl SavedAnalysis {
    /// Confidence as a whole percentage, when the backend reported one.
    #[must_use]
    pub fn confidence_percent(&self) -> Option<u8> {
        let score = self.confidence_score.filter(|s| s.is_finite())?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = (score.clamp(0.0, 1.0) * 100.0).round() as u8;
        Some(pct)
    }
}
