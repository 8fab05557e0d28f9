use legal_core::model::{AnalysisType, CaseAnalysis, CaseRecord, LegalArea, SavedAnalysis};
use legal_core::text::{capitalize_first, format_legal_area_name, truncate_text};
use serde_json::Value;

use crate::vm::time_fmt::format_date;

pub const CASE_SUMMARY_PREVIEW: usize = 200;
pub const SAVED_SUMMARY_PREVIEW: usize = 150;

//
// ─── RESEARCH RESULTS ──────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaseCardVm {
    pub title: String,
    pub area_label: String,
    pub citation: Option<String>,
    pub summary_preview: String,
    /// `Year: 1891`, `Court: N.Y. Ct. App.`.
    pub facts: Vec<String>,
}

/// Cards for research results; `index` numbers untitled cases.
#[must_use]
pub fn build_case_card(index: usize, case: &CaseRecord) -> CaseCardVm {
    let title = match case.title.trim() {
        "" => format!("Case {}", index + 1),
        title => title.to_owned(),
    };
    let summary = match case.summary.trim() {
        "" => "No summary available",
        summary => summary,
    };
    let mut facts = Vec::new();
    if let Some(year) = case.year {
        facts.push(format!("Year: {year}"));
    }
    if let Some(court) = case.court.as_deref().filter(|c| !c.is_empty()) {
        facts.push(format!("Court: {court}"));
    }

    CaseCardVm {
        title,
        area_label: format_legal_area_name(case.area_of_law.as_deref().unwrap_or("General")),
        citation: case.citation.clone().filter(|c| !c.is_empty()),
        summary_preview: truncate_text(summary, CASE_SUMMARY_PREVIEW),
        facts,
    }
}

#[must_use]
pub fn map_case_cards(cases: &[CaseRecord]) -> Vec<CaseCardVm> {
    cases
        .iter()
        .enumerate()
        .map(|(index, case)| build_case_card(index, case))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AreaChipVm {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

#[must_use]
pub fn map_area_chips(areas: &[LegalArea], selected: &str) -> Vec<AreaChipVm> {
    areas
        .iter()
        .map(|area| AreaChipVm {
            id: area.id.clone(),
            label: format_legal_area_name(&area.name),
            selected: area.id == selected,
        })
        .collect()
}

//
// ─── ANALYSIS ──────────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisSectionVm {
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisVm {
    pub heading: &'static str,
    pub sections: Vec<AnalysisSectionVm>,
}

impl From<&CaseAnalysis> for AnalysisVm {
    fn from(analysis: &CaseAnalysis) -> Self {
        match analysis {
            CaseAnalysis::Irac(irac) => {
                let mut sections = vec![
                    text_section("Issue", &irac.issue),
                    text_section("Rule", &irac.rule),
                    text_section("Application", &irac.application),
                    text_section("Conclusion", &irac.conclusion),
                ];
                if !irac.key_facts.is_empty() {
                    sections.push(list_section("Key Facts", irac.key_facts.clone()));
                }
                if !irac.legal_principles.is_empty() {
                    sections.push(list_section("Legal Principles", irac.legal_principles.clone()));
                }
                Self {
                    heading: "IRAC Analysis",
                    sections,
                }
            }
            CaseAnalysis::Fields { fields, .. } => Self {
                heading: "Case Analysis",
                sections: fields
                    .iter()
                    .filter_map(|(key, value)| field_section(key, value))
                    .collect(),
            },
        }
    }
}

fn text_section(heading: &str, text: &str) -> AnalysisSectionVm {
    AnalysisSectionVm {
        heading: heading.to_owned(),
        body: SectionBody::Text(text.to_owned()),
    }
}

fn list_section(heading: &str, items: Vec<String>) -> AnalysisSectionVm {
    AnalysisSectionVm {
        heading: heading.to_owned(),
        body: SectionBody::List(items),
    }
}

/// Strings and arrays are shown; other JSON values are skipped.
fn field_section(key: &str, value: &Value) -> Option<AnalysisSectionVm> {
    let heading = key
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ");
    let body = match value {
        Value::String(text) => SectionBody::Text(text.clone()),
        Value::Array(items) => SectionBody::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        _ => return None,
    };
    Some(AnalysisSectionVm { heading, body })
}

//
// ─── SAVED ANALYSES ────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedAnalysisVm {
    pub title: String,
    pub analyzed_on: Option<String>,
    pub method_badge: String,
    pub summary_preview: Option<String>,
    pub confidence_label: Option<String>,
}

#[must_use]
pub fn build_saved_analysis(index: usize, saved: &SavedAnalysis) -> SavedAnalysisVm {
    SavedAnalysisVm {
        title: saved
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Case Analysis #{}", index + 1)),
        analyzed_on: saved
            .created_at
            .map(|at| format!("Analyzed on {}", format_date(at))),
        method_badge: method_badge(saved.analysis_type),
        summary_preview: saved
            .case_summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| truncate_text(s, SAVED_SUMMARY_PREVIEW)),
        confidence_label: saved
            .confidence_percent()
            .map(|pct| format!("Confidence: {pct}%")),
    }
}

#[must_use]
pub fn map_saved_analyses(saved: &[SavedAnalysis]) -> Vec<SavedAnalysisVm> {
    saved
        .iter()
        .enumerate()
        .map(|(index, item)| build_saved_analysis(index, item))
        .collect()
}

fn method_badge(analysis_type: AnalysisType) -> String {
    analysis_type.as_str().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use legal_core::model::IracAnalysis;
    use legal_core::time::fixed_now;
    use serde_json::json;

    #[test]
    fn case_card_fills_gaps() {
        let card = build_case_card(1, &CaseRecord::default());
        assert_eq!(card.title, "Case 2");
        assert_eq!(card.area_label, "General");
        assert_eq!(card.summary_preview, "No summary available");
        assert!(card.facts.is_empty());
    }

    #[test]
    fn case_card_truncates_summary_and_lists_facts() {
        let case = CaseRecord {
            title: "Hamer v. Sidway".into(),
            area_of_law: Some("contract_law".into()),
            summary: "x".repeat(250),
            year: Some(1891),
            court: Some("N.Y. Ct. App.".into()),
            ..CaseRecord::default()
        };

        let card = build_case_card(0, &case);

        assert_eq!(card.area_label, "Contract Law");
        assert_eq!(card.summary_preview.chars().count(), CASE_SUMMARY_PREVIEW + 3);
        assert_eq!(card.facts, vec!["Year: 1891", "Court: N.Y. Ct. App."]);
    }

    #[test]
    fn irac_sections_skip_empty_lists() {
        let vm = AnalysisVm::from(&CaseAnalysis::Irac(IracAnalysis {
            issue: "Was there consideration?".into(),
            key_facts: vec!["Uncle promised $5,000".into()],
            ..IracAnalysis::default()
        }));

        assert_eq!(vm.heading, "IRAC Analysis");
        let headings: Vec<&str> = vm.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Issue", "Rule", "Application", "Conclusion", "Key Facts"]
        );
    }

    #[test]
    fn generic_fields_become_titled_sections() {
        let Value::Object(fields) = json!({
            "case_name": "Hamer v. Sidway",
            "holdings": ["Forbearance is consideration"],
            "score": 0.9
        }) else {
            unreachable!()
        };
        let vm = AnalysisVm::from(&CaseAnalysis::Fields {
            analysis_type: AnalysisType::Brief,
            fields,
        });

        assert_eq!(vm.heading, "Case Analysis");
        assert_eq!(vm.sections.len(), 2);
        assert_eq!(vm.sections[0].heading, "Case Name");
        assert_eq!(
            vm.sections[1].body,
            SectionBody::List(vec!["Forbearance is consideration".into()])
        );
    }

    #[test]
    fn saved_analysis_labels() {
        let saved = SavedAnalysis {
            analysis_type: AnalysisType::Brief,
            confidence_score: Some(0.82),
            created_at: Some(fixed_now()),
            ..SavedAnalysis::default()
        };

        let vm = build_saved_analysis(0, &saved);

        assert_eq!(vm.title, "Case Analysis #1");
        assert_eq!(vm.method_badge, "BRIEF");
        assert_eq!(vm.confidence_label.as_deref(), Some("Confidence: 82%"));
        assert_eq!(vm.analyzed_on.as_deref(), Some("Analyzed on Nov 14, 2023"));
        assert_eq!(vm.summary_preview, None);
    }

    #[test]
    fn selected_area_chip_is_flagged() {
        let chips = map_area_chips(
            &[
                LegalArea {
                    id: "tort_law".into(),
                    name: "tort_law".into(),
                },
                LegalArea {
                    id: "criminal_law".into(),
                    name: "criminal_law".into(),
                },
            ],
            "criminal_law",
        );
        assert_eq!(chips[0].label, "Tort Law");
        assert!(!chips[0].selected);
        assert!(chips[1].selected);
    }
}
