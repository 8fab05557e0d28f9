//! JSON shapes exchanged with the backend.
//!
//! Every optional field carries `#[serde(default)]`; normalisation into core
//! types happens in `mapping`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ids arrive as strings or as integers depending on the endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WireId {
    Text(String),
    Number(i64),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(n) => n.to_string(),
        }
    }
}

//
// ─── LEARNING ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub struct ModulesResponse {
    #[serde(default)]
    pub modules: Vec<ModuleDto>,
}

#[derive(Debug, Deserialize)]
pub struct ModuleDto {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
}

#[derive(Debug, Deserialize)]
pub struct LessonDto {
    pub id: WireId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

/// Module detail; sent bare or wrapped in `{"module": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ModuleContentResponse {
    Wrapped { module: ModuleContentDto },
    Bare(ModuleContentDto),
}

impl ModuleContentResponse {
    pub fn into_inner(self) -> ModuleContentDto {
        match self {
            Self::Wrapped { module } | Self::Bare(module) => module,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ModuleContentDto {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub lessons: Option<Vec<LessonDto>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressResponse {
    #[serde(default)]
    pub progress: HashMap<String, HashMap<String, ProgressDto>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProgressDto {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProgressRequest<'a> {
    pub module_id: &'a str,
    pub lesson_id: &'a str,
    pub completed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsDto {
    #[serde(default)]
    pub total_lessons: Option<f64>,
    #[serde(default)]
    pub completed_lessons: Option<f64>,
    #[serde(default)]
    pub completion_rate: Option<f64>,
    #[serde(default)]
    pub active_modules: Option<f64>,
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub topic: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatResponseDto {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub sources: Vec<Value>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicsResponse {
    #[serde(default)]
    pub topics: Vec<NamedDto>,
}

/// `{id, name}` pairs used by topics and legal areas.
#[derive(Debug, Deserialize)]
pub struct NamedDto {
    pub id: WireId,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<SessionDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionDto {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

//
// ─── CASES ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub case_text: &'a str,
    pub analysis_type: &'a str,
}

/// Analysis result; sent bare or wrapped in `{"analysis": {...}}`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse(pub Map<String, Value>);

#[derive(Debug, Default, Deserialize)]
pub struct CasesResponse {
    #[serde(default)]
    pub cases: Vec<CaseDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaseDto {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub citation: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub year: Option<WireId>,
    #[serde(default)]
    pub area_of_law: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AreasResponse {
    #[serde(default)]
    pub areas: Vec<NamedDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalysesResponse {
    #[serde(default)]
    pub analyses: Vec<SavedAnalysisDto>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SavedAnalysisDto {
    #[serde(default)]
    pub id: Option<WireId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub analysis_type: Option<String>,
    #[serde(default)]
    pub case_summary: Option<String>,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

//
// ─── SEARCH ────────────────────────────────────────────────────────────────────
//

/// Search results; either `{"results": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchResponse {
    Wrapped {
        #[serde(default)]
        results: Vec<Value>,
    },
    Bare(Vec<Value>),
}

impl SearchResponse {
    pub fn into_results(self) -> Vec<Value> {
        match self {
            Self::Wrapped { results } | Self::Bare(results) => results,
        }
    }
}
