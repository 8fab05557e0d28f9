use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use legal_core::model::{
    AnalysisType, CaseAnalysis, CaseRecord, ChatReply, ChatSession, ChatTopic, Difficulty,
    IracAnalysis, LearningStats, LegalArea, Lesson, LessonId, Module, ModuleError, ModuleId,
    ModulePatch, ProgressMap, ProgressRecord, SavedAnalysis,
};
use serde_json::{Map, Value};

use super::wire::{
    CaseDto, ChatResponseDto, LessonDto, ModuleContentDto, ModuleDto, NamedDto, ProgressResponse,
    SavedAnalysisDto, SessionDto, StatsDto, WireId,
};

/// Parse backend timestamps. Naive timestamps are taken as UTC; garbage is dropped.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn first_non_blank(candidates: [Option<String>; 2]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

//
// ─── LEARNING ──────────────────────────────────────────────────────────────────
//

fn lesson_from_dto(dto: LessonDto) -> Lesson {
    let id = dto.id.into_string();
    let title = first_non_blank([dto.title, dto.name]).unwrap_or_else(|| id.clone());
    Lesson::new(LessonId::new(id), title)
        .with_description(dto.description.unwrap_or_default())
        .with_content(dto.content)
        .with_duration(dto.duration)
}

/// # Errors
///
/// Returns `ModuleError` for a blank id or a repeated lesson id.
pub fn module_from_dto(dto: ModuleDto) -> Result<Module, ModuleError> {
    let id = dto.id.into_string();
    let title = first_non_blank([dto.title, dto.name]).unwrap_or_else(|| id.clone());
    let lessons = dto.lessons.into_iter().map(lesson_from_dto).collect();
    Ok(Module::new(
        ModuleId::new(id),
        title,
        Difficulty::from_label(dto.difficulty.as_deref()),
        lessons,
    )?
    .with_description(dto.description.unwrap_or_default())
    .with_duration(dto.duration)
    .with_icon(dto.icon))
}

/// Normalise the catalog listing. Invalid or repeated modules are skipped.
pub fn catalog_from_dto(modules: Vec<ModuleDto>) -> Vec<Module> {
    let mut seen = HashSet::new();
    modules
        .into_iter()
        .filter_map(|dto| match module_from_dto(dto) {
            Ok(module) => Some(module),
            Err(err) => {
                tracing::warn!(error = %err, "skipping invalid module");
                None
            }
        })
        .filter(|module| {
            let fresh = seen.insert(module.id().clone());
            if !fresh {
                tracing::warn!(module = %module.id(), "skipping duplicate module");
            }
            fresh
        })
        .collect()
}

pub fn patch_from_dto(dto: ModuleContentDto) -> ModulePatch {
    ModulePatch {
        title: first_non_blank([dto.title, dto.name]),
        description: dto.description,
        difficulty: dto
            .difficulty
            .filter(|d| !d.trim().is_empty())
            .map(|d| Difficulty::from_label(Some(&d))),
        duration: dto.duration.filter(|d| !d.trim().is_empty()),
        icon: dto.icon.filter(|i| !i.trim().is_empty()),
        lessons: dto
            .lessons
            .map(|lessons| lessons.into_iter().map(lesson_from_dto).collect()),
    }
}

pub fn progress_from_dto(dto: ProgressResponse) -> ProgressMap {
    dto.progress
        .into_iter()
        .flat_map(|(module, lessons)| {
            lessons.into_iter().map(move |(lesson, record)| {
                (
                    ModuleId::new(module.clone()),
                    LessonId::new(lesson),
                    ProgressRecord {
                        completed: record.completed,
                        completed_at: record.completed_at.as_deref().and_then(parse_timestamp),
                    },
                )
            })
        })
        .collect()
}

fn count(value: Option<f64>) -> u32 {
    let value = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = value.clamp(0.0, f64::from(u32::MAX)).round() as u32;
    count
}

pub fn stats_from_dto(dto: StatsDto) -> LearningStats {
    LearningStats {
        total_lessons: count(dto.total_lessons),
        completed_lessons: count(dto.completed_lessons),
        completion_rate: dto
            .completion_rate
            .filter(|r| r.is_finite())
            .unwrap_or(0.0),
        active_modules: count(dto.active_modules),
    }
}

//
// ─── CHAT ──────────────────────────────────────────────────────────────────────
//

/// Sources are plain strings or objects carrying a title.
fn source_label(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Object(map) => ["title", "name", "citation"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_owned))
            .or_else(|| Some(Value::Object(map).to_string())),
        Value::Null => None,
        other => Some(other.to_string()),
    }
    .filter(|s| !s.trim().is_empty())
}

pub fn chat_reply_from_dto(dto: ChatResponseDto) -> ChatReply {
    ChatReply {
        response: dto.response,
        sources: dto.sources.into_iter().filter_map(source_label).collect(),
        topic: dto.topic.filter(|t| !t.trim().is_empty()),
    }
}

pub fn topic_from_dto(dto: NamedDto) -> ChatTopic {
    let id = dto.id.into_string();
    ChatTopic {
        name: dto.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
        id,
    }
}

pub fn session_from_dto(dto: SessionDto) -> ChatSession {
    ChatSession {
        id: dto.id.map(WireId::into_string),
        topic: dto.topic.filter(|t| !t.trim().is_empty()),
        updated_at: dto
            .updated_at
            .or(dto.created_at)
            .as_deref()
            .and_then(parse_timestamp),
    }
}

//
// ─── CASES ─────────────────────────────────────────────────────────────────────
//

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn list_field(map: &Map<String, Value>, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(text)) if !text.trim().is_empty() => vec![text.clone()],
        _ => Vec::new(),
    }
}

/// Shape the analysis body according to the requested method.
pub fn analysis_from_map(analysis_type: AnalysisType, mut body: Map<String, Value>) -> CaseAnalysis {
    if let Some(Value::Object(inner)) = body.remove("analysis") {
        body = inner;
    }
    match analysis_type {
        AnalysisType::Irac => CaseAnalysis::Irac(IracAnalysis {
            issue: text_field(&body, "issue"),
            rule: text_field(&body, "rule"),
            application: text_field(&body, "application"),
            conclusion: text_field(&body, "conclusion"),
            key_facts: list_field(&body, "key_facts"),
            legal_principles: list_field(&body, "legal_principles"),
        }),
        other => CaseAnalysis::Fields {
            analysis_type: other,
            fields: body,
        },
    }
}

fn year_from_wire(year: WireId) -> Option<i32> {
    match year {
        WireId::Number(n) => i32::try_from(n).ok(),
        WireId::Text(text) => text.trim().parse().ok(),
    }
}

pub fn case_from_dto(dto: CaseDto) -> CaseRecord {
    CaseRecord {
        id: dto.id.map(WireId::into_string),
        title: first_non_blank([dto.title, dto.name]).unwrap_or_default(),
        citation: dto.citation.filter(|c| !c.trim().is_empty()),
        court: dto.court.filter(|c| !c.trim().is_empty()),
        year: dto.year.and_then(year_from_wire),
        area_of_law: dto.area_of_law.filter(|a| !a.trim().is_empty()),
        summary: first_non_blank([dto.summary, dto.description]).unwrap_or_default(),
    }
}

pub fn area_from_dto(dto: NamedDto) -> LegalArea {
    let id = dto.id.into_string();
    LegalArea {
        name: dto.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
        id,
    }
}

pub fn saved_analysis_from_dto(dto: SavedAnalysisDto) -> SavedAnalysis {
    SavedAnalysis {
        id: dto.id.map(WireId::into_string),
        title: dto.title.filter(|t| !t.trim().is_empty()),
        analysis_type: dto
            .analysis_type
            .and_then(|t| t.parse().ok())
            .unwrap_or_default(),
        case_summary: dto.case_summary.filter(|s| !s.trim().is_empty()),
        confidence_score: dto.confidence_score,
        created_at: dto.created_at.as_deref().and_then(parse_timestamp),
    }
}
