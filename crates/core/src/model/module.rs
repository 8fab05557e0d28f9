use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::{LessonId, ModuleId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module id cannot be empty")]
    EmptyId,

    #[error("lesson id cannot be empty in module {module}")]
    EmptyLessonId { module: ModuleId },

    #[error("lesson {lesson} appears more than once in module {module}")]
    DuplicateLesson { module: ModuleId, lesson: LessonId },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty band of a module.
///
/// Labels the backend sends that are not one of the three known bands are
/// kept verbatim in `Other`; they rank like `Intermediate` but never match a
/// specific difficulty filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Other(String),
}

impl Difficulty {
    /// Normalizes an optional wire label. Missing or blank labels become `Intermediate`.
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => Self::Intermediate,
            Some(raw) => raw.parse().unwrap_or_else(|_| Self::Other(raw.to_owned())),
        }
    }

    /// Ordering rank used by the difficulty sort: beginner < intermediate < advanced.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate | Self::Other(_) => 2,
            Self::Advanced => 3,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a label is not one of the known difficulty bands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(UnknownDifficulty(s.to_owned())),
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// An atomic, completable learning unit inside a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    content: Option<String>,
    duration: Option<String>,
}

impl Lesson {
    #[must_use]
    pub fn new(id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            content: None,
            duration: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach an HTML body. Blank bodies are treated as absent.
    #[must_use]
    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Option<String>) -> Self {
        self.duration = duration.filter(|d| !d.trim().is_empty());
        self
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    #[must_use]
    pub fn duration(&self) -> Option<&str> {
        self.duration.as_deref()
    }
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

pub const DEFAULT_DURATION: &str = "2-3 hours";
pub const DEFAULT_ICON: &str = "📚";

/// A named learning unit with an ordered list of lessons.
///
/// Lesson order is significant: it decides which lessons are locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    description: String,
    difficulty: Difficulty,
    duration: String,
    icon: String,
    lessons: Vec<Lesson>,
}

impl Module {
    /// Creates a module from already-normalized parts.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::EmptyId` for a blank id and
    /// `ModuleError::DuplicateLesson` when two lessons share an id.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        difficulty: Difficulty,
        lessons: Vec<Lesson>,
    ) -> Result<Self, ModuleError> {
        if id.as_str().trim().is_empty() {
            return Err(ModuleError::EmptyId);
        }
        validate_lessons(&id, &lessons)?;

        Ok(Self {
            id,
            title: title.into(),
            description: String::new(),
            difficulty,
            duration: DEFAULT_DURATION.to_owned(),
            icon: DEFAULT_ICON.to_owned(),
            lessons,
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Option<String>) -> Self {
        if let Some(duration) = duration.filter(|d| !d.trim().is_empty()) {
            self.duration = duration;
        }
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        if let Some(icon) = icon.filter(|i| !i.trim().is_empty()) {
            self.icon = icon;
        }
        self
    }

    /// Overlay the richer content returned by the module-detail endpoint.
    ///
    /// Fields absent from the patch keep their summary values.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::DuplicateLesson` if the patched lesson list is invalid;
    /// the module is left unchanged in that case.
    pub fn merge(&mut self, patch: ModulePatch) -> Result<(), ModuleError> {
        if let Some(lessons) = &patch.lessons {
            validate_lessons(&self.id, lessons)?;
        }
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(lessons) = patch.lessons {
            self.lessons = lessons;
        }
        Ok(())
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|lesson| lesson.id() == id)
    }

    /// Position of a lesson in this module's ordered sequence.
    #[must_use]
    pub fn lesson_index(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|lesson| lesson.id() == id)
    }
}

fn validate_lessons(module: &ModuleId, lessons: &[Lesson]) -> Result<(), ModuleError> {
    let mut seen = HashSet::with_capacity(lessons.len());
    for lesson in lessons {
        if lesson.id().as_str().trim().is_empty() {
            return Err(ModuleError::EmptyLessonId {
                module: module.clone(),
            });
        }
        if !seen.insert(lesson.id()) {
            return Err(ModuleError::DuplicateLesson {
                module: module.clone(),
                lesson: lesson.id().clone(),
            });
        }
    }
    Ok(())
}

/// Partial module returned by the module-detail endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub duration: Option<String>,
    pub icon: Option<String>,
    pub lessons: Option<Vec<Lesson>>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: &str) -> Lesson {
        Lesson::new(LessonId::new(id), id.to_uppercase())
    }

    #[test]
    fn difficulty_from_label_defaults_to_intermediate() {
        assert_eq!(Difficulty::from_label(None), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_label(Some("  ")), Difficulty::Intermediate);
        assert_eq!(Difficulty::from_label(Some("Advanced")), Difficulty::Advanced);
    }

    #[test]
    fn unknown_difficulty_ranks_as_intermediate() {
        let other = Difficulty::from_label(Some("expert"));
        assert_eq!(other, Difficulty::Other("expert".into()));
        assert_eq!(other.rank(), Difficulty::Intermediate.rank());
        assert_eq!(other.to_string(), "expert");
    }

    #[test]
    fn module_new_rejects_duplicate_lessons() {
        let err = Module::new(
            ModuleId::new("contracts"),
            "Contracts",
            Difficulty::Beginner,
            vec![lesson("a"), lesson("a")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModuleError::DuplicateLesson {
                module: ModuleId::new("contracts"),
                lesson: LessonId::new("a"),
            }
        );
    }

    #[test]
    fn module_new_rejects_empty_id() {
        let err = Module::new(ModuleId::new(" "), "X", Difficulty::Beginner, vec![]).unwrap_err();
        assert_eq!(err, ModuleError::EmptyId);
    }

    #[test]
    fn module_defaults_duration_and_icon() {
        let module = Module::new(ModuleId::new("torts"), "Torts", Difficulty::default(), vec![])
            .unwrap()
            .with_duration(Some("  ".into()))
            .with_icon(None);
        assert_eq!(module.duration(), DEFAULT_DURATION);
        assert_eq!(module.icon(), DEFAULT_ICON);
    }

    #[test]
    fn merge_overlays_present_fields_only() {
        let mut module = Module::new(
            ModuleId::new("contracts"),
            "Contracts",
            Difficulty::Beginner,
            vec![lesson("a")],
        )
        .unwrap()
        .with_description("summary");

        module
            .merge(ModulePatch {
                lessons: Some(vec![
                    lesson("a").with_content(Some("<p>Offer</p>".into())),
                    lesson("b"),
                ]),
                ..ModulePatch::default()
            })
            .unwrap();

        assert_eq!(module.title(), "Contracts");
        assert_eq!(module.description(), "summary");
        assert_eq!(module.lessons().len(), 2);
        assert_eq!(module.lessons()[0].content(), Some("<p>Offer</p>"));
        assert_eq!(module.lesson_index(&LessonId::new("b")), Some(1));
    }

    #[test]
    fn merge_rejects_invalid_lessons_without_mutating() {
        let mut module = Module::new(
            ModuleId::new("contracts"),
            "Contracts",
            Difficulty::Beginner,
            vec![lesson("a")],
        )
        .unwrap();
        let before = module.clone();

        let result = module.merge(ModulePatch {
            title: Some("Renamed".into()),
            lessons: Some(vec![lesson("x"), lesson("x")]),
            ..ModulePatch::default()
        });

        assert!(result.is_err());
        assert_eq!(module, before);
    }

    #[test]
    fn lesson_blank_content_is_absent() {
        let lesson = lesson("a").with_content(Some("   ".into()));
        assert_eq!(lesson.content(), None);
    }
}
