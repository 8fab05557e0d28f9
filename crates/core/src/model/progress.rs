use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::ids::{LessonId, ModuleId};

/// Completion status for one (module, lesson) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressRecord {
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    #[must_use]
    pub fn completed_at(at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(at),
        }
    }

    #[must_use]
    pub fn incomplete() -> Self {
        Self::default()
    }
}

/// Sparse progress cache: module -> lesson -> record.
///
/// Lessons without a record are simply not started. Nothing here knows about
/// lesson order; locking is derived from the catalog on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressMap {
    modules: BTreeMap<ModuleId, BTreeMap<LessonId, ProgressRecord>>,
}

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.values().all(BTreeMap::is_empty)
    }

    #[must_use]
    pub fn record(&self, module: &ModuleId, lesson: &LessonId) -> Option<&ProgressRecord> {
        self.modules.get(module).and_then(|lessons| lessons.get(lesson))
    }

    #[must_use]
    pub fn is_completed(&self, module: &ModuleId, lesson: &LessonId) -> bool {
        self.record(module, lesson).is_some_and(|r| r.completed)
    }

    /// Counts records under `module` whose `completed` flag is set.
    #[must_use]
    pub fn completed_count(&self, module: &ModuleId) -> usize {
        self.modules
            .get(module)
            .map_or(0, |lessons| lessons.values().filter(|r| r.completed).count())
    }

    /// Insert or overwrite a single record.
    pub fn insert(&mut self, module: ModuleId, lesson: LessonId, record: ProgressRecord) {
        self.modules.entry(module).or_default().insert(lesson, record);
    }

    /// Localized optimistic patch for one lesson. Never touches other keys.
    pub fn mark_completed(&mut self, module: &ModuleId, lesson: &LessonId, at: DateTime<Utc>) {
        self.insert(module.clone(), lesson.clone(), ProgressRecord::completed_at(at));
    }

    /// Full replacement from an authoritative fetch.
    pub fn replace_all(&mut self, other: ProgressMap) {
        *self = other;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &LessonId, &ProgressRecord)> {
        self.modules.iter().flat_map(|(module, lessons)| {
            lessons
                .iter()
                .map(move |(lesson, record)| (module, lesson, record))
        })
    }
}

impl FromIterator<(ModuleId, LessonId, ProgressRecord)> for ProgressMap {
    fn from_iter<T: IntoIterator<Item = (ModuleId, LessonId, ProgressRecord)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (module, lesson, record) in iter {
            map.insert(module, lesson, record);
        }
        map
    }
}
