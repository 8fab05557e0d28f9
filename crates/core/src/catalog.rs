//! Pure projections over the module catalog: filtering, sorting and
//! completion percentages.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{Difficulty, Module, ProgressMap};

/// Number of modules listed in the "continue learning" strip.
pub const CONTINUE_LEARNING_LIMIT: usize = 4;

//
// ─── PERCENTAGE ────────────────────────────────────────────────────────────────
//

/// Completion percentage in `[0, 100]`, rounded half away from zero.
///
/// Returns 0 when `total_lessons` is 0. A completed count above the total
/// (stale records for removed lessons) is clamped to 100.
#[must_use]
pub fn completion_percentage(total_lessons: usize, completed_lessons: usize) -> u8 {
    if total_lessons == 0 {
        return 0;
    }
    let completed = completed_lessons.min(total_lessons) as u128;
    let total = total_lessons as u128;
    // round(100 * c / t) == floor((200 * c + t) / (2 * t)) for non-negative values
    let pct = (200 * completed + total) / (2 * total);
    u8::try_from(pct).unwrap_or(100).min(100)
}

/// Completion percentage of a module, counting completed records in `progress`.
#[must_use]
pub fn module_percentage(module: &Module, progress: &ProgressMap) -> u8 {
    completion_percentage(module.lessons().len(), progress.completed_count(module.id()))
}

//
// ─── FILTER / SORT SPEC ────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecParseError {
    #[error("unknown difficulty filter: {0}")]
    Filter(String),
    #[error("unknown sort key: {0}")]
    Sort(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyFilter {
    pub const ALL: [DifficultyFilter; 4] =
        [Self::All, Self::Beginner, Self::Intermediate, Self::Advanced];

    #[must_use]
    pub fn matches(self, difficulty: &Difficulty) -> bool {
        match self {
            Self::All => true,
            Self::Beginner => *difficulty == Difficulty::Beginner,
            Self::Intermediate => *difficulty == Difficulty::Intermediate,
            Self::Advanced => *difficulty == Difficulty::Advanced,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All Levels",
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyFilter {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(SpecParseError::Filter(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Recommended,
    /// Descending completion percentage.
    Progress,
    /// Case-insensitive title order.
    Alphabetical,
    /// Beginner, intermediate, advanced.
    Difficulty,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        Self::Recommended,
        Self::Progress,
        Self::Alphabetical,
        Self::Difficulty,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Progress => "progress",
            Self::Alphabetical => "alphabetical",
            Self::Difficulty => "difficulty",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Recommended => "Recommended",
            Self::Progress => "By Progress",
            Self::Alphabetical => "Alphabetical",
            Self::Difficulty => "By Difficulty",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SpecParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "progress" => Ok(Self::Progress),
            "alphabetical" => Ok(Self::Alphabetical),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(SpecParseError::Sort(s.to_owned())),
        }
    }
}

/// Difficulty filter plus sort key applied to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FilterSortSpec {
    pub filter: DifficultyFilter,
    pub sort: SortKey,
}

impl FilterSortSpec {
    #[must_use]
    pub fn new(filter: DifficultyFilter, sort: SortKey) -> Self {
        Self { filter, sort }
    }

    /// True when neither filtering nor sorting is active.
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

//
// ─── PROJECTION ────────────────────────────────────────────────────────────────
//

/// A catalog module paired with its derived progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleView<'a> {
    pub module: &'a Module,
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
}

impl<'a> ModuleView<'a> {
    #[must_use]
    pub fn new(module: &'a Module, progress: &ProgressMap) -> Self {
        let completed = progress.completed_count(module.id());
        let total = module.lessons().len();
        Self {
            module,
            completed,
            total,
            percentage: completion_percentage(total, completed),
        }
    }

    /// Started but not finished.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.completed > 0 && self.completed < self.total
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}

/// Filter and sort the catalog. Pure: same inputs, same output.
///
/// Every sort is stable, so ties keep catalog order.
#[must_use]
pub fn project<'a>(
    catalog: &'a [Module],
    spec: FilterSortSpec,
    progress: &ProgressMap,
) -> Vec<ModuleView<'a>> {
    let mut views: Vec<ModuleView<'a>> = catalog
        .iter()
        .filter(|module| spec.filter.matches(module.difficulty()))
        .map(|module| ModuleView::new(module, progress))
        .collect();

    match spec.sort {
        SortKey::Recommended => {}
        SortKey::Progress => views.sort_by(|a, b| b.percentage.cmp(&a.percentage)),
        SortKey::Alphabetical => views.sort_by_cached_key(|v| v.module.title().to_lowercase()),
        SortKey::Difficulty => views.sort_by_key(|v| v.module.difficulty().rank()),
    }

    views
}

/// Modules from a projection that are started but unfinished, in projection order.
#[must_use]
pub fn continue_learning<'a>(views: &[ModuleView<'a>], limit: usize) -> Vec<ModuleView<'a>> {
    views
        .iter()
        .filter(|v| v.is_in_progress())
        .take(limit)
        .copied()
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
