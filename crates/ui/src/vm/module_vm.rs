use legal_core::{FilterSortSpec, ModuleView, lock_flags};
use legal_core::model::{LessonId, Module, ModuleId, ProgressMap};
use legal_core::text::capitalize_first;
use services::LearningState;

use crate::vm::markdown_vm::{lesson_body_html, strip_html_tags};
use crate::vm::progress_vm::ProgressBarVm;
use crate::vm::time_fmt::format_date;

pub const CATALOG_CRUMB: &str = "Learning Modules";
pub const LESSON_DESCRIPTION_FALLBACK: &str = "Lesson description";

//
// ─── MODULE CARD ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleCardVm {
    pub id: ModuleId,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub lessons_label: String,
    pub difficulty_label: String,
    pub duration: String,
    pub progress: ProgressBarVm,
    pub completed: bool,
}

impl From<&ModuleView<'_>> for ModuleCardVm {
    fn from(view: &ModuleView<'_>) -> Self {
        let module = view.module;
        Self {
            id: module.id().clone(),
            icon: module.icon().to_owned(),
            title: module.title().to_owned(),
            description: strip_html_tags(module.description()).trim().to_owned(),
            lessons_label: format!("{}/{} lessons", view.completed, view.total),
            difficulty_label: capitalize_first(module.difficulty().label()),
            duration: module.duration().to_owned(),
            progress: ProgressBarVm::new(view.percentage),
            completed: view.is_complete(),
        }
    }
}

#[must_use]
pub fn map_module_cards(views: &[ModuleView<'_>]) -> Vec<ModuleCardVm> {
    views.iter().map(ModuleCardVm::from).collect()
}

//
// ─── MODULE LIST ───────────────────────────────────────────────────────────────
//

pub const NO_MODULES_IN_PROGRESS: &str =
    "No modules in progress. Start a new module to see your progress here!";

/// Shown in place of the module grid when the projection is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyStateVm {
    pub title: &'static str,
    pub hint: &'static str,
    /// Filters are active, so clearing them may bring modules back.
    pub offer_clear_filters: bool,
}

impl EmptyStateVm {
    #[must_use]
    pub fn for_spec(spec: FilterSortSpec) -> Self {
        if spec.is_default() {
            Self {
                title: "No learning modules available",
                hint: "Learning modules will appear here once they are available.",
                offer_clear_filters: false,
            }
        } else {
            Self {
                title: "No modules match your filters",
                hint: "Try adjusting your filters to see more modules.",
                offer_clear_filters: true,
            }
        }
    }
}

/// The catalog screen: module grid plus the continue-learning section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleListVm {
    pub cards: Vec<ModuleCardVm>,
    pub empty: Option<EmptyStateVm>,
    /// `None` hides the section; an empty list shows [`NO_MODULES_IN_PROGRESS`].
    pub continue_learning: Option<Vec<ModuleCardVm>>,
}

impl From<&LearningState> for ModuleListVm {
    fn from(state: &LearningState) -> Self {
        let cards = map_module_cards(&state.modules());
        if cards.is_empty() {
            return Self {
                cards,
                empty: Some(EmptyStateVm::for_spec(state.spec())),
                continue_learning: None,
            };
        }
        Self {
            cards,
            empty: None,
            continue_learning: Some(map_module_cards(&state.continue_learning())),
        }
    }
}

//
// ─── LESSON LIST ───────────────────────────────────────────────────────────────
//

/// Leading badge of a lesson row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonBadge {
    Completed,
    Locked,
    /// One-based position in the module.
    Number(usize),
}

impl LessonBadge {
    #[must_use]
    pub fn symbol(&self) -> String {
        match self {
            Self::Completed => "✓".to_owned(),
            Self::Locked => "🔒".to_owned(),
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub id: LessonId,
    pub badge: LessonBadge,
    pub title: String,
    pub description: String,
    pub duration: Option<String>,
    /// `Completed Mar 1, 2024`, when the completion carries a timestamp.
    pub completed_label: Option<String>,
    pub selectable: bool,
}

/// Rows for the lesson list of `module`, with locks derived from `progress`.
#[must_use]
pub fn map_lesson_rows(module: &Module, progress: &ProgressMap) -> Vec<LessonRowVm> {
    let locks = lock_flags(module, progress);
    module
        .lessons()
        .iter()
        .zip(locks)
        .enumerate()
        .map(|(index, (lesson, locked))| {
            let record = progress.record(module.id(), lesson.id()).filter(|r| r.completed);
            let badge = if record.is_some() {
                LessonBadge::Completed
            } else if locked {
                LessonBadge::Locked
            } else {
                LessonBadge::Number(index + 1)
            };
            let description = match lesson.description().trim() {
                "" => LESSON_DESCRIPTION_FALLBACK.to_owned(),
                text => text.to_owned(),
            };
            LessonRowVm {
                id: lesson.id().clone(),
                badge,
                title: lesson.title().to_owned(),
                description,
                duration: lesson.duration().map(str::to_owned),
                completed_label: record
                    .and_then(|r| r.completed_at)
                    .map(|at| format!("Completed {}", format_date(at))),
                selectable: !locked,
            }
        })
        .collect()
}

//
// ─── LESSON DETAIL ─────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonDetailVm {
    pub breadcrumb: Vec<String>,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub action_label: &'static str,
    pub can_complete: bool,
    pub body_html: String,
}

/// Detail of the selected lesson, or `None` outside the lesson view.
#[must_use]
pub fn build_lesson_detail(state: &LearningState) -> Option<LessonDetailVm> {
    let module = state.selected_module()?;
    let lesson = state.selected_lesson()?;
    let completed = state.progress().is_completed(module.id(), lesson.id());
    let completing = state.is_completing();

    let action_label = if completing {
        "Updating..."
    } else if completed {
        "Completed"
    } else {
        "Mark Complete"
    };

    Some(LessonDetailVm {
        breadcrumb: vec![
            CATALOG_CRUMB.to_owned(),
            module.title().to_owned(),
            lesson.title().to_owned(),
        ],
        title: lesson.title().to_owned(),
        description: lesson.description().to_owned(),
        completed,
        action_label,
        can_complete: !completing && !completed,
        body_html: lesson_body_html(lesson.content(), module.title()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use legal_core::model::{Difficulty, Lesson};
    use legal_core::time::fixed_now;
    use legal_core::{DifficultyFilter, SortKey};

    fn contracts() -> Module {
        Module::new(
            ModuleId::new("contracts"),
            "Contracts",
            Difficulty::Advanced,
            vec![
                Lesson::new(LessonId::new("a"), "Offer").with_description("Making an offer"),
                Lesson::new(LessonId::new("b"), "Acceptance"),
                Lesson::new(LessonId::new("c"), "Consideration"),
            ],
        )
        .unwrap()
        .with_description("<p>Formation &amp; breach</p>")
    }

    #[test]
    fn card_shows_counts_and_capitalized_difficulty() {
        let module = contracts();
        let mut progress = ProgressMap::new();
        progress.mark_completed(module.id(), &LessonId::new("a"), fixed_now());

        let card = ModuleCardVm::from(&ModuleView::new(&module, &progress));

        assert_eq!(card.lessons_label, "1/3 lessons");
        assert_eq!(card.difficulty_label, "Advanced");
        assert_eq!(card.description, "Formation & breach");
        assert_eq!(card.progress.percentage, 33);
        assert!(!card.completed);
    }

    #[test]
    fn rows_mark_completed_locked_and_open_lessons() {
        let module = contracts();
        let mut progress = ProgressMap::new();
        progress.mark_completed(module.id(), &LessonId::new("a"), fixed_now());

        let rows = map_lesson_rows(&module, &progress);

        assert_eq!(rows[0].badge, LessonBadge::Completed);
        assert_eq!(rows[0].description, "Making an offer");
        assert_eq!(
            rows[0].completed_label.as_deref(),
            Some("Completed Nov 14, 2023")
        );
        assert_eq!(rows[1].badge, LessonBadge::Number(2));
        assert!(rows[1].selectable);
        assert_eq!(rows[1].description, LESSON_DESCRIPTION_FALLBACK);
        assert_eq!(rows[2].badge, LessonBadge::Locked);
        assert_eq!(rows[2].badge.symbol(), "🔒");
        assert!(!rows[2].selectable);
    }

    #[test]
    fn empty_state_depends_on_active_filters() {
        let plain = EmptyStateVm::for_spec(FilterSortSpec::default());
        assert_eq!(plain.title, "No learning modules available");
        assert!(!plain.offer_clear_filters);

        let filtered =
            EmptyStateVm::for_spec(FilterSortSpec::new(DifficultyFilter::Advanced, SortKey::default()));
        assert_eq!(filtered.title, "No modules match your filters");
        assert!(filtered.offer_clear_filters);

        let sorted =
            EmptyStateVm::for_spec(FilterSortSpec::new(DifficultyFilter::All, SortKey::Alphabetical));
        assert!(sorted.offer_clear_filters);
    }

    #[test]
    fn empty_catalog_hides_continue_learning() {
        let list = ModuleListVm::from(&LearningState::default());
        assert!(list.cards.is_empty());
        assert_eq!(list.empty, Some(EmptyStateVm::for_spec(FilterSortSpec::default())));
        assert_eq!(list.continue_learning, None);
    }

    #[test]
    fn no_detail_outside_lesson_view() {
        assert_eq!(build_lesson_detail(&LearningState::default()), None);
    }
}
