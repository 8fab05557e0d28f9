//! Catalog → module → lesson navigation.
//!
//! States hold ids rather than module objects so a catalog refresh can never
//! leave the view pointing at a stale copy. Every lookup goes back to the
//! catalog by id.

use crate::locking::is_locked;
use crate::model::{Lesson, LessonId, Module, ModuleId, ProgressMap};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Catalog,
    ModuleDetail {
        module: ModuleId,
    },
    LessonDetail {
        module: ModuleId,
        lesson: LessonId,
    },
}

/// User-driven navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavIntent {
    SelectModule(ModuleId),
    SelectLesson(LessonId),
    Back,
}

/// Whether an intent changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    Ignored,
}

impl Transition {
    #[must_use]
    pub fn moved(self) -> bool {
        matches!(self, Self::Moved)
    }
}

impl NavigationState {
    #[must_use]
    pub fn module_id(&self) -> Option<&ModuleId> {
        match self {
            Self::Catalog => None,
            Self::ModuleDetail { module } | Self::LessonDetail { module, .. } => Some(module),
        }
    }

    #[must_use]
    pub fn lesson_id(&self) -> Option<&LessonId> {
        match self {
            Self::LessonDetail { lesson, .. } => Some(lesson),
            _ => None,
        }
    }

    /// Resolve the selected module against the catalog.
    #[must_use]
    pub fn module<'a>(&self, catalog: &'a [Module]) -> Option<&'a Module> {
        let id = self.module_id()?;
        find_module(catalog, id)
    }

    /// Resolve the selected lesson against the catalog.
    #[must_use]
    pub fn lesson<'a>(&self, catalog: &'a [Module]) -> Option<&'a Lesson> {
        let lesson = self.lesson_id()?;
        self.module(catalog)?.lesson(lesson)
    }

    /// Apply one intent. Invalid intents leave the state untouched.
    ///
    /// - `SelectModule` works from the catalog view only, for modules present in `catalog`.
    /// - `SelectLesson` works from a module view only, for unlocked lessons of that module.
    /// - `Back` pops one level; it never skips from a lesson straight to the catalog.
    pub fn apply(
        &mut self,
        intent: NavIntent,
        catalog: &[Module],
        progress: &ProgressMap,
    ) -> Transition {
        let next = match (&*self, intent) {
            (Self::Catalog, NavIntent::SelectModule(id)) => find_module(catalog, &id)
                .map(|_| Self::ModuleDetail { module: id }),
            (Self::ModuleDetail { module }, NavIntent::SelectLesson(lesson)) => {
                find_module(catalog, module).and_then(|m| {
                    let index = m.lesson_index(&lesson)?;
                    (!is_locked(m, progress, index)).then(|| Self::LessonDetail {
                        module: module.clone(),
                        lesson,
                    })
                })
            }
            (Self::LessonDetail { module, .. }, NavIntent::Back) => Some(Self::ModuleDetail {
                module: module.clone(),
            }),
            (Self::ModuleDetail { .. }, NavIntent::Back) => Some(Self::Catalog),
            _ => None,
        };

        match next {
            Some(state) => {
                *self = state;
                Transition::Moved
            }
            None => Transition::Ignored,
        }
    }

    /// Fall back to the deepest state whose references still exist in `catalog`.
    pub fn reconcile(&mut self, catalog: &[Module]) -> Transition {
        let next = match &*self {
            Self::Catalog => None,
            Self::ModuleDetail { module } => {
                find_module(catalog, module).is_none().then_some(Self::Catalog)
            }
            Self::LessonDetail { module, lesson } => match find_module(catalog, module) {
                None => Some(Self::Catalog),
                Some(m) if m.lesson(lesson).is_none() => Some(Self::ModuleDetail {
                    module: module.clone(),
                }),
                Some(_) => None,
            },
        };

        match next {
            Some(state) => {
                *self = state;
                Transition::Moved
            }
            None => Transition::Ignored,
        }
    }
}

fn find_module<'a>(catalog: &'a [Module], id: &ModuleId) -> Option<&'a Module> {
    catalog.iter().find(|module| module.id() == id)
}
