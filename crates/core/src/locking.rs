use crate::model::{Module, ProgressMap};

/// Whether the lesson at `index` is locked for selection.
///
/// The first lesson is never locked. Any later lesson is locked until every
/// lesson before it has a completed record. Indexes past the end of the
/// lesson list are reported as locked so they can never be selected.
///
/// This is a display gate only: completions the backend reports for locked
/// lessons are still accepted into the progress map.
#[must_use]
pub fn is_locked(module: &Module, progress: &ProgressMap, index: usize) -> bool {
    let lessons = module.lessons();
    if index >= lessons.len() {
        return true;
    }
    lessons[..index]
        .iter()
        .any(|prior| !progress.is_completed(module.id(), prior.id()))
}

/// Lock flags for every lesson of a module, in lesson order.
#[must_use]
pub fn lock_flags(module: &Module, progress: &ProgressMap) -> Vec<bool> {
    let mut all_prior_completed = true;
    module
        .lessons()
        .iter()
        .map(|lesson| {
            let locked = !all_prior_completed;
            all_prior_completed &= progress.is_completed(module.id(), lesson.id());
            locked
        })
        .collect()
}
