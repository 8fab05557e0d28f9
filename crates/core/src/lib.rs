#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod locking;
pub mod model;
pub mod navigation;
pub mod text;
pub mod time;

pub use catalog::{
    CONTINUE_LEARNING_LIMIT, DifficultyFilter, FilterSortSpec, ModuleView, SortKey,
    completion_percentage, continue_learning, module_percentage, project,
};
pub use error::Error;
pub use locking::{is_locked, lock_flags};
pub use navigation::{NavIntent, NavigationState, Transition};
pub use time::Clock;
