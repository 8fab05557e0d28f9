mod case;
mod chat;
mod ids;
mod module;
mod progress;
mod stats;

pub use ids::{LessonId, MessageId, ModuleId, ParseIdError};

pub use case::{
    AnalysisType, CaseAnalysis, CaseRecord, IracAnalysis, LegalArea, SavedAnalysis,
    UnknownAnalysisType,
};
pub use chat::{CHAT_ERROR_REPLY, ChatMessage, ChatReply, ChatRole, ChatSession, ChatTopic};
pub use module::{
    DEFAULT_DURATION, DEFAULT_ICON, Difficulty, Lesson, Module, ModuleError, ModulePatch,
    UnknownDifficulty,
};
pub use progress::{ProgressMap, ProgressRecord};
pub use stats::LearningStats;
