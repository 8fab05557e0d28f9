mod case_vm;
mod chat_vm;
mod dashboard_vm;
mod markdown_vm;
mod module_vm;
mod progress_vm;
mod time_fmt;

pub use case_vm::{
    AnalysisSectionVm, AnalysisVm, AreaChipVm, CASE_SUMMARY_PREVIEW, CaseCardVm,
    SAVED_SUMMARY_PREVIEW, SavedAnalysisVm, SectionBody, build_case_card, build_saved_analysis,
    map_area_chips, map_case_cards, map_saved_analyses,
};
pub use chat_vm::{BUBBLE_SOURCE_LIMIT, BubbleTone, MessageBubbleVm, map_transcript};
pub use dashboard_vm::{DashboardVm, RecentItemVm};
pub use markdown_vm::{
    PLACEHOLDER_OBJECTIVES, html_to_markdown, lesson_body_html, looks_like_html, markdown_to_html,
    normalize_markdown, sanitize_html, strip_html_tags,
};
pub use module_vm::{
    CATALOG_CRUMB, EmptyStateVm, LESSON_DESCRIPTION_FALLBACK, LessonBadge, LessonDetailVm,
    LessonRowVm, ModuleCardVm, ModuleListVm, NO_MODULES_IN_PROGRESS, build_lesson_detail,
    map_lesson_rows, map_module_cards,
};
pub use progress_vm::ProgressBarVm;
pub use time_fmt::{format_date, format_datetime};
