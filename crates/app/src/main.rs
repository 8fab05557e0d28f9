#![forbid(unsafe_code)]

mod args;
mod demo;
mod render;

use std::error::Error;

use args::{AnalyzeInput, Args, ArgsError, CaseQuery, Command, print_usage};
use backend::BackendConfig;
use legal_core::model::{LessonId, ModuleId};
use legal_core::{Clock, DifficultyFilter, SortKey, Transition};
use services::{AppServices, LearningService};
use tracing_subscriber::EnvFilter;
use ui::vm::{
    AnalysisVm, DashboardVm, ModuleListVm, ProgressBarVm, build_lesson_detail, map_area_chips,
    map_case_cards, map_lesson_rows, map_saved_analyses, map_transcript,
};

type CliResult = Result<(), Box<dyn Error>>;

fn init_tracing() {
    // RUST_LOG wins; otherwise info for our crates and warn for the HTTP stack.
    let default_filter = format!(
        "{}=info,backend=info,services=info,reqwest=warn",
        env!("CARGO_BIN_NAME")
    );
    let env_filter = std::env::var("RUST_LOG").unwrap_or(default_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_services(args: &Args) -> Result<AppServices, Box<dyn Error>> {
    let clock = Clock::System;
    if args.demo {
        tracing::info!("using in-memory demo backend");
        return Ok(AppServices::in_memory(demo::backend(clock)?, clock));
    }

    let mut config = BackendConfig::from_env()?;
    if let Some(url) = &args.api_url {
        let api_key = config.api_key().map(str::to_owned);
        config = BackendConfig::new(url)?.with_api_key(api_key);
    }
    tracing::debug!(base_url = %config.base_url(), "using REST backend");
    Ok(AppServices::http(config, clock)?)
}

async fn run(args: Args) -> CliResult {
    let services = build_services(&args)?;

    match args.command {
        Command::Modules { filter, sort } => list_modules(&services, filter, sort).await,
        Command::Module { module } => show_module(&services, &module).await,
        Command::Lesson { module, lesson } => show_lesson(&services, &module, &lesson).await,
        Command::Complete { module, lesson } => {
            complete_lesson(&services, &module, &lesson).await
        }
        Command::Stats => show_stats(&services).await,
        Command::Chat { message, topic } => chat(&services, &message, topic).await,
        Command::Topics => {
            for topic in services.chat().topics().await {
                println!("{:<20} {}", topic.id, topic.name);
            }
            Ok(())
        }
        Command::Analyze {
            input,
            analysis_type,
        } => {
            let text = match input {
                AnalyzeInput::Text(text) => text,
                AnalyzeInput::File(path) => std::fs::read_to_string(&path)?,
            };
            let analysis = services
                .cases()
                .analyze(&text, analysis_type)
                .await
                .map_err(|err| err.user_message())?;
            render::analysis(&AnalysisVm::from(&analysis));
            Ok(())
        }
        Command::Cases(query) => find_cases(&services, query).await,
        Command::Areas => {
            let cases = services.cases();
            let areas = cases
                .legal_areas()
                .await
                .map_err(|err| err.user_message())?;
            render::area_chips(&map_area_chips(&areas, &cases.selected_area()));
            Ok(())
        }
        Command::History => {
            let analyses = services
                .cases()
                .user_analyses()
                .await
                .map_err(|err| err.user_message())?;
            render::heading("Your Case Analyses");
            render::saved_analyses(&map_saved_analyses(&analyses));
            Ok(())
        }
        Command::Search { query, kind } => {
            let results = services
                .search()
                .search(&query, kind)
                .await
                .map_err(|err| err.user_message())?;
            for item in &results {
                let kind = item.get("type").and_then(|v| v.as_str()).unwrap_or("result");
                let title = ["title", "name", "id"]
                    .iter()
                    .find_map(|key| item.get(*key).and_then(|v| v.as_str()))
                    .unwrap_or("(untitled)");
                println!("[{kind}] {title}");
            }
            if results.is_empty() {
                println!("No results for \"{query}\".");
            }
            Ok(())
        }
        Command::Dashboard => {
            let dashboard = services.dashboard().load().await;
            render::dashboard(&DashboardVm::from(&dashboard));
            Ok(())
        }
    }
}

//
// ─── LEARNING ──────────────────────────────────────────────────────────────────
//

async fn load_learning(services: &AppServices) -> Result<std::sync::Arc<LearningService>, String> {
    let learning = services.learning();
    learning.load().await.map_err(|err| err.user_message())?;
    Ok(learning)
}

async fn open_module(learning: &LearningService, module: &ModuleId) -> CliResult {
    if learning.select_module(module).await == Transition::Ignored {
        return Err(format!("module not found: {module}").into());
    }
    if let Some(message) = learning.last_error() {
        tracing::warn!(%module, %message, "showing module summary only");
    }
    Ok(())
}

fn open_lesson(learning: &LearningService, module: &ModuleId, lesson: &LessonId) -> CliResult {
    if learning.select_lesson(lesson) == Transition::Ignored {
        return Err(format!("lesson {lesson} is locked or not part of {module}").into());
    }
    Ok(())
}

async fn list_modules(services: &AppServices, filter: DifficultyFilter, sort: SortKey) -> CliResult {
    let learning = load_learning(services).await?;
    learning.set_filter(filter);
    learning.set_sort(sort);

    let list = learning.with_state(|state| ModuleListVm::from(state));
    render::module_list(&list);
    Ok(())
}

async fn show_module(services: &AppServices, module: &ModuleId) -> CliResult {
    let learning = load_learning(services).await?;
    open_module(&learning, module).await?;

    learning.with_state(|state| {
        if let Some(selected) = state.selected_module() {
            render::heading(selected.title());
            if !selected.description().is_empty() {
                println!("{}", selected.description());
            }
            let percentage = legal_core::module_percentage(selected, state.progress());
            render::progress("Progress", ProgressBarVm::new(percentage));
            render::heading("Lessons");
            render::lesson_rows(&map_lesson_rows(selected, state.progress()));
        }
    });
    Ok(())
}

async fn show_lesson(services: &AppServices, module: &ModuleId, lesson: &LessonId) -> CliResult {
    let learning = load_learning(services).await?;
    open_module(&learning, module).await?;
    open_lesson(&learning, module, lesson)?;

    if let Some(detail) = learning.with_state(build_lesson_detail) {
        render::lesson_detail(&detail);
    }
    Ok(())
}

async fn complete_lesson(services: &AppServices, module: &ModuleId, lesson: &LessonId) -> CliResult {
    let learning = load_learning(services).await?;
    open_module(&learning, module).await?;
    open_lesson(&learning, module, lesson)?;

    learning
        .complete_lesson()
        .await
        .map_err(|err| err.user_message())?;

    learning.with_state(|state| {
        if let (Some(selected), Some(done)) = (state.selected_module(), state.selected_lesson()) {
            println!("✓ Completed \"{}\"", done.title());
            let percentage = legal_core::module_percentage(selected, state.progress());
            render::progress(selected.title(), ProgressBarVm::new(percentage));
            render::lesson_rows(&map_lesson_rows(selected, state.progress()));
        }
    });
    Ok(())
}

async fn show_stats(services: &AppServices) -> CliResult {
    let learning = services.learning();
    learning
        .refresh_stats()
        .await
        .map_err(|err| err.user_message())?;

    learning.with_state(|state| {
        if let Some(stats) = state.stats().ready() {
            println!(
                "Total lessons: {}  Completed: {}  Active modules: {}",
                stats.total_lessons, stats.completed_lessons, stats.active_modules
            );
            render::progress("Completion", ProgressBarVm::from_rate(stats.completion_rate));
        }
    });
    Ok(())
}

//
// ─── TUTOR & CASES ─────────────────────────────────────────────────────────────
//

async fn chat(services: &AppServices, message: &str, topic: Option<String>) -> CliResult {
    let chat = services.chat();
    chat.set_topic(topic);
    let topic = chat.current_topic();
    let result = chat.send(message, topic.as_deref()).await;

    render::transcript(&map_transcript(&chat.transcript()));
    if let Some(topic) = chat.current_topic() {
        println!("Topic: {topic}");
    }
    result.map_err(|err| err.user_message())?;
    Ok(())
}

async fn find_cases(services: &AppServices, query: CaseQuery) -> CliResult {
    let cases = services.cases();
    let found = match &query {
        CaseQuery::Search(text) => cases.search(text).await,
        CaseQuery::Area(area) => cases.by_area(area).await,
    }
    .map_err(|err| err.user_message())?;

    if found.is_empty() {
        println!("No cases found. Try adjusting your search terms or browse by legal area.");
        return Ok(());
    }
    render::heading(&format!("Search Results ({})", found.len()));
    render::case_cards(&map_case_cards(&found));
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(ArgsError::HelpRequested) => {
            print_usage();
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };

    if let Err(err) = run(args).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::Operation;
    use legal_core::time::fixed_clock;

    async fn demo_learning() -> std::sync::Arc<LearningService> {
        let services = AppServices::in_memory(demo::backend(fixed_clock()).unwrap(), fixed_clock());
        load_learning(&services).await.unwrap()
    }

    #[tokio::test]
    async fn filtered_listing_still_shows_continue_learning() {
        let learning = demo_learning().await;
        learning.set_filter(DifficultyFilter::Advanced);

        let list = learning.with_state(|state| ModuleListVm::from(state));

        assert_eq!(list.cards.len(), 1);
        assert_eq!(list.empty, None);
        assert_eq!(list.continue_learning, Some(Vec::new()));
    }

    #[tokio::test]
    async fn stale_load_error_does_not_leak_into_module_view() {
        let backend = demo::backend(fixed_clock()).unwrap();
        backend.fail(Operation::Progress, "progress offline");
        let services = AppServices::in_memory(backend.clone(), fixed_clock());
        let learning = load_learning(&services).await.unwrap();
        assert_eq!(learning.last_error().as_deref(), Some("progress offline"));

        open_module(&learning, &ModuleId::new("contracts")).await.unwrap();

        assert_eq!(learning.last_error(), None);
    }
}
