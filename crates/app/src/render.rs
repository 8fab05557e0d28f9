//! Plain-text output for the view models.

use ui::vm::{
    AnalysisVm, AreaChipVm, BubbleTone, CaseCardVm, DashboardVm, LessonDetailVm, LessonRowVm,
    MessageBubbleVm, ModuleCardVm, ModuleListVm, NO_MODULES_IN_PROGRESS, ProgressBarVm,
    RecentItemVm, SavedAnalysisVm, SectionBody, html_to_markdown,
};

const BAR_WIDTH: usize = 20;

pub fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(title.chars().count()));
}

pub fn module_cards(cards: &[ModuleCardVm]) {
    for card in cards {
        let badge = if card.completed { "  ✓ Completed" } else { "" };
        println!("{} {}  [{}]{badge}", card.icon, card.title, card.id);
        if !card.description.is_empty() {
            println!("    {}", card.description);
        }
        println!(
            "    {} · {} · {}  {}",
            card.lessons_label,
            card.difficulty_label,
            card.duration,
            card.progress.render(BAR_WIDTH)
        );
    }
}

pub fn module_list(list: &ModuleListVm) {
    heading("Learning Modules");
    if let Some(empty) = &list.empty {
        println!("{}", empty.title);
        println!("{}", empty.hint);
        if empty.offer_clear_filters {
            println!("Run `modules` without --difficulty or --sort to clear filters.");
        }
    }
    module_cards(&list.cards);

    if let Some(continuing) = &list.continue_learning {
        heading("Continue Learning");
        if continuing.is_empty() {
            println!("{NO_MODULES_IN_PROGRESS}");
        } else {
            module_cards(continuing);
        }
    }
}

pub fn lesson_rows(rows: &[LessonRowVm]) {
    if rows.is_empty() {
        println!("No lessons available for this module yet.");
        return;
    }
    for row in rows {
        println!("  {:>2}  {}  [{}]", row.badge.symbol(), row.title, row.id);
        let mut meta = vec![row.description.clone()];
        meta.extend(row.duration.clone());
        meta.extend(row.completed_label.clone());
        println!("      {}", meta.join(" · "));
    }
}

pub fn lesson_detail(detail: &LessonDetailVm) {
    println!("{}", detail.breadcrumb.join(" › "));
    heading(&detail.title);
    if !detail.description.is_empty() {
        println!("{}", detail.description);
    }
    println!("Status: {}", detail.action_label);
    println!();
    print!("{}", html_to_markdown(&detail.body_html));
}

pub fn progress(label: &str, bar: ProgressBarVm) {
    println!("{label}: {}", bar.render(BAR_WIDTH));
}

pub fn transcript(bubbles: &[MessageBubbleVm]) {
    for bubble in bubbles {
        let who = match bubble.tone {
            BubbleTone::User => "You",
            BubbleTone::Assistant => "Tutor",
            BubbleTone::Error => "Tutor (error)",
        };
        println!("{who} · {}", bubble.sent_at_str);
        for line in bubble.content.lines() {
            println!("  {line}");
        }
        if !bubble.sources.is_empty() {
            println!("  Sources:");
            for source in &bubble.sources {
                println!("  • {source}");
            }
        }
        println!();
    }
}

pub fn analysis(vm: &AnalysisVm) {
    heading(vm.heading);
    for section in &vm.sections {
        println!();
        println!("{}", section.heading);
        match &section.body {
            SectionBody::Text(text) => println!("  {text}"),
            SectionBody::List(items) => {
                for item in items {
                    println!("  • {item}");
                }
            }
        }
    }
}

pub fn case_cards(cards: &[CaseCardVm]) {
    for card in cards {
        println!();
        println!("{}  ({})", card.title, card.area_label);
        if let Some(citation) = &card.citation {
            println!("  {citation}");
        }
        println!("  {}", card.summary_preview);
        if !card.facts.is_empty() {
            println!("  {}", card.facts.join("  "));
        }
    }
}

pub fn area_chips(chips: &[AreaChipVm]) {
    for chip in chips {
        let marker = if chip.selected { "*" } else { " " };
        println!("{marker} {:<24} {}", chip.id, chip.label);
    }
}

pub fn saved_analyses(items: &[SavedAnalysisVm]) {
    if items.is_empty() {
        println!("No analyses yet.");
        return;
    }
    for item in items {
        println!();
        println!("{}  [{}]", item.title, item.method_badge);
        if let Some(date) = &item.analyzed_on {
            println!("  {date}");
        }
        if let Some(summary) = &item.summary_preview {
            println!("  Case Summary: {summary}");
        }
        if let Some(confidence) = &item.confidence_label {
            println!("  {confidence}");
        }
    }
}

pub fn dashboard(vm: &DashboardVm) {
    heading("Learning Progress");
    if vm.stats_fallback {
        println!("(stats unavailable, showing defaults)");
    }
    println!(
        "Total lessons: {}  Completed: {}  Active modules: {}",
        vm.total_lessons, vm.completed_lessons, vm.active_modules
    );
    progress("Completion", vm.completion);

    heading("Recent Conversations");
    recent(&vm.recent_sessions, "No recent conversations");
    heading("Recent Analyses");
    recent(&vm.recent_analyses, "No recent analyses");
}

fn recent(items: &[RecentItemVm], empty: &str) {
    if items.is_empty() {
        println!("{empty}");
        return;
    }
    for item in items {
        match &item.date_str {
            Some(date) => println!("• {}  ({date})", item.title),
            None => println!("• {}", item.title),
        }
    }
}
