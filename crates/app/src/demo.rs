use backend::InMemoryBackend;
use legal_core::Clock;
use legal_core::model::{
    CaseRecord, ChatTopic, Difficulty, LegalArea, Lesson, LessonId, Module, ModuleError,
    ModuleId,
};

/// In-memory backend seeded with a small catalog, for running without a server.
pub fn backend(clock: Clock) -> Result<InMemoryBackend, ModuleError> {
    let backend = InMemoryBackend::new().with_clock(clock);
    backend.set_catalog(catalog()?);
    backend.set_topics(vec![
        topic("contracts", "Contract Law"),
        topic("torts", "Tort Law"),
        topic("constitutional", "Constitutional Law"),
    ]);
    backend.set_areas(vec![
        area("contract_law"),
        area("tort_law"),
        area("constitutional_law"),
    ]);
    backend.set_cases(vec![
        CaseRecord {
            id: Some("hamer-v-sidway".into()),
            title: "Hamer v. Sidway".into(),
            citation: Some("124 N.Y. 538".into()),
            court: Some("New York Court of Appeals".into()),
            year: Some(1891),
            area_of_law: Some("contract_law".into()),
            summary: "Forbearance from a legal right is sufficient consideration.".into(),
        },
        CaseRecord {
            id: Some("palsgraf".into()),
            title: "Palsgraf v. Long Island Railroad Co.".into(),
            citation: Some("248 N.Y. 339".into()),
            court: Some("New York Court of Appeals".into()),
            year: Some(1928),
            area_of_law: Some("tort_law".into()),
            summary: "A duty of care is owed only to foreseeable plaintiffs.".into(),
        },
    ]);
    Ok(backend)
}

fn catalog() -> Result<Vec<Module>, ModuleError> {
    Ok(vec![
        Module::new(
            ModuleId::new("contracts"),
            "Contract Law Fundamentals",
            Difficulty::Beginner,
            vec![
                lesson("offer", "Offer", "What makes a communication an offer"),
                lesson("acceptance", "Acceptance", "Mirror image rule and mailbox rule"),
                lesson("consideration", "Consideration", "Bargained-for exchange"),
            ],
        )?
        .with_description("Formation, performance and breach of contracts.")
        .with_icon(Some("📜".into())),
        Module::new(
            ModuleId::new("torts"),
            "Torts",
            Difficulty::Intermediate,
            vec![
                lesson("negligence", "Negligence", "Duty, breach, causation, damages"),
                lesson("strict-liability", "Strict Liability", "Abnormally dangerous activities"),
            ],
        )?
        .with_description("Civil wrongs and the remedies for them.")
        .with_icon(Some("⚖️".into())),
        Module::new(
            ModuleId::new("constitutional"),
            "Constitutional Law",
            Difficulty::Advanced,
            vec![
                lesson("judicial-review", "Judicial Review", "Marbury v. Madison"),
                lesson("commerce-clause", "Commerce Clause", "Scope of federal power"),
            ],
        )?
        .with_description("Structure of government and individual rights.")
        .with_duration(Some("4-5 hours".into()))
        .with_icon(Some("🏛️".into())),
    ])
}

fn lesson(id: &str, title: &str, description: &str) -> Lesson {
    Lesson::new(LessonId::new(id), title).with_description(description)
}

fn topic(id: &str, name: &str) -> ChatTopic {
    ChatTopic {
        id: id.into(),
        name: name.into(),
    }
}

fn area(id: &str) -> LegalArea {
    LegalArea {
        id: id.into(),
        name: id.into(),
    }
}
