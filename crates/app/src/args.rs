use std::fmt;
use std::path::PathBuf;

use backend::{SearchKind, UnknownSearchKind};
use legal_core::catalog::SpecParseError;
use legal_core::model::{AnalysisType, LessonId, ModuleId, UnknownAnalysisType};
use legal_core::{DifficultyFilter, SortKey};

#[derive(Debug)]
pub enum ArgsError {
    HelpRequested,
    MissingCommand,
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    Conflicting { first: &'static str, second: &'static str },
    Invalid(legal_core::Error),
    InvalidSearchKind(UnknownSearchKind),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::HelpRequested => write!(f, "help requested"),
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::Conflicting { first, second } => {
                write!(f, "{first} cannot be combined with {second}")
            }
            ArgsError::Invalid(err) => write!(f, "{err}"),
            ArgsError::InvalidSearchKind(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SpecParseError> for ArgsError {
    fn from(err: SpecParseError) -> Self {
        ArgsError::Invalid(err.into())
    }
}

impl From<UnknownAnalysisType> for ArgsError {
    fn from(err: UnknownAnalysisType) -> Self {
        ArgsError::Invalid(err.into())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  legalmind [--api <url>] [--demo] <command> [args]");
    eprintln!();
    eprintln!("Learning:");
    eprintln!("  modules [--difficulty all|beginner|intermediate|advanced]");
    eprintln!("          [--sort recommended|progress|alphabetical|difficulty]");
    eprintln!("  module <module-id>");
    eprintln!("  lesson <module-id> <lesson-id>");
    eprintln!("  complete <module-id> <lesson-id>");
    eprintln!("  stats");
    eprintln!();
    eprintln!("Tutor:");
    eprintln!("  chat <message...> [--topic <topic>]");
    eprintln!("  topics");
    eprintln!();
    eprintln!("Cases:");
    eprintln!("  analyze (<text...> | --file <path>) [--type irac|brief|summary]");
    eprintln!("  cases (--query <q> | --area <area>)");
    eprintln!("  areas");
    eprintln!("  history");
    eprintln!();
    eprintln!("Other:");
    eprintln!("  search <query...> [--type all|cases|modules]");
    eprintln!("  dashboard");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEGALMIND_API_URL, LEGALMIND_API_KEY, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseQuery {
    Search(String),
    Area(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeInput {
    Text(String),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Modules {
        filter: DifficultyFilter,
        sort: SortKey,
    },
    Module {
        module: ModuleId,
    },
    Lesson {
        module: ModuleId,
        lesson: LessonId,
    },
    Complete {
        module: ModuleId,
        lesson: LessonId,
    },
    Stats,
    Chat {
        message: String,
        topic: Option<String>,
    },
    Topics,
    Analyze {
        input: AnalyzeInput,
        analysis_type: AnalysisType,
    },
    Cases(CaseQuery),
    Areas,
    History,
    Search {
        query: String,
        kind: SearchKind,
    },
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub api_url: Option<String>,
    pub demo: bool,
    pub command: Command,
}

/// Command-scoped `--flag value` pairs, consumed as each command is built.
#[derive(Default)]
struct Options(Vec<(&'static str, String)>);

impl Options {
    fn take(&mut self, flag: &'static str) -> Option<String> {
        let index = self.0.iter().position(|(name, _)| *name == flag)?;
        Some(self.0.remove(index).1)
    }

    fn finish(self) -> Result<(), ArgsError> {
        match self.0.into_iter().next() {
            Some((flag, _)) => Err(ArgsError::UnknownArg(flag.to_owned())),
            None => Ok(()),
        }
    }
}

const COMMAND_FLAGS: [&str; 7] = [
    "--difficulty",
    "--sort",
    "--topic",
    "--type",
    "--file",
    "--query",
    "--area",
];

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter();
        let mut api_url = None;
        let mut demo = false;
        let mut options = Options::default();
        let mut positionals = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => api_url = Some(require_value(&mut args, "--api")?),
                "--demo" => demo = true,
                "--help" | "-h" => return Err(ArgsError::HelpRequested),
                flag if flag.starts_with("--") => {
                    let Some(known) = COMMAND_FLAGS.iter().copied().find(|known| *known == flag)
                    else {
                        return Err(ArgsError::UnknownArg(arg));
                    };
                    let value = require_value(&mut args, known)?;
                    options.0.push((known, value));
                }
                _ => positionals.push(arg),
            }
        }

        let mut positionals = positionals.into_iter();
        let name = positionals.next().ok_or(ArgsError::MissingCommand)?;
        let rest: Vec<String> = positionals.collect();
        let command = build_command(&name, rest, &mut options)?;
        options.finish()?;

        Ok(Self {
            api_url,
            demo,
            command,
        })
    }
}

fn build_command(
    name: &str,
    rest: Vec<String>,
    options: &mut Options,
) -> Result<Command, ArgsError> {
    let command = match name {
        "modules" => {
            no_positionals(&rest)?;
            Command::Modules {
                filter: options
                    .take("--difficulty")
                    .map(|raw| raw.parse::<DifficultyFilter>())
                    .transpose()?
                    .unwrap_or_default(),
                sort: options
                    .take("--sort")
                    .map(|raw| raw.parse::<SortKey>())
                    .transpose()?
                    .unwrap_or_default(),
            }
        }
        "module" => {
            let [module] = exact(rest, ["module id"])?;
            Command::Module {
                module: ModuleId::new(module),
            }
        }
        "lesson" | "complete" => {
            let [module, lesson] = exact(rest, ["module id", "lesson id"])?;
            let (module, lesson) = (ModuleId::new(module), LessonId::new(lesson));
            if name == "lesson" {
                Command::Lesson { module, lesson }
            } else {
                Command::Complete { module, lesson }
            }
        }
        "stats" => simple(&rest, Command::Stats)?,
        "chat" => Command::Chat {
            message: joined(rest, "message")?,
            topic: options.take("--topic"),
        },
        "topics" => simple(&rest, Command::Topics)?,
        "analyze" => {
            let input = match options.take("--file") {
                Some(path) if rest.is_empty() => AnalyzeInput::File(PathBuf::from(path)),
                Some(_) => {
                    return Err(ArgsError::Conflicting {
                        first: "--file",
                        second: "case text",
                    });
                }
                None => AnalyzeInput::Text(joined(rest, "case text")?),
            };
            Command::Analyze {
                input,
                analysis_type: options
                    .take("--type")
                    .map(|raw| raw.parse::<AnalysisType>())
                    .transpose()?
                    .unwrap_or_default(),
            }
        }
        "cases" => {
            no_positionals(&rest)?;
            match (options.take("--query"), options.take("--area")) {
                (Some(query), None) => Command::Cases(CaseQuery::Search(query)),
                (None, Some(area)) => Command::Cases(CaseQuery::Area(area)),
                (Some(_), Some(_)) => {
                    return Err(ArgsError::Conflicting {
                        first: "--query",
                        second: "--area",
                    });
                }
                (None, None) => {
                    return Err(ArgsError::MissingArgument {
                        what: "--query or --area",
                    });
                }
            }
        }
        "areas" => simple(&rest, Command::Areas)?,
        "history" => simple(&rest, Command::History)?,
        "search" => Command::Search {
            query: joined(rest, "query")?,
            kind: options
                .take("--type")
                .map(|raw| raw.parse::<SearchKind>())
                .transpose()
                .map_err(ArgsError::InvalidSearchKind)?
                .unwrap_or_default(),
        },
        "dashboard" => simple(&rest, Command::Dashboard)?,
        other => return Err(ArgsError::UnknownCommand(other.to_owned())),
    };
    Ok(command)
}

fn no_positionals(rest: &[String]) -> Result<(), ArgsError> {
    match rest.first() {
        Some(extra) => Err(ArgsError::UnknownArg(extra.clone())),
        None => Ok(()),
    }
}

fn simple(rest: &[String], command: Command) -> Result<Command, ArgsError> {
    no_positionals(rest)?;
    Ok(command)
}

fn exact<const N: usize>(
    rest: Vec<String>,
    names: [&'static str; N],
) -> Result<[String; N], ArgsError> {
    if let Some(extra) = rest.get(N) {
        return Err(ArgsError::UnknownArg(extra.clone()));
    }
    let missing = names.get(rest.len()).copied();
    rest.try_into().map_err(|_| ArgsError::MissingArgument {
        what: missing.unwrap_or("argument"),
    })
}

fn joined(rest: Vec<String>, what: &'static str) -> Result<String, ArgsError> {
    let text = rest.join(" ");
    if text.trim().is_empty() {
        return Err(ArgsError::MissingArgument { what });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Args, ArgsError> {
        Args::parse(line.split_whitespace().map(str::to_owned))
    }

    #[test]
    fn modules_accepts_filter_and_sort() {
        let args = parse("--demo modules --difficulty advanced --sort alphabetical").unwrap();
        assert!(args.demo);
        assert_eq!(
            args.command,
            Command::Modules {
                filter: DifficultyFilter::Advanced,
                sort: SortKey::Alphabetical,
            }
        );
    }

    #[test]
    fn global_flags_may_follow_the_command() {
        let args = parse("complete contracts offer --api http://example.test/api").unwrap();
        assert_eq!(args.api_url.as_deref(), Some("http://example.test/api"));
        assert_eq!(
            args.command,
            Command::Complete {
                module: ModuleId::new("contracts"),
                lesson: LessonId::new("offer"),
            }
        );
    }

    #[test]
    fn chat_joins_words() {
        let args = parse("chat what is consideration --topic contracts").unwrap();
        assert_eq!(
            args.command,
            Command::Chat {
                message: "what is consideration".into(),
                topic: Some("contracts".into()),
            }
        );
    }

    #[test]
    fn analyze_reads_text_or_file() {
        let args = parse("analyze --file brief.txt --type brief").unwrap();
        assert_eq!(
            args.command,
            Command::Analyze {
                input: AnalyzeInput::File(PathBuf::from("brief.txt")),
                analysis_type: AnalysisType::Brief,
            }
        );
        assert!(matches!(
            parse("analyze some text --file brief.txt"),
            Err(ArgsError::Conflicting { .. })
        ));
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            parse("modules --sort newest"),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(
            parse("analyze text --type essay"),
            Err(ArgsError::Invalid(_))
        ));
        assert!(matches!(
            parse("search torts --type people"),
            Err(ArgsError::InvalidSearchKind(_))
        ));
    }

    #[test]
    fn misplaced_or_missing_arguments() {
        assert!(matches!(parse(""), Err(ArgsError::MissingCommand)));
        assert!(matches!(
            parse("lesson contracts"),
            Err(ArgsError::MissingArgument { what: "lesson id" })
        ));
        assert!(matches!(
            parse("stats --topic x"),
            Err(ArgsError::UnknownArg(flag)) if flag == "--topic"
        ));
        assert!(matches!(
            parse("cases"),
            Err(ArgsError::MissingArgument { .. })
        ));
        assert!(matches!(parse("dance"), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(parse("--api"), Err(ArgsError::MissingValue { .. })));
    }
}
