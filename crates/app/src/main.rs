use std::fmt;
use std::path::PathBuf;

use quiz_core::QuizConfigDraft;
use quiz_core::model::Question;
use services::{AppServices, Clock, parse_question_bank};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod terminal;

const BUNDLED_QUESTIONS: &str = include_str!("../data/questions.json");

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTimeLimit { raw: String },
    InvalidEnv { var: &'static str, raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTimeLimit { raw } => {
                write!(f, "invalid --time-limit value: {raw}")
            }
            ArgsError::InvalidEnv { var, raw } => write!(f, "invalid {var} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- play        [--db <sqlite_url>] [--questions <file>] [--time-limit <secs>] [--name <player>]"
    );
    eprintln!("  cargo run -p app -- leaderboard [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults for play:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --questions <bundled question bank>");
    eprintln!("  --time-limit 30");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_TIME_LIMIT, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Play,
    Leaderboard,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "play" => Some(Self::Play),
            "leaderboard" | "scores" => Some(Self::Leaderboard),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    questions: Option<PathBuf>,
    time_limit: Option<u32>,
    name: Option<String>,
}

impl Args {
    /// Parse flags, falling back to `env` for unset values.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = env("QUIZ_DB_URL")
            .map_or_else(|| normalize_sqlite_url("quiz.sqlite3".into()), normalize_sqlite_url);
        let mut questions = env("QUIZ_QUESTIONS").map(PathBuf::from);
        let mut time_limit = env("QUIZ_TIME_LIMIT")
            .map(|value| {
                value.trim().parse::<u32>().map_err(|_| ArgsError::InvalidEnv {
                    var: "QUIZ_TIME_LIMIT",
                    raw: value.clone(),
                })
            })
            .transpose()?;
        let mut name = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--questions" => {
                    questions = Some(PathBuf::from(require_value(args, "--questions")?));
                }
                "--time-limit" => {
                    let value = require_value(args, "--time-limit")?;
                    let parsed: u32 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidTimeLimit { raw: value.clone() })?;
                    time_limit = Some(parsed);
                }
                "--name" => {
                    name = Some(require_value(args, "--name")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions,
            time_limit,
            name,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn load_questions(path: Option<&PathBuf>) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    let questions = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            parse_question_bank(&raw)?
        }
        None => parse_question_bank(BUNDLED_QUESTIONS)?,
    };
    tracing::debug!(count = questions.len(), "question bank loaded");
    Ok(questions)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means play.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Play,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Play,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let config = QuizConfigDraft {
        time_limit_secs: parsed.time_limit,
        ..QuizConfigDraft::new()
    }
    .validate()?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let app = AppServices::new_sqlite(&parsed.db_url, Clock::system(), config).await?;

    match cmd {
        Command::Play => {
            let questions = load_questions(parsed.questions.as_ref())?;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            terminal::play(&app, questions, parsed.name.as_deref(), &mut lines).await
        }
        Command::Leaderboard => {
            let board = app.leaderboard().ranked().await;
            terminal::print_board(&board, config.display_limit(), None);
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
