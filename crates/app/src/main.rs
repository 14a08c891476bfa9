use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;

use api::{FileTokenStore, HttpBackend, TokenStore};
use quiz_core::Clock;
use services::{
    AuthService, FieldService, PaymentService, QuestionService, QuizFlowService,
};
use ui::{App, UiApp, build_app_context};

const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiBase { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiBase { raw } => write!(f, "invalid --api-base value: {raw}"),
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

struct DesktopApp {
    auth: Arc<AuthService>,
    fields: Arc<FieldService>,
    questions: Arc<QuestionService>,
    payments: Arc<PaymentService>,
    quiz_flow: Arc<QuizFlowService>,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    fn fields(&self) -> Arc<FieldService> {
        Arc::clone(&self.fields)
    }

    fn questions(&self) -> Arc<QuestionService> {
        Arc::clone(&self.questions)
    }

    fn payments(&self) -> Arc<PaymentService> {
        Arc::clone(&self.payments)
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }
}

struct Args {
    api_base: String,
    token_file: PathBuf,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui [--api-base <url>] [--token-file <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-base {DEFAULT_API_BASE}");
    eprintln!("  --token-file <platform data dir>/mytestbuddies/token");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MTB_API_BASE, MTB_TOKEN_FILE");
}

fn default_token_file() -> PathBuf {
    // Keep the token next to the user's other app data, falling back to
    // the working directory when no home is known.
    let base = std::env::var_os("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".local/share"))
        })
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("mytestbuddies").join("token")
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_base = std::env::var("MTB_API_BASE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let mut token_file = std::env::var_os("MTB_TOKEN_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(default_token_file);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-base" => {
                    let value = require_value(args, "--api-base")?;
                    if value.trim().is_empty() || !value.starts_with("http") {
                        return Err(ArgsError::InvalidApiBase { raw: value });
                    }
                    api_base = value;
                }
                "--token-file" => {
                    token_file = PathBuf::from(require_value(args, "--token-file")?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api_base,
            token_file,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launch the UI when no subcommand is provided.
    match argv.first().map(String::as_str) {
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("ui") => {
            argv.remove(0);
        }
        Some(first) if !first.starts_with("--") => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(Box::new(ArgsError::UnknownArg(first.to_string())));
        }
        _ => {}
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(&mut iter).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    tracing::info!(api_base = %args.api_base, "starting MyTestBuddies client");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(args.token_file));
    let backend = Arc::new(HttpBackend::new(args.api_base, Arc::clone(&tokens)));
    let clock = Clock::default_clock();

    let app = DesktopApp {
        auth: Arc::new(AuthService::new(backend.clone(), Arc::clone(&tokens))),
        fields: Arc::new(FieldService::new(backend.clone())),
        questions: Arc::new(QuestionService::new(backend.clone())),
        payments: Arc::new(PaymentService::new(backend.clone())),
        quiz_flow: Arc::new(QuizFlowService::new(clock, backend.clone(), backend)),
    };

    let context = build_app_context(&(Arc::new(app) as Arc<dyn UiApp>));

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("MyTestBuddies")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
