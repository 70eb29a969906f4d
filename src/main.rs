//! keypad-calc CLI
//!
//! Interactive keypad calculator with spoken feedback, plus headless
//! `eval` and `press` commands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use keypad_calc::eval::{evaluate, format_general, strip_whitespace, RESULT_PRECISION};
use keypad_calc::keypad::Keypad;
use keypad_calc::logging::{self, default_log_path, LogTarget};
use keypad_calc::report::{format_eval, format_session, EvalReport, SessionReport};
use keypad_calc::speech::{create_notifier, Notifier, SilentNotifier};
use keypad_calc::tui;
use keypad_calc::types::{
    AppConfig, Language, OutputFormat, SpeechChoice, SpeechConfig, ThemeMode, BACKSPACE_LABEL,
};

#[derive(Parser)]
#[command(name = "keypad-calc")]
#[command(about = "Keypad calculator with light/dark themes and spoken feedback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive keypad (default)
    Run(RunArgs),

    /// Evaluate an expression and print the result
    Eval {
        /// Arithmetic expression, e.g. "(1 + 2) * 3"
        expression: String,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,
    },

    /// Replay button presses through the keypad and print the outcome
    Press {
        /// Button labels; every character is one press (whitespace ignored).
        /// Use "<" or "⌫" for backspace.
        #[arg(required = true)]
        keys: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormatArg,

        /// Speak the feedback as well as printing it
        #[arg(long)]
        speak: bool,

        /// Language for spoken phrases
        #[arg(long, value_enum, default_value = "en")]
        lang: LanguageArg,
    },
}

#[derive(Args, Default)]
struct RunArgs {
    /// Start in the dark theme
    #[arg(long)]
    dark: bool,

    /// Language for spoken phrases
    #[arg(long, value_enum, default_value = "en")]
    lang: LanguageArg,

    /// Speech backend
    #[arg(long, value_enum, default_value = "auto")]
    speech: SpeechArg,

    /// Voice name for `say`/`espeak`
    #[arg(long)]
    voice: Option<String>,

    /// Log file (default: cache directory)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormatArg {
    Human,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Human => OutputFormat::Human,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum LanguageArg {
    #[default]
    En,
    ZhTw,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::ZhTw => Language::ZhTw,
        }
    }
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum SpeechArg {
    #[default]
    Auto,
    Powershell,
    Say,
    Espeak,
    Bell,
    Off,
}

impl From<SpeechArg> for SpeechChoice {
    fn from(arg: SpeechArg) -> Self {
        match arg {
            SpeechArg::Auto => SpeechChoice::Auto,
            SpeechArg::Powershell => SpeechChoice::PowerShell,
            SpeechArg::Say => SpeechChoice::Say,
            SpeechArg::Espeak => SpeechChoice::Espeak,
            SpeechArg::Bell => SpeechChoice::Bell,
            SpeechArg::Off => SpeechChoice::Off,
        }
    }
}

impl From<RunArgs> for AppConfig {
    fn from(args: RunArgs) -> Self {
        AppConfig {
            theme: if args.dark { ThemeMode::Dark } else { ThemeMode::Light },
            speech: SpeechConfig {
                choice: args.speech.into(),
                language: args.lang.into(),
                voice: args.voice,
            },
            log_file: args.log_file,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default())) {
        Commands::Run(args) => cmd_run(args.into()),
        Commands::Eval { expression, format } => cmd_eval(&expression, format.into()),
        Commands::Press { keys, format, speak, lang } => {
            cmd_press(&keys, format.into(), speak, lang.into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn cmd_run(config: AppConfig) -> Result<(), String> {
    let log_path = config.log_file.clone().unwrap_or_else(default_log_path);
    logging::init(&LogTarget::File(log_path)).map_err(|e| e.to_string())?;

    let notifier = create_notifier(&config.speech);
    tui::run(&config, notifier).map_err(|e| e.to_string())
}

fn cmd_eval(expression: &str, format: OutputFormat) -> Result<(), String> {
    logging::init(&LogTarget::Stderr).map_err(|e| e.to_string())?;

    let stripped = strip_whitespace(expression);
    if stripped.is_empty() {
        return Err("empty expression".to_string());
    }

    let outcome = evaluate(&stripped);
    let report = EvalReport {
        expression: stripped,
        result: outcome
            .as_ref()
            .ok()
            .map(|v| format_general(*v, RESULT_PRECISION)),
        error: outcome.as_ref().err().map(|e| e.to_string()),
    };

    match (format, outcome) {
        // Human errors go to stderr through the common error path
        (OutputFormat::Human, Err(e)) => Err(e.to_string()),
        (_, outcome) => {
            print!("{}", format_eval(&report, format));
            outcome.map(|_| ()).map_err(|e| e.to_string())
        }
    }
}

fn cmd_press(
    keys: &[String],
    format: OutputFormat,
    speak: bool,
    language: Language,
) -> Result<(), String> {
    logging::init(&LogTarget::Stderr).map_err(|e| e.to_string())?;

    let notifier: Box<dyn Notifier> = if speak {
        create_notifier(&SpeechConfig {
            language,
            ..Default::default()
        })
    } else {
        Box::new(SilentNotifier)
    };

    let mut keypad = Keypad::new(language);
    let mut report = SessionReport::default();

    for label in key_labels(keys) {
        match keypad.press_label(&label) {
            Some(feedback) => {
                notifier.announce(&feedback);
                report.keys.push(label);
                report.feedback.push(feedback);
            }
            None => {
                debug!(label = %label, "unknown key ignored");
                report.ignored.push(label);
            }
        }
    }

    report.display = keypad.display().to_string();
    report.theme = keypad.theme();

    print!("{}", format_session(&report, format));
    Ok(())
}

/// Split arguments into one label per character. `<` stands for backspace
/// since the glyph is awkward to type in a shell.
fn key_labels(keys: &[String]) -> Vec<String> {
    keys.iter()
        .flat_map(|arg| arg.chars())
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '<' => BACKSPACE_LABEL.to_string(),
            c => c.to_string(),
        })
        .collect()
}
