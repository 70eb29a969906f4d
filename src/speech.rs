//! Notification port: best-effort spoken feedback.
//!
//! Structure:
//! - `Notifier` trait: the one-way port handlers' feedback is sent to
//! - Pure functions: backend detection, script/argument construction
//! - Effect functions: detached process launch, terminal bell
//!
//! Nothing here reports failure to the caller. A speech process that fails
//! to launch, hangs, or crashes never affects the keypad.

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use tracing::{debug, info};

use crate::types::{Feedback, Language, SpeechChoice, SpeechConfig};

// ============================================================================
// PORT
// ============================================================================

/// Best-effort, non-blocking audible feedback.
pub trait Notifier: Send {
    /// Render `text` as speech. Returns immediately; failures are swallowed.
    fn speak(&self, text: &str);

    /// Short confirmation sound.
    fn chime(&self) {
        ring_bell();
    }

    /// Deliver one keypad feedback: optional chime, then the phrase.
    fn announce(&self, feedback: &Feedback) {
        if feedback.chime {
            self.chime();
        }
        self.speak(&feedback.phrase);
    }
}

// ============================================================================
// BACKENDS
// ============================================================================

/// Speech facility chosen once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechBackend {
    /// Windows System.Speech through PowerShell.
    PowerShell { program: PathBuf },
    /// macOS `say`.
    Say { program: PathBuf },
    /// `espeak-ng` or `espeak`.
    Espeak { program: PathBuf },
    /// No speech facility: bell only.
    Bell,
    /// Silence.
    Off,
}

/// Executable names tried for the PowerShell backend, Windows first.
const POWERSHELL_NAMES: &[&str] = &["powershell.exe", "pwsh.exe", "powershell", "pwsh"];

const ESPEAK_NAMES: &[&str] = &["espeak-ng", "espeak"];

impl SpeechBackend {
    /// Pick the richest facility the platform offers.
    pub fn detect() -> SpeechBackend {
        let path = std::env::var_os("PATH").unwrap_or_default();
        SpeechBackend::detect_in(&path)
    }

    /// Resolve an explicit choice. Programs that are absent fall back to
    /// the bell so the keypad still gives audible feedback.
    pub fn from_choice(choice: SpeechChoice) -> SpeechBackend {
        let path = std::env::var_os("PATH").unwrap_or_default();
        SpeechBackend::resolve(choice, &path)
    }

    fn detect_in(path: &OsStr) -> SpeechBackend {
        if cfg!(windows) {
            if let Some(program) = find_program(path, POWERSHELL_NAMES) {
                return SpeechBackend::PowerShell { program };
            }
        }
        if cfg!(target_os = "macos") {
            if let Some(program) = find_program(path, &["say"]) {
                return SpeechBackend::Say { program };
            }
        }
        match find_program(path, ESPEAK_NAMES) {
            Some(program) => SpeechBackend::Espeak { program },
            None => SpeechBackend::Bell,
        }
    }

    fn resolve(choice: SpeechChoice, path: &OsStr) -> SpeechBackend {
        let found = match choice {
            SpeechChoice::Auto => return SpeechBackend::detect_in(path),
            SpeechChoice::Bell => return SpeechBackend::Bell,
            SpeechChoice::Off => return SpeechBackend::Off,
            SpeechChoice::PowerShell => find_program(path, POWERSHELL_NAMES)
                .map(|program| SpeechBackend::PowerShell { program }),
            SpeechChoice::Say => {
                find_program(path, &["say"]).map(|program| SpeechBackend::Say { program })
            }
            SpeechChoice::Espeak => {
                find_program(path, ESPEAK_NAMES).map(|program| SpeechBackend::Espeak { program })
            }
        };
        found.unwrap_or_else(|| {
            debug!(?choice, "speech program not on PATH, using bell");
            SpeechBackend::Bell
        })
    }
}

/// Build the notifier for a configuration.
pub fn create_notifier(config: &SpeechConfig) -> Box<dyn Notifier> {
    let backend = SpeechBackend::from_choice(config.choice);
    info!(?backend, language = config.language.culture(), "speech backend selected");

    match backend {
        SpeechBackend::Bell => Box::new(BellNotifier),
        SpeechBackend::Off => Box::new(SilentNotifier),
        backend => Box::new(ProcessSpeech {
            backend,
            language: config.language,
            voice: config.voice.clone(),
        }),
    }
}

/// Speaks by launching a detached OS process per utterance.
#[derive(Debug, Clone)]
pub struct ProcessSpeech {
    backend: SpeechBackend,
    language: Language,
    voice: Option<String>,
}

impl ProcessSpeech {
    /// Program and arguments for one utterance. None for non-process backends.
    pub fn command_line(&self, text: &str) -> Option<(OsString, Vec<String>)> {
        match &self.backend {
            SpeechBackend::PowerShell { program } => Some((
                program.clone().into_os_string(),
                vec![
                    "-NoProfile".to_string(),
                    "-Command".to_string(),
                    powershell_script(text, self.language),
                ],
            )),
            SpeechBackend::Say { program } => {
                let mut args = Vec::new();
                if let Some(voice) = &self.voice {
                    args.push("-v".to_string());
                    args.push(voice.clone());
                }
                args.push("--".to_string());
                args.push(text.to_string());
                Some((program.clone().into_os_string(), args))
            }
            SpeechBackend::Espeak { program } => {
                let voice = self
                    .voice
                    .clone()
                    .unwrap_or_else(|| espeak_voice(self.language).to_string());
                Some((
                    program.clone().into_os_string(),
                    vec!["-v".to_string(), voice, "--".to_string(), text.to_string()],
                ))
            }
            SpeechBackend::Bell | SpeechBackend::Off => None,
        }
    }
}

impl Notifier for ProcessSpeech {
    fn speak(&self, text: &str) {
        if let Some((program, args)) = self.command_line(text) {
            let mut command = Command::new(program);
            command.args(args);
            spawn_detached(command);
        }
    }
}

/// Degraded substitute: a bell instead of speech.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn speak(&self, _text: &str) {
        ring_bell();
    }

    /// One bell per feedback, chime or not.
    fn announce(&self, _feedback: &Feedback) {
        ring_bell();
    }
}

/// No audible feedback at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn speak(&self, _text: &str) {}

    fn chime(&self) {}
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// Escape text for a single-quoted PowerShell string literal.
pub fn escape_powershell(text: &str) -> String {
    text.replace('\'', "''")
}

/// System.Speech script preferring an adult female voice for the language.
///
/// Voice selection sits inside `try {}`: when no matching voice is
/// installed the synthesizer keeps its default voice.
pub fn powershell_script(text: &str, language: Language) -> String {
    format!(
        "Add-Type -AssemblyName System.Speech; \
         $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
         try {{ \
           $ci = [System.Globalization.CultureInfo]::GetCultureInfo('{culture}'); \
           $s.SelectVoiceByHints([System.Speech.Synthesis.VoiceGender]::Female, \
                                 [System.Speech.Synthesis.VoiceAge]::Adult, 0, $ci); \
         }} catch {{ }} \
         $s.Rate = 0; $s.Volume = 100; \
         $s.Speak('{text}');",
        culture = language.culture(),
        text = escape_powershell(text),
    )
}

fn espeak_voice(language: Language) -> &'static str {
    match language {
        Language::En => "en",
        Language::ZhTw => "cmn",
    }
}

/// First of `names` found as a file in the `PATH`-style list.
pub fn find_program(path_var: &OsStr, names: &[&str]) -> Option<PathBuf> {
    std::env::split_paths(path_var).find_map(|dir| {
        names
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Launch without waiting. A reaper thread collects the exit status so no
/// zombie is left behind; nobody observes it.
fn spawn_detached(mut command: Command) {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // New session: terminal signals (Ctrl+C, SIGHUP) are not delivered
        // to the speech process, and it never touches the TUI's terminal.
        unsafe {
            command.pre_exec(|| {
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
        }
    }

    match command.spawn() {
        Ok(mut child) => {
            thread::spawn(move || {
                let _ = child.wait();
            });
        }
        Err(e) => {
            debug!(program = ?command.get_program(), error = %e, "speech launch failed");
        }
    }
}

/// Terminal bell on stderr, so stdout output (JSON) stays clean.
pub fn ring_bell() {
    let mut stderr = io::stderr();
    let _ = stderr.write_all(b"\x07");
    let _ = stderr.flush();
}

// ============================================================================
// TESTS
// ============================================================================
