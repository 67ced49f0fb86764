//! Text-to-speech for the visible output
//!
//! Speech is delegated to a system program (espeak-ng, espeak, spd-say or
//! macOS `say`) running as a child process. At most one utterance is alive:
//! starting a new one kills the previous child first.

use crate::error::DebugError;
use crate::parser::{Section, PLACEHOLDER};
use crate::view::ViewModel;
use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Fixed voice parameters, on the 0.0-2.0 scale where 1.0 is "normal"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

pub const VOICE: Voice = Voice {
    rate: 0.9,
    pitch: 1.0,
    volume: 1.0,
};

/// Fields read aloud in the full view, in order. Fixed code is never read.
const SPOKEN_SECTIONS: &[Section] = &[
    Section::ErrorReason,
    Section::ProblemLine,
    Section::Explanation,
    Section::Example,
];

pub trait SpeechEngine {
    fn is_available(&self) -> bool;
    /// Start speaking. Callers cancel any previous utterance first.
    fn speak(&mut self, text: &str, voice: Voice) -> Result<()>;
    /// Stop the current utterance, if any. Never fails.
    fn cancel(&mut self);
}

/// Text for the listen action, depending on which panel is visible.
pub fn text_to_speak(view: &ViewModel) -> String {
    if view.hint_visible() {
        return if view.hint_text != PLACEHOLDER {
            view.hint_text.trim().to_string()
        } else {
            String::new()
        };
    }

    SPOKEN_SECTIONS
        .iter()
        .map(|s| view.field(*s))
        .filter(|t| !t.is_empty() && *t != PLACEHOLDER)
        .collect::<Vec<&str>>()
        .join(". ")
}

/// Speak `text`, replacing whatever is currently being spoken.
pub fn speak(engine: &mut dyn SpeechEngine, text: &str) -> Result<(), DebugError> {
    if !engine.is_available() {
        return Err(DebugError::SpeechUnavailable);
    }
    engine.cancel();
    engine.speak(text, VOICE).map_err(|e| {
        tracing::warn!("speech failed: {:#}", e);
        DebugError::SpeechUnavailable
    })
}

/// The listen action: read the visible output, or refuse when there is nothing.
pub fn listen(engine: &mut dyn SpeechEngine, view: &ViewModel) -> Result<(), DebugError> {
    let text = text_to_speak(view);
    if text.is_empty() {
        return Err(DebugError::NothingToRead);
    }
    speak(engine, &text)
}

// ═══════════════════════════════════════
//  SYSTEM PROGRAM BACKEND
// ═══════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechProgram {
    EspeakNg,
    Espeak,
    SpdSay,
    Say,
    /// User-configured command line; reads the text from stdin
    Custom { program: String, args: Vec<String> },
}

impl SpeechProgram {
    const CANDIDATES: &'static [SpeechProgram] = &[
        SpeechProgram::EspeakNg,
        SpeechProgram::Espeak,
        SpeechProgram::SpdSay,
        SpeechProgram::Say,
    ];

    /// Pick the configured program, or the first one found on PATH.
    pub fn detect(configured: Option<&str>) -> Option<Self> {
        if let Some(cmd) = configured {
            let mut parts = cmd.split_whitespace().map(String::from);
            if let Some(program) = parts.next() {
                return Some(SpeechProgram::Custom {
                    program,
                    args: parts.collect(),
                });
            }
        }
        Self::CANDIDATES
            .iter()
            .find(|p| command_exists(p.binary()))
            .cloned()
    }

    pub fn binary(&self) -> &str {
        match self {
            SpeechProgram::EspeakNg => "espeak-ng",
            SpeechProgram::Espeak => "espeak",
            SpeechProgram::SpdSay => "spd-say",
            SpeechProgram::Say => "say",
            SpeechProgram::Custom { program, .. } => program,
        }
    }

    /// Whether the text is written to the child's stdin. Otherwise it is the
    /// last argument, after `--`, so a leading dash is never read as a flag.
    pub fn text_on_stdin(&self) -> bool {
        !matches!(self, SpeechProgram::SpdSay)
    }

    /// Map the voice onto each program's flags.
    pub fn args(&self, voice: Voice, text: &str) -> Vec<String> {
        let words_per_minute = (175.0 * voice.rate).round() as i32;
        match self {
            SpeechProgram::EspeakNg | SpeechProgram::Espeak => vec![
                "-s".into(),
                words_per_minute.to_string(),
                "-p".into(),
                ((50.0 * voice.pitch).round() as i32).to_string(),
                "-a".into(),
                ((100.0 * voice.volume).round() as i32).to_string(),
                "--stdin".into(),
            ],
            // -100..100 scales with 0 as the default
            SpeechProgram::SpdSay => vec![
                "-w".into(),
                "-r".into(),
                (((voice.rate - 1.0) * 100.0).round() as i32).to_string(),
                "-p".into(),
                (((voice.pitch - 1.0) * 100.0).round() as i32).to_string(),
                "-i".into(),
                ((voice.volume * 100.0).round() as i32).to_string(),
                "--".into(),
                text.to_string(),
            ],
            SpeechProgram::Say => vec![
                "-r".into(),
                words_per_minute.to_string(),
                "-f".into(),
                "-".into(),
            ],
            SpeechProgram::Custom { args, .. } => args.clone(),
        }
    }

    /// speech-dispatcher keeps talking after its client dies
    fn stop_args(&self) -> Option<&'static [&'static str]> {
        match self {
            SpeechProgram::SpdSay => Some(&["-S"]),
            _ => None,
        }
    }
}

pub struct CommandSpeech {
    program: Option<SpeechProgram>,
    child: Option<Child>,
}

impl CommandSpeech {
    pub fn new(configured: Option<&str>) -> Self {
        let program = SpeechProgram::detect(configured);
        match &program {
            Some(p) => tracing::info!("speech backend: {}", p.binary()),
            None => tracing::info!("no speech backend found"),
        }
        Self {
            program,
            child: None,
        }
    }
}

impl SpeechEngine for CommandSpeech {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn speak(&mut self, text: &str, voice: Voice) -> Result<()> {
        let program = self
            .program
            .as_ref()
            .context("No text-to-speech program configured")?;

        let on_stdin = program.text_on_stdin();
        let mut child = Command::new(program.binary())
            .args(program.args(voice, text))
            .stdin(if on_stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {}", program.binary()))?;

        if let Some(mut stdin) = child.stdin.take() {
            let text = text.to_string();
            // The pipe may fill before the synthesizer reads; never block the UI
            std::thread::spawn(move || {
                let _ = stdin.write_all(text.as_bytes());
            });
        }

        tracing::debug!("speaking {} chars via {}", text.chars().count(), program.binary());
        self.child = Some(child);
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(program) = &self.program {
            if let Some(args) = program.stop_args() {
                let _ = Command::new(program.binary())
                    .args(args)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status();
            }
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.cancel();
        }
    }
}

fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::ThemeMode;

    /// In-memory engine recording what would have been spoken
    #[derive(Default)]
    pub struct RecordingSpeech {
        pub unavailable: bool,
        pub spoken: Vec<String>,
        pub cancels: usize,
    }

    impl SpeechEngine for RecordingSpeech {
        fn is_available(&self) -> bool {
            !self.unavailable
        }

        fn speak(&mut self, text: &str, voice: Voice) -> Result<()> {
            assert_eq!(voice, VOICE);
            self.spoken.push(text.to_string());
            Ok(())
        }

        fn cancel(&mut self) {
            self.cancels += 1;
        }
    }

    #[test]
    fn test_placeholders_produce_no_text() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        assert_eq!(text_to_speak(&vm), "");
        vm.show_hint_only(PLACEHOLDER);
        assert_eq!(text_to_speak(&vm), "");
    }

    #[test]
    fn test_listen_with_nothing_does_not_speak() {
        let vm = ViewModel::new(ThemeMode::Dark);
        let mut engine = RecordingSpeech::default();
        let err = listen(&mut engine, &vm).unwrap_err();
        assert!(matches!(err, DebugError::NothingToRead));
        assert!(engine.spoken.is_empty());
        assert_eq!(engine.cancels, 0);
    }

    #[test]
    fn test_hint_text_is_trimmed() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_hint_only("  Look at the loop bounds.\n");
        assert_eq!(text_to_speak(&vm), "Look at the loop bounds.");
    }

    #[test]
    fn test_full_view_skips_fixed_code_and_placeholders() {
        let mut vm = ViewModel::new(ThemeMode::Dark);
        vm.show_full_output("ERROR_REASON: bad index\nEXPLANATION: too short\nFIXED_CODE:\nx[0]\nEXAMPLE:\nx[-1]");
        assert_eq!(text_to_speak(&vm), "bad index. too short. \nx[-1]");
    }

    #[test]
    fn test_speak_cancels_before_starting() {
        let mut engine = RecordingSpeech::default();
        speak(&mut engine, "one").unwrap();
        speak(&mut engine, "two").unwrap();
        assert_eq!(engine.cancels, 2);
        assert_eq!(engine.spoken, vec!["one", "two"]);
    }

    #[test]
    fn test_missing_capability() {
        let mut engine = RecordingSpeech {
            unavailable: true,
            ..Default::default()
        };
        let err = speak(&mut engine, "hello").unwrap_err();
        assert_eq!(err.notice(), "Text-to-Speech not supported");
        assert!(engine.spoken.is_empty());
    }

    #[test]
    fn test_voice_mapping() {
        let args = SpeechProgram::EspeakNg.args(VOICE, "hi");
        assert_eq!(args, vec!["-s", "158", "-p", "50", "-a", "100", "--stdin"]);

        let args = SpeechProgram::SpdSay.args(VOICE, "hi");
        assert_eq!(args, vec!["-w", "-r", "-10", "-p", "0", "-i", "100", "--", "hi"]);

        let args = SpeechProgram::Say.args(VOICE, "hi");
        assert_eq!(args, vec!["-r", "158", "-f", "-"]);
    }

    #[test]
    fn test_leading_dash_is_never_a_flag() {
        let text = "-1 is not a valid index here";
        for program in [SpeechProgram::EspeakNg, SpeechProgram::Espeak, SpeechProgram::Say] {
            assert!(program.text_on_stdin());
            assert!(!program.args(VOICE, text).iter().any(|a| a == text));
        }
        let args = SpeechProgram::SpdSay.args(VOICE, text);
        assert!(!SpeechProgram::SpdSay.text_on_stdin());
        assert_eq!(&args[args.len() - 2..], &["--".to_string(), text.to_string()]);
    }

    #[test]
    fn test_configured_program_wins() {
        let program = SpeechProgram::detect(Some(" my-tts --voice en ")).unwrap();
        assert_eq!(
            program,
            SpeechProgram::Custom {
                program: "my-tts".into(),
                args: vec!["--voice".into(), "en".into()],
            }
        );
        assert_eq!(program.binary(), "my-tts");
        assert_eq!(program.args(VOICE, "hi"), vec!["--voice", "en"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_text_reaches_program_through_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("spoken.txt");
        let command = format!("tee {}", out.display());
        let mut engine = CommandSpeech::new(Some(&command));
        assert!(engine.is_available());

        engine.speak("-1 is out of range", VOICE).unwrap();
        let status = engine.child.take().unwrap().wait().unwrap();
        assert!(status.success());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "-1 is out of range");
    }
}
