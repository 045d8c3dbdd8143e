//! Line-oriented replay scripts.
//!
//! A script drives a [`KeyboardSession`] on an in-memory document with a
//! virtual clock, one command per line:
//!
//! ```text
//! text cat|fish      # document, `|` marks the caret
//! space
//! pick join
//! show
//! undo
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use keyflow_core::settings::{settings, Settings};
use keyflow_core::{
    Candidate, CandidateKind, KeyBounds, KeyId, KeyboardSpec, ManualScheduler, MemorySurface,
    RecordingPreview,
};
use keyflow_session::{KeyboardSession, SessionEvent, SessionResponse, UndoChip};

const KEY_WIDTH: f32 = 40.0;
const KEY_HEIGHT: f32 = 60.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: unknown command {command:?}")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: {command} expects {expected}")]
    BadArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },
    #[error("line {line}: no key labelled {label:?}")]
    UnknownKey { line: usize, label: String },
    #[error("line {line}: no finger is down")]
    NoPress { line: usize },
    #[error("line {line}: {kind:?} is not offered")]
    NotOffered { line: usize, kind: CandidateKind },
}

/// Which candidate `pick` selects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pick {
    Index(usize),
    Kind(CandidateKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Replace the document.
    Text(String),
    Caret(usize),
    Tap(String),
    /// Tap every character; a blank presses the space bar.
    Type(String),
    Press(String),
    /// Press and keep the finger down for `Some(ms)`, or the long-press delay.
    Hold(String, Option<u64>),
    Move(f32),
    Release,
    Cancel,
    Space,
    Pick(Pick),
    Undo,
    Wait(u64),
    Delete,
    Enter,
    Shift,
    Show,
}

fn parse_kind(name: &str) -> Option<CandidateKind> {
    match name.to_ascii_lowercase().as_str() {
        "join" => Some(CandidateKind::Join),
        "period" => Some(CandidateKind::Period),
        "comma" => Some(CandidateKind::Comma),
        "space" => Some(CandidateKind::Space),
        _ => None,
    }
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (command, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let arg = rest.trim();
    let bad = |command: &'static str, expected: &'static str| ScriptError::BadArgument {
        line,
        command,
        expected,
    };
    let word = |command: &'static str| {
        if arg.is_empty() {
            Err(bad(command, "a key label"))
        } else {
            Ok(arg.to_string())
        }
    };

    let step = match command {
        "text" => Step::Text(arg.to_string()),
        "caret" => Step::Caret(arg.parse().map_err(|_| bad("caret", "a character offset"))?),
        "tap" => Step::Tap(word("tap")?),
        "type" => Step::Type(rest.to_string()),
        "press" => Step::Press(word("press")?),
        "hold" => {
            let mut parts = arg.split_whitespace();
            let label = parts.next().ok_or_else(|| bad("hold", "a key label"))?;
            let ms = match parts.next() {
                Some(ms) => Some(ms.parse().map_err(|_| bad("hold", "a duration in ms"))?),
                None => None,
            };
            Step::Hold(label.to_string(), ms)
        }
        "move" => Step::Move(arg.parse().map_err(|_| bad("move", "an x coordinate"))?),
        "release" => Step::Release,
        "cancel" => Step::Cancel,
        "space" => Step::Space,
        "pick" => {
            let pick = match arg.parse::<usize>() {
                Ok(index) => Pick::Index(index),
                Err(_) => Pick::Kind(
                    parse_kind(arg).ok_or_else(|| bad("pick", "an index or candidate kind"))?,
                ),
            };
            Step::Pick(pick)
        }
        "undo" => Step::Undo,
        "wait" => Step::Wait(arg.parse().map_err(|_| bad("wait", "a duration in ms"))?),
        "delete" => Step::Delete,
        "enter" => Step::Enter,
        "shift" => Step::Shift,
        "show" => Step::Show,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(step)
}

/// Parse a script into `(line number, step)` pairs. Line numbers are 1-based.
pub fn parse_script(src: &str) -> Result<Vec<(usize, Step)>, ScriptError> {
    let mut steps = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let text = raw.trim_start();
        if text.trim().is_empty() || text.starts_with('#') {
            continue;
        }
        steps.push((i + 1, parse_line(i + 1, text.trim_end())?));
    }
    Ok(steps)
}

/// Session state captured by `show`.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub line: usize,
    /// Document with `|` at the caret.
    pub document: String,
    pub candidates: Vec<Candidate>,
    pub undo_visible: bool,
    pub preview: Option<String>,
    pub shift: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub document: String,
    /// Every text that reached the document, in order.
    pub committed: Vec<String>,
    pub snapshots: Vec<Snapshot>,
}

type ScriptSession = KeyboardSession<MemorySurface, RecordingPreview, ManualScheduler>;

pub struct Replayer {
    session: ScriptSession,
    long_press: Duration,
    last_key: Option<KeyId>,
    undo_visible: bool,
    committed: Vec<String>,
    snapshots: Vec<Snapshot>,
}

impl Replayer {
    pub fn new(layout: KeyboardSpec) -> Self {
        Self::with_settings(settings(), layout)
    }

    pub fn with_settings(settings: &Settings, layout: KeyboardSpec) -> Self {
        let widest = layout.rows.iter().map(|r| r.keys.len()).max().unwrap_or(0);
        let mut session = KeyboardSession::with_settings(
            settings,
            layout,
            RecordingPreview::new(),
            ManualScheduler::new(),
        );
        session.set_screen_width(widest as f32 * KEY_WIDTH);
        session.attach(MemorySurface::new());
        Self {
            session,
            long_press: settings.gesture.long_press(),
            last_key: None,
            undo_visible: false,
            committed: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub fn session(&self) -> &ScriptSession {
        &self.session
    }

    pub fn document(&self) -> String {
        self.session
            .surface()
            .map(MemorySurface::marked)
            .unwrap_or_default()
    }

    pub fn run(&mut self, steps: &[(usize, Step)]) -> Result<(), ScriptError> {
        for (line, step) in steps {
            self.apply(*line, step)?;
        }
        Ok(())
    }

    pub fn apply(&mut self, line: usize, step: &Step) -> Result<(), ScriptError> {
        debug!(line, ?step, "replay");
        match step {
            Step::Text(marked) => {
                self.session.attach(MemorySurface::parse(marked));
                self.undo_visible = false;
            }
            Step::Caret(caret) => {
                if let Some(surface) = self.session.surface_mut() {
                    surface.set_caret(*caret);
                }
            }
            Step::Tap(label) => {
                self.down(line, label)?;
                self.up(line)?;
            }
            Step::Type(text) => {
                for c in text.chars() {
                    if c == ' ' {
                        self.handle(SessionEvent::Space);
                    } else {
                        self.down(line, &c.to_string())?;
                        self.up(line)?;
                    }
                }
            }
            Step::Press(label) => self.down(line, label)?,
            Step::Hold(label, ms) => {
                self.down(line, label)?;
                let held = ms.map_or(self.long_press, Duration::from_millis);
                self.wait(held);
            }
            Step::Move(x) => {
                let key = self.last_key.ok_or(ScriptError::NoPress { line })?;
                self.handle(SessionEvent::moved(key, *x));
            }
            Step::Release => self.up(line)?,
            Step::Cancel => {
                let key = self.last_key.take().ok_or(ScriptError::NoPress { line })?;
                self.handle(SessionEvent::cancel(key));
            }
            Step::Space => self.handle(SessionEvent::Space),
            Step::Pick(pick) => {
                let index = match pick {
                    Pick::Index(index) => *index,
                    Pick::Kind(kind) => self
                        .session
                        .candidates()
                        .iter()
                        .position(|c| c.kind == *kind)
                        .ok_or(ScriptError::NotOffered { line, kind: *kind })?,
                };
                self.handle(SessionEvent::SelectCandidate(index));
            }
            Step::Undo => self.handle(SessionEvent::UndoJoin),
            Step::Wait(ms) => self.wait(Duration::from_millis(*ms)),
            Step::Delete => self.handle(SessionEvent::Delete),
            Step::Enter => self.handle(SessionEvent::Enter),
            Step::Shift => self.handle(SessionEvent::ToggleShift),
            Step::Show => {
                let snapshot = self.snapshot(line);
                self.snapshots.push(snapshot);
            }
        }
        Ok(())
    }

    pub fn snapshot(&self, line: usize) -> Snapshot {
        Snapshot {
            line,
            document: self.document(),
            candidates: self.session.candidates().to_vec(),
            undo_visible: self.undo_visible,
            preview: self.session.preview().highlighted().map(str::to_string),
            shift: self.session.shift(),
            elapsed_ms: self.session.scheduler().elapsed().as_millis() as u64,
        }
    }

    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            document: self.document(),
            committed: self.committed.clone(),
            snapshots: self.snapshots.clone(),
        }
    }

    fn down(&mut self, line: usize, label: &str) -> Result<(), ScriptError> {
        let key = self
            .session
            .layout()
            .find(label)
            .ok_or_else(|| ScriptError::UnknownKey {
                line,
                label: label.to_string(),
            })?;
        let bounds = KeyBounds::new(
            key.col as f32 * KEY_WIDTH,
            key.row as f32 * KEY_HEIGHT,
            KEY_WIDTH,
            KEY_HEIGHT,
        );
        self.last_key = Some(key);
        self.handle(SessionEvent::down(key, bounds));
        Ok(())
    }

    fn up(&mut self, line: usize) -> Result<(), ScriptError> {
        let key = self.last_key.take().ok_or(ScriptError::NoPress { line })?;
        self.handle(SessionEvent::up(key));
        Ok(())
    }

    fn wait(&mut self, by: Duration) {
        for resp in self.session.advance(by) {
            self.record(resp);
        }
    }

    fn handle(&mut self, event: SessionEvent) {
        let resp = self.session.handle(event);
        self.record(resp);
    }

    fn record(&mut self, resp: SessionResponse) {
        if let Some(text) = resp.committed {
            self.committed.push(text);
        }
        match resp.undo {
            UndoChip::Show => self.undo_visible = true,
            UndoChip::Hide => self.undo_visible = false,
            UndoChip::Keep => {}
        }
    }
}

/// Parse and run `src` against `layout`.
pub fn replay(src: &str, layout: KeyboardSpec) -> Result<ReplayReport, ScriptError> {
    let steps = parse_script(src)?;
    let mut replayer = Replayer::new(layout);
    replayer.run(&steps)?;
    Ok(replayer.report())
}
