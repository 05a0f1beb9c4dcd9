// src/console.rs

//! Human-readable status lines on stdout.
//!
//! These are the messages a developer watches while editing: watching
//! started, change detected, build succeeded/failed, shutting down. They are
//! separate from `tracing` logs, which go to stderr.
//!
//! Styling uses ANSI escape codes through `crossterm`; with color disabled
//! the exact same text is written without escapes.

use std::io::{self, Write};
use std::path::Path;

use crossterm::style::{Color, Stylize};
use is_terminal::IsTerminal;

use crate::engine::{BuildOutcome, BuildReason};
use crate::types::ColorMode;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
    Dim,
}

impl Tone {
    fn color(self) -> Color {
        match self {
            Tone::Success => Color::Green,
            Tone::Error => Color::Red,
            Tone::Warning => Color::Yellow,
            Tone::Info => Color::Blue,
            Tone::Dim => Color::DarkGrey,
        }
    }
}

/// Writer for status lines.
pub struct Console {
    out: Box<dyn Write + Send>,
    color: bool,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Console on stdout, resolving `ColorMode::Auto` against the terminal
    /// and the `NO_COLOR` convention.
    pub fn stdout(mode: ColorMode) -> Self {
        let color = mode.enabled(
            io::stdout().is_terminal(),
            std::env::var_os("NO_COLOR").is_some(),
        );
        Self::new(Box::new(io::stdout()), color)
    }

    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self { out, color }
    }

    pub fn watching(&mut self, dir: &Path) {
        self.line(&format!("👀 Watching: {}", dir.display()), Tone::Success, true);
    }

    pub fn stop_hint(&mut self) {
        self.line("📝 Press Ctrl+C to stop", Tone::Warning, true);
        self.blank();
    }

    pub fn build_started(&mut self, reason: &BuildReason) {
        match reason {
            BuildReason::Initial => {
                self.line("Running initial build...", Tone::Info, false);
            }
            BuildReason::Changed(diff) => {
                self.blank();
                self.line("🔄 Changes detected! Rebuilding...", Tone::Info, true);
                self.line(
                    &format!(
                        "   {} created, {} modified, {} removed",
                        diff.created.len(),
                        diff.modified.len(),
                        diff.removed.len()
                    ),
                    Tone::Dim,
                    false,
                );
                self.line(&"=".repeat(RULE_WIDTH), Tone::Info, false);
            }
        }
    }

    pub fn build_finished(&mut self, outcome: &BuildOutcome) {
        self.blank();
        match outcome {
            BuildOutcome::Success => self.line("✅ Build succeeded!", Tone::Success, true),
            BuildOutcome::Failed(code) => self.line(
                &format!("❌ Build failed (exit code {code})!"),
                Tone::Error,
                true,
            ),
            BuildOutcome::LaunchFailed(msg) => self.line(
                &format!("❌ Could not start build: {msg}"),
                Tone::Error,
                true,
            ),
        }
        self.blank();
    }

    pub fn shutting_down(&mut self) {
        self.blank();
        self.line("👋 Stopping file watcher...", Tone::Warning, true);
    }

    fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    fn line(&mut self, text: &str, tone: Tone, bold: bool) {
        let rendered = render(text, tone, bold, self.color);
        // Status output is cosmetic; a closed stdout must not stop the watcher.
        let _ = writeln!(self.out, "{rendered}");
        let _ = self.out.flush();
    }
}

fn render(text: &str, tone: Tone, bold: bool, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    let mut styled = text.with(tone.color());
    if bold {
        styled = styled.bold();
    }
    format!("{styled}")
}
