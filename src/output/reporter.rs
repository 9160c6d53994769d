//! `TerminalReporter` — presentation-layer implementation of `ProgressReporter`.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "!".yellow());
        }
    }
}

/// Reporter that animates a single spinner, updating its message per step.
///
/// Used by long-running commands (launch) where individual steps would
/// otherwise scroll the terminal.
#[derive(Default)]
pub struct SpinnerReporter {
    bar: std::sync::Mutex<Option<indicatif::ProgressBar>>,
}

impl ProgressReporter for SpinnerReporter {
    fn step(&self, message: &str) {
        let Ok(mut bar) = self.bar.lock() else { return };
        match bar.as_ref() {
            Some(pb) => pb.set_message(message.to_string()),
            None => *bar = Some(crate::output::progress::spinner(message)),
        }
    }

    fn success(&self, message: &str) {
        let Ok(mut bar) = self.bar.lock() else { return };
        if let Some(pb) = bar.take() {
            crate::output::progress::finish_ok(&pb, message);
        } else {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        let Ok(bar) = self.bar.lock() else { return };
        let line = format!("  {} {message}", "!".yellow());
        match bar.as_ref() {
            Some(pb) => pb.println(line),
            None => println!("{line}"),
        }
    }
}
