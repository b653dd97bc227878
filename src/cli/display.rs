//! Display utilities for the clock CLI.
//!
//! This module renders the clock:
//! - Text mode: one status line redrawn in place, alert and phase notices
//!   on their own lines
//! - JSON mode: one object per snapshot or event

use std::io::Write;

use crate::clock::{ClockEvent, Renderer};
use crate::types::{OutputFormat, RunState, Snapshot};

/// Returns the cursor to column 0 and clears the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Shows an error message.
pub fn show_error(message: &str) {
    eprintln!("error: {}", message);
}

/// Writes the clock to a terminal (or any writer).
pub struct Display<W: Write> {
    out: W,
    format: OutputFormat,
    /// True while the cursor sits at the end of a redrawable status line
    line_open: bool,
}

impl<W: Write> Display<W> {
    /// Creates a display writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            line_open: false,
        }
    }

    /// Terminates the status line so the shell prompt starts fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn finish(&mut self) -> std::io::Result<()> {
        if self.line_open {
            writeln!(self.out)?;
            self.line_open = false;
        }
        self.out.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Formats the one-line status view.
    ///
    /// The control glyph mirrors a play/pause button: `||` while running,
    /// `>` otherwise.
    pub fn status_line(snapshot: &Snapshot) -> String {
        let control = match snapshot.state {
            RunState::Running => "||",
            _ => "> ",
        };
        format!(
            "Break Length: {:>2} | Session Length: {:>2} | {:<7} {} [{}]",
            snapshot.break_length,
            snapshot.session_length,
            snapshot.mode.label(),
            snapshot.display,
            control
        )
    }

    /// Formats a notice for events that deserve their own line.
    pub fn event_notice(event: &ClockEvent) -> Option<String> {
        match event {
            ClockEvent::AlertFired { mode } => Some(format!("* {} complete", mode.label())),
            ClockEvent::PhaseChanged { mode, .. } => Some(format!("> {} started", mode.label())),
            _ => None,
        }
    }

    fn write_notice(&mut self, notice: &str) -> std::io::Result<()> {
        if self.line_open {
            write!(self.out, "{}", CLEAR_LINE)?;
            self.line_open = false;
        }
        writeln!(self.out, "{}", notice)
    }

    fn write_json<T: serde::Serialize>(&mut self, value: &T) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Renderer for Display<W> {
    fn render(&mut self, snapshot: &Snapshot) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                write!(self.out, "{}{}", CLEAR_LINE, Self::status_line(snapshot))?;
                self.line_open = true;
                self.out.flush()
            }
            OutputFormat::Json => self.write_json(snapshot),
        }
    }

    fn event(&mut self, event: &ClockEvent) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Text => match Self::event_notice(event) {
                Some(notice) => self.write_notice(&notice),
                None => Ok(()),
            },
            OutputFormat::Json => self.write_json(event),
        }
    }

    fn unrecognized(&mut self, input: &str) -> std::io::Result<()> {
        let message = crate::cli::input::ParseCommandError(input.to_string()).to_string();
        match self.format {
            OutputFormat::Text => self.write_notice(&message),
            OutputFormat::Json => self.write_json(&serde_json::json!({ "error": message })),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{format_time_remaining, TimerPhase};

    fn snapshot(state: RunState, mode: TimerPhase, time_remaining: i64) -> Snapshot {
        Snapshot {
            state,
            mode,
            break_length: 5,
            session_length: 25,
            time_remaining,
            display: format_time_remaining(time_remaining),
        }
    }

    fn output(display: Display<Vec<u8>>) -> String {
        String::from_utf8(display.into_inner()).unwrap()
    }

    // ------------------------------------------------------------------------
    // Status Line Tests
    // ------------------------------------------------------------------------

    mod status_line_tests {
        use super::*;

        #[test]
        fn test_initial_line() {
            let line = Display::<Vec<u8>>::status_line(&snapshot(
                RunState::Initial,
                TimerPhase::Session,
                1500,
            ));
            assert_eq!(
                line,
                "Break Length:  5 | Session Length: 25 | Session 25:00 [> ]"
            );
        }

        #[test]
        fn test_running_shows_pause_control() {
            let line = Display::<Vec<u8>>::status_line(&snapshot(
                RunState::Running,
                TimerPhase::Break,
                299,
            ));
            assert!(line.contains("Break   04:59"));
            assert!(line.ends_with("[||]"));
        }

        #[test]
        fn test_event_notices() {
            assert_eq!(
                Display::<Vec<u8>>::event_notice(&ClockEvent::AlertFired {
                    mode: TimerPhase::Session
                }),
                Some("* Session complete".to_string())
            );
            assert_eq!(
                Display::<Vec<u8>>::event_notice(&ClockEvent::PhaseChanged {
                    mode: TimerPhase::Break,
                    remaining_seconds: 300
                }),
                Some("> Break started".to_string())
            );
            assert_eq!(Display::<Vec<u8>>::event_notice(&ClockEvent::Started), None);
        }
    }

    // ------------------------------------------------------------------------
    // Renderer Tests
    // ------------------------------------------------------------------------

    mod renderer_tests {
        use super::*;

        #[test]
        fn test_text_render_redraws_in_place() {
            let mut display = Display::new(Vec::new(), OutputFormat::Text);
            display
                .render(&snapshot(RunState::Initial, TimerPhase::Session, 1500))
                .unwrap();
            display
                .render(&snapshot(RunState::Running, TimerPhase::Session, 1499))
                .unwrap();
            display.finish().unwrap();

            let text = output(display);
            assert_eq!(text.matches(CLEAR_LINE).count(), 2);
            assert!(text.contains("24:59"));
            assert!(text.ends_with('\n'));
        }

        #[test]
        fn test_text_notice_on_own_line() {
            let mut display = Display::new(Vec::new(), OutputFormat::Text);
            display
                .render(&snapshot(RunState::Running, TimerPhase::Session, 0))
                .unwrap();
            display
                .event(&ClockEvent::AlertFired {
                    mode: TimerPhase::Session,
                })
                .unwrap();

            let text = output(display);
            assert!(text.ends_with("* Session complete\n"));
        }

        #[test]
        fn test_text_ignores_routine_events() {
            let mut display = Display::new(Vec::new(), OutputFormat::Text);
            display
                .event(&ClockEvent::Tick {
                    remaining_seconds: 10,
                })
                .unwrap();
            assert!(output(display).is_empty());
        }

        #[test]
        fn test_text_unrecognized() {
            let mut display = Display::new(Vec::new(), OutputFormat::Text);
            display.unrecognized("zzz").unwrap();
            assert!(output(display).contains("unknown command 'zzz'"));
        }

        #[test]
        fn test_json_lines() {
            let mut display = Display::new(Vec::new(), OutputFormat::Json);
            display
                .render(&snapshot(RunState::Initial, TimerPhase::Session, 1500))
                .unwrap();
            display.event(&ClockEvent::Started).unwrap();
            display.unrecognized("zzz").unwrap();
            display.finish().unwrap();

            let text = output(display);
            let lines: Vec<serde_json::Value> = text
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect();

            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0]["state"], "initial");
            assert_eq!(lines[0]["mode"], "session");
            assert_eq!(lines[0]["timeRemaining"], 1500);
            assert_eq!(lines[0]["display"], "25:00");
            assert_eq!(lines[1]["event"], "started");
            assert!(lines[2]["error"].as_str().unwrap().contains("zzz"));
        }
    }
}
