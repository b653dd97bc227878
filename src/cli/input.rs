//! Line-oriented command input.
//!
//! Each line typed on stdin is one command. Parsing is case-insensitive and
//! ignores surrounding whitespace; an empty line toggles start/pause.

use std::io::BufRead;
use std::str::FromStr;
use std::thread::JoinHandle;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::clock::ClockInput;
use crate::types::Intent;

/// A parsed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward an intent to the controller
    Intent(Intent),
    /// Leave the program
    Quit,
}

/// Error returned for input that matches no command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command '{0}' (try: t, r, b+, b-, s+, s-, q)")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let command = s.trim().to_ascii_lowercase();
        let parsed = match command.as_str() {
            "" | "t" | "toggle" | "start" | "pause" | "p" => Command::Intent(Intent::StartPause),
            "r" | "reset" => Command::Intent(Intent::Reset),
            "b+" | "+b" | "break+" => Command::Intent(Intent::BreakIncrement),
            "b-" | "-b" | "break-" => Command::Intent(Intent::BreakDecrement),
            "s+" | "+s" | "session+" => Command::Intent(Intent::SessionIncrement),
            "s-" | "-s" | "session-" => Command::Intent(Intent::SessionDecrement),
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(ParseCommandError(s.trim().to_string())),
        };
        Ok(parsed)
    }
}

impl From<Command> for ClockInput {
    fn from(command: Command) -> Self {
        match command {
            Command::Intent(intent) => ClockInput::Intent(intent),
            Command::Quit => ClockInput::Quit,
        }
    }
}

/// Converts one input line into a message for the event loop.
pub fn parse_line(line: &str) -> ClockInput {
    match line.parse::<Command>() {
        Ok(command) => command.into(),
        Err(ParseCommandError(text)) => ClockInput::Unrecognized(text),
    }
}

/// Reads commands from `reader` on a dedicated thread.
///
/// Blocking stdin reads stay off the async runtime. Bytes that are not
/// UTF-8 are decoded lossily and reach the clock as unrecognized input.
/// End of input or a read error sends [`ClockInput::Quit`].
pub fn spawn_command_reader<R>(
    mut reader: R,
    input_tx: mpsc::UnboundedSender<ClockInput>,
) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }

            let input = parse_line(&String::from_utf8_lossy(&buf));
            let quit = input == ClockInput::Quit;
            if input_tx.send(input).is_err() || quit {
                return;
            }
        }

        debug!("Input closed");
        let _ = input_tx.send(ClockInput::Quit);
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_toggle_aliases() {
            for text in ["", "  ", "t", "toggle", "start", "pause", "P", " T "] {
                assert_eq!(
                    text.parse::<Command>(),
                    Ok(Command::Intent(Intent::StartPause)),
                    "alias {:?}",
                    text
                );
            }
        }

        #[test]
        fn test_length_aliases() {
            assert_eq!("b+".parse(), Ok(Command::Intent(Intent::BreakIncrement)));
            assert_eq!("+b".parse(), Ok(Command::Intent(Intent::BreakIncrement)));
            assert_eq!("break-".parse(), Ok(Command::Intent(Intent::BreakDecrement)));
            assert_eq!("S+".parse(), Ok(Command::Intent(Intent::SessionIncrement)));
            assert_eq!("session-".parse(), Ok(Command::Intent(Intent::SessionDecrement)));
            assert_eq!("-s".parse(), Ok(Command::Intent(Intent::SessionDecrement)));
        }

        #[test]
        fn test_every_alias() {
            let table = [
                ("t", Command::Intent(Intent::StartPause)),
                ("toggle", Command::Intent(Intent::StartPause)),
                ("start", Command::Intent(Intent::StartPause)),
                ("pause", Command::Intent(Intent::StartPause)),
                ("p", Command::Intent(Intent::StartPause)),
                ("", Command::Intent(Intent::StartPause)),
                ("r", Command::Intent(Intent::Reset)),
                ("reset", Command::Intent(Intent::Reset)),
                ("b+", Command::Intent(Intent::BreakIncrement)),
                ("+b", Command::Intent(Intent::BreakIncrement)),
                ("break+", Command::Intent(Intent::BreakIncrement)),
                ("b-", Command::Intent(Intent::BreakDecrement)),
                ("-b", Command::Intent(Intent::BreakDecrement)),
                ("break-", Command::Intent(Intent::BreakDecrement)),
                ("s+", Command::Intent(Intent::SessionIncrement)),
                ("+s", Command::Intent(Intent::SessionIncrement)),
                ("session+", Command::Intent(Intent::SessionIncrement)),
                ("s-", Command::Intent(Intent::SessionDecrement)),
                ("-s", Command::Intent(Intent::SessionDecrement)),
                ("session-", Command::Intent(Intent::SessionDecrement)),
                ("q", Command::Quit),
                ("quit", Command::Quit),
                ("exit", Command::Quit),
            ];

            for (text, expected) in table {
                assert_eq!(text.parse::<Command>(), Ok(expected), "alias {:?}", text);
                let shouted = format!("  {}\r\n", text.to_ascii_uppercase());
                assert_eq!(shouted.parse::<Command>(), Ok(expected), "alias {:?}", shouted);
            }
        }

        #[test]
        fn test_reset_and_quit() {
            assert_eq!("r".parse(), Ok(Command::Intent(Intent::Reset)));
            assert_eq!("RESET".parse(), Ok(Command::Intent(Intent::Reset)));
            assert_eq!("q".parse(), Ok(Command::Quit));
            assert_eq!("exit".parse(), Ok(Command::Quit));
        }

        #[test]
        fn test_unknown_command() {
            let err = " hello ".parse::<Command>().unwrap_err();
            assert_eq!(err, ParseCommandError("hello".to_string()));
            assert!(err.to_string().contains("unknown command 'hello'"));
        }

        #[test]
        fn test_parse_line() {
            assert_eq!(parse_line("r"), ClockInput::Intent(Intent::Reset));
            assert_eq!(parse_line("quit"), ClockInput::Quit);
            assert_eq!(parse_line("x"), ClockInput::Unrecognized("x".to_string()));
        }
    }

    mod reader_tests {
        use super::*;

        fn collect(rx: &mut mpsc::UnboundedReceiver<ClockInput>) -> Vec<ClockInput> {
            let mut inputs = Vec::new();
            while let Ok(input) = rx.try_recv() {
                inputs.push(input);
            }
            inputs
        }

        #[test]
        fn test_reader_forwards_lines_then_quits_at_eof() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let reader = Cursor::new("s+\n\nwhat\n");

            spawn_command_reader(reader, tx).join().unwrap();

            assert_eq!(
                collect(&mut rx),
                vec![
                    ClockInput::Intent(Intent::SessionIncrement),
                    ClockInput::Intent(Intent::StartPause),
                    ClockInput::Unrecognized("what".to_string()),
                    ClockInput::Quit,
                ]
            );
        }

        #[test]
        fn test_reader_survives_invalid_utf8() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let reader = Cursor::new(b"s+\n\xff\xfe\nr\n".to_vec());

            spawn_command_reader(reader, tx).join().unwrap();

            let inputs = collect(&mut rx);
            assert_eq!(inputs.len(), 4);
            assert_eq!(inputs[0], ClockInput::Intent(Intent::SessionIncrement));
            assert!(matches!(inputs[1], ClockInput::Unrecognized(_)));
            assert_eq!(inputs[2], ClockInput::Intent(Intent::Reset));
            assert_eq!(inputs[3], ClockInput::Quit);
        }

        #[test]
        fn test_reader_handles_missing_final_newline() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let reader = Cursor::new("b-\r\nr");

            spawn_command_reader(reader, tx).join().unwrap();

            assert_eq!(
                collect(&mut rx),
                vec![
                    ClockInput::Intent(Intent::BreakDecrement),
                    ClockInput::Intent(Intent::Reset),
                    ClockInput::Quit,
                ]
            );
        }

        #[test]
        fn test_reader_stops_at_quit() {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let reader = Cursor::new("q\nr\n");

            spawn_command_reader(reader, tx).join().unwrap();

            assert_eq!(collect(&mut rx), vec![ClockInput::Quit]);
        }
    }
}
