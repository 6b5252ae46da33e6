//! Interactive session: control commands from stdin, events to stdout.

use std::io::{self, BufRead};
use std::str::FromStr;
use std::thread;

use anyhow::{Context, Result};
use thiserror::Error;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::debug;

use super::display::Display;
use crate::engine::{TimerEngine, TimerEvent};
use crate::types::ConfigUpdate;

// ============================================================================
// ControlCommand
// ============================================================================

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Pause,
    Resume,
    Stop,
    Skip,
    Reset,
    Status,
    Config(ConfigUpdate),
    Help,
    Quit,
}

/// Errors for unparseable input lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("comando vacío")]
    Empty,

    #[error("comando desconocido: {0}")]
    Unknown(String),

    #[error("config necesita al menos un ajuste clave=valor")]
    MissingSettings,

    #[error("ajuste desconocido: {0}")]
    UnknownSetting(String),

    #[error("valor no válido para {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl CommandParseError {
    pub fn suggestion(&self) -> &'static str {
        match self {
            CommandParseError::Empty | CommandParseError::Unknown(_) => {
                "Escribe 'help' para ver los comandos"
            }
            CommandParseError::MissingSettings | CommandParseError::UnknownSetting(_) => {
                "Ejemplo: config work=50 short=10 long=20 sessions=3"
            }
            CommandParseError::InvalidValue { .. } => "Usa un número entero positivo",
        }
    }
}

impl FromStr for ControlCommand {
    type Err = CommandParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().ok_or(CommandParseError::Empty)?;

        let command = match head.to_lowercase().as_str() {
            "start" | "s" => ControlCommand::Start,
            "pause" | "p" => ControlCommand::Pause,
            "resume" | "r" => ControlCommand::Resume,
            "stop" | "x" => ControlCommand::Stop,
            "skip" | "n" => ControlCommand::Skip,
            "reset" => ControlCommand::Reset,
            "status" => ControlCommand::Status,
            "help" | "h" | "?" => ControlCommand::Help,
            "quit" | "q" | "exit" => ControlCommand::Quit,
            "config" => return parse_settings(words).map(ControlCommand::Config),
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

/// Parses `key=value` pairs into an unclamped update.
fn parse_settings<'a>(
    settings: impl Iterator<Item = &'a str>,
) -> Result<ConfigUpdate, CommandParseError> {
    let mut update = ConfigUpdate::default();

    for setting in settings {
        let (key, value) = setting
            .split_once('=')
            .ok_or_else(|| CommandParseError::UnknownSetting(setting.to_string()))?;
        let parsed = value
            .parse::<u32>()
            .map_err(|_| CommandParseError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            })?;

        let slot = match key {
            "work" => &mut update.work_duration,
            "short" => &mut update.short_break_duration,
            "long" => &mut update.long_break_duration,
            "sessions" => &mut update.sessions_before_long_break,
            other => return Err(CommandParseError::UnknownSetting(other.to_string())),
        };
        *slot = Some(parsed);
    }

    if update.is_empty() {
        return Err(CommandParseError::MissingSettings);
    }
    Ok(update)
}

// ============================================================================
// Runner
// ============================================================================

/// Whether the loop keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Applies one command to the engine.
pub fn apply(engine: &TimerEngine, command: ControlCommand, json: bool) -> Flow {
    debug!(?command, "Control command");

    let applied = match command {
        ControlCommand::Start => engine.start(),
        ControlCommand::Pause => engine.pause(),
        ControlCommand::Resume => engine.resume(),
        ControlCommand::Stop => engine.stop(),
        ControlCommand::Skip => engine.skip(),
        ControlCommand::Reset => engine.reset_all(),
        ControlCommand::Config(update) => {
            engine.update_config(&update.clamped());
            true
        }
        ControlCommand::Status => {
            let snapshot = engine.snapshot();
            if json {
                Display::show_json(&snapshot);
            } else {
                Display::show_status(&snapshot);
            }
            true
        }
        ControlCommand::Help => {
            Display::show_help();
            true
        }
        ControlCommand::Quit => return Flow::Quit,
    };

    if !applied && !json {
        Display::show_error(&format!(
            "nada que hacer, el temporizador está {}",
            engine.snapshot().status.as_str()
        ));
    }
    Flow::Continue
}

fn render(engine: &TimerEngine, event: &TimerEvent, json: bool) {
    if json {
        Display::show_json(event);
    } else if matches!(event, TimerEvent::Tick { .. }) {
        Display::show_progress(&engine.snapshot());
    } else {
        Display::show_event(event);
    }
}

/// Reads stdin on a detached thread and forwards each line.
///
/// A blocked read must never keep the process alive, so the thread is not
/// owned by the runtime and is never joined. The channel closes at end of
/// input or after the first read error.
fn spawn_stdin_reader() -> Result<mpsc::UnboundedReceiver<io::Result<String>>> {
    let (tx, rx) = mpsc::unbounded_channel();

    thread::Builder::new()
        .name("pomodoro-stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })
        .context("Failed to spawn stdin reader")?;

    Ok(rx)
}

/// Runs the interactive loop until `quit`, end of input or Ctrl-C.
///
/// Pending events are always rendered before the next input line is read.
pub async fn run(engine: &TimerEngine, json: bool) -> Result<()> {
    let lines = spawn_stdin_reader()?;
    run_with_input(engine, json, lines).await
}

async fn run_with_input(
    engine: &TimerEngine,
    json: bool,
    mut lines: mpsc::UnboundedReceiver<io::Result<String>>,
) -> Result<()> {
    let mut events = engine.subscribe();
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    if !json {
        Display::show_status(&engine.snapshot());
    }

    loop {
        tokio::select! {
            biased;

            result = &mut ctrl_c => {
                result.context("Failed to listen for Ctrl-C")?;
                debug!("Interrupted");
                break;
            }
            Some(event) = events.recv() => render(engine, &event, json),
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("End of input");
                    break;
                };
                let line = line.context("Failed to read from stdin")?;
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ControlCommand>() {
                    Ok(command) => {
                        if apply(engine, command, json) == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => Display::show_error(&format!("{} ({})", e, e.suggestion())),
                }
            }
        }
    }

    // Flush events produced by the last command.
    while let Ok(event) = events.try_recv() {
        render(engine, &event, json);
    }
    engine.shutdown();
    if !json {
        println!();
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
