//! Display utilities for the Pomodoro Timer CLI.
//!
//! This module provides formatted output for:
//! - The live status line with progress bar
//! - Messages for timer events
//! - JSON lines for machine consumers
//! - Error messages

use std::io::{self, Write};

use crate::engine::{TimerEvent, TimerSnapshot};
use crate::types::{format_time, TimerStatus};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 20;

/// Returns to the start of the line and clears it.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Redraws the live status line in place.
    pub fn show_progress(snapshot: &TimerSnapshot) {
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}{}", CLEAR_LINE, Self::status_line(snapshot));
        let _ = stdout.flush();
    }

    /// Prints the full status block.
    pub fn show_status(snapshot: &TimerSnapshot) {
        let config = &snapshot.config;
        println!("{}Temporizador Pomodoro", CLEAR_LINE);
        println!("─────────────────────────────");
        println!("{}", Self::status_line(snapshot));
        println!(
            "Sesiones completadas: {} (descanso largo cada {})",
            snapshot.state.completed_sessions, config.sessions_before_long_break
        );
        println!(
            "Configuración: trabajo {} min, descanso corto {} min, descanso largo {} min",
            config.work_duration, config.short_break_duration, config.long_break_duration
        );
    }

    /// Prints the message for an event. Ticks are not printed.
    pub fn show_event(event: &TimerEvent) {
        if let Some(message) = Self::event_message(event) {
            println!("{}{}", CLEAR_LINE, message);
        }
    }

    /// Prints an event as one JSON line.
    pub fn show_json<T: serde::Serialize>(value: &T) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{}", line),
            Err(e) => Self::show_error(&e.to_string()),
        }
    }

    /// Lists the control commands read from stdin.
    pub fn show_help() {
        println!("{}Comandos:", CLEAR_LINE);
        println!("  start  | s        iniciar o reanudar");
        println!("  pause  | p        pausar");
        println!("  resume | r        reanudar");
        println!("  stop   | x        detener y reiniciar la sesión actual");
        println!("  skip   | n        pasar a la siguiente sesión");
        println!("  reset             volver al inicio");
        println!("  status            mostrar el estado");
        println!("  config clave=valor ...   work, short, long, sessions");
        println!("  help   | h        mostrar esta ayuda");
        println!("  quit   | q        salir");
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Formats the one-line status: label, time, bar and percentage.
    pub fn status_line(snapshot: &TimerSnapshot) -> String {
        format!(
            "{}  {}  {}  {:>3.0}%{}",
            snapshot.label,
            snapshot.formatted_time,
            Self::progress_bar(snapshot.progress, BAR_WIDTH),
            snapshot.progress,
            Self::status_suffix(snapshot.status)
        )
    }

    fn status_suffix(status: TimerStatus) -> &'static str {
        match status {
            TimerStatus::Running => "",
            TimerStatus::Paused => "  (en pausa)",
            TimerStatus::Idle => "  (detenido)",
        }
    }

    /// Renders `progress` (0-100) as a bar of `width` cells.
    pub fn progress_bar(progress: f64, width: usize) -> String {
        let ratio = (progress / 100.0).clamp(0.0, 1.0);
        let filled = ((ratio * width as f64).round() as usize).min(width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }

    /// Human-readable message for an event, `None` for ticks.
    pub fn event_message(event: &TimerEvent) -> Option<String> {
        let message = match event {
            TimerEvent::Started {
                session_type,
                remaining,
            } => format!(
                "> {} iniciada ({})",
                session_type.label(),
                format_time(*remaining)
            ),
            TimerEvent::Paused { remaining } => {
                format!("|| En pausa ({})", format_time(*remaining))
            }
            TimerEvent::Resumed { remaining } => {
                format!("> Reanudado ({})", format_time(*remaining))
            }
            TimerEvent::Stopped {
                session_type,
                remaining,
            } => format!(
                "[] {} detenida ({})",
                session_type.label(),
                format_time(*remaining)
            ),
            TimerEvent::Skipped { from, to } => {
                format!(">> {} omitida, siguiente: {}", from.label(), to.label())
            }
            TimerEvent::Reset => "Temporizador reiniciado".to_string(),
            TimerEvent::Tick { .. } => return None,
            TimerEvent::SessionCompleted {
                completed,
                next,
                completed_sessions,
            } => format!(
                "* ¡{} completada! Sesiones: {}. Siguiente: {}",
                completed.label(),
                completed_sessions,
                next.label()
            ),
            TimerEvent::ConfigUpdated { config } => format!(
                "Configuración: trabajo {} min, descanso corto {} min, descanso largo {} min, descanso largo cada {}",
                config.work_duration,
                config.short_break_duration,
                config.long_break_duration,
                config.sessions_before_long_break
            ),
        };
        Some(message)
    }
}

// ============================================================================
// Tests
// ============================================================================
