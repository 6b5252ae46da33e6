//! Command definitions for the Pomodoro Timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand};

use crate::types::{clamp_minutes, clamp_sessions, PomodoroConfig};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Timer CLI - work sessions and breaks in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro",
    version,
    about = "Temporizador Pomodoro para la terminal",
    long_about = "Temporizador Pomodoro interactivo.\n\
                  Alterna sesiones de trabajo con descansos cortos y largos, \
                  con aviso sonoro y notificación al terminar cada sesión.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the timer interactively, reading control commands from stdin
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Work duration in minutes (clamped to 1-60)
    #[arg(
        short,
        long,
        env = "POMODORO_WORK",
        default_value = "25",
        value_parser = parse_minutes
    )]
    pub work: u32,

    /// Short break duration in minutes (clamped to 1-60)
    #[arg(
        short = 'b',
        long,
        env = "POMODORO_SHORT_BREAK",
        default_value = "5",
        value_parser = parse_minutes
    )]
    pub short_break: u32,

    /// Long break duration in minutes (clamped to 1-60)
    #[arg(
        short,
        long,
        env = "POMODORO_LONG_BREAK",
        default_value = "15",
        value_parser = parse_minutes
    )]
    pub long_break: u32,

    /// Work sessions before a long break (clamped to 1-10)
    #[arg(
        short,
        long,
        env = "POMODORO_SESSIONS",
        default_value = "4",
        value_parser = parse_sessions
    )]
    pub sessions: u32,

    /// Start the first work session immediately
    #[arg(long)]
    pub start: bool,

    /// Disable the alert sound
    #[arg(long)]
    pub no_sound: bool,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Print timer events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Configuration described by the flags.
    pub fn config(&self) -> PomodoroConfig {
        PomodoroConfig::default()
            .with_work_duration(self.work)
            .with_short_break_duration(self.short_break)
            .with_long_break_duration(self.long_break)
            .with_sessions_before_long_break(self.sessions)
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        let config = PomodoroConfig::default();
        Self {
            work: config.work_duration,
            short_break: config.short_break_duration,
            long_break: config.long_break_duration,
            sessions: config.sessions_before_long_break,
            start: false,
            no_sound: false,
            no_notify: false,
            json: false,
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a duration in minutes and clamps it into the accepted range.
fn parse_minutes(s: &str) -> Result<u32, String> {
    s.trim()
        .parse::<u32>()
        .map(clamp_minutes)
        .map_err(|_| format!("'{}' no es un número de minutos válido", s))
}

/// Parses a session count and clamps it into the accepted range.
fn parse_sessions(s: &str) -> Result<u32, String> {
    s.trim()
        .parse::<u32>()
        .map(clamp_sessions)
        .map_err(|_| format!("'{}' no es un número de sesiones válido", s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_run(args: &[&str]) -> RunArgs {
        let mut argv = vec!["pomodoro", "run"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Some(Commands::Run(args)) => args,
            other => panic!("Expected Run command, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------------
    // Cli Tests
    // ------------------------------------------------------------------------

    mod cli_tests {
        use super::*;

        #[test]
        fn test_parse_no_args() {
            let cli = Cli::parse_from(["pomodoro"]);
            assert!(cli.command.is_none());
            assert!(!cli.verbose);
        }

        #[test]
        fn test_parse_verbose_flag() {
            let cli = Cli::parse_from(["pomodoro", "--verbose"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_verbose_after_subcommand() {
            let cli = Cli::parse_from(["pomodoro", "run", "-v"]);
            assert!(cli.verbose);
        }

        #[test]
        fn test_parse_completions_bash() {
            let cli = Cli::parse_from(["pomodoro", "completions", "bash"]);
            match cli.command {
                Some(Commands::Completions { shell }) => {
                    assert_eq!(shell, clap_complete::Shell::Bash);
                }
                _ => panic!("Expected Completions command"),
            }
        }

        #[test]
        fn test_parse_completions_zsh() {
            let cli = Cli::parse_from(["pomodoro", "completions", "zsh"]);
            assert!(matches!(
                cli.command,
                Some(Commands::Completions {
                    shell: clap_complete::Shell::Zsh
                })
            ));
        }

        #[test]
        fn test_unknown_subcommand_fails() {
            assert!(Cli::try_parse_from(["pomodoro", "launch"]).is_err());
        }

        #[test]
        fn test_command_definition_is_consistent() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }
    }

    // ------------------------------------------------------------------------
    // Run Command Tests
    // ------------------------------------------------------------------------

    mod run_args_tests {
        use super::*;

        // Env fallbacks are exercised from tests/cli_tests.rs, where the
        // child process environment is isolated.

        #[test]
        fn test_parse_run_flags() {
            let args = parse_run(&[
                "--work",
                "50",
                "--short-break",
                "10",
                "--long-break",
                "30",
                "--sessions",
                "3",
                "--start",
                "--no-sound",
                "--no-notify",
                "--json",
            ]);

            assert_eq!(args.work, 50);
            assert_eq!(args.short_break, 10);
            assert_eq!(args.long_break, 30);
            assert_eq!(args.sessions, 3);
            assert!(args.start);
            assert!(args.no_sound);
            assert!(args.no_notify);
            assert!(args.json);
        }

        #[test]
        fn test_parse_run_short_flags() {
            let args = parse_run(&["-w", "40", "-b", "8", "-l", "20", "-s", "2"]);

            assert_eq!(args.work, 40);
            assert_eq!(args.short_break, 8);
            assert_eq!(args.long_break, 20);
            assert_eq!(args.sessions, 2);
        }

        #[test]
        fn test_out_of_range_values_are_clamped() {
            let args = parse_run(&[
                "--work",
                "0",
                "--short-break",
                "61",
                "--long-break",
                "500",
                "--sessions",
                "11",
            ]);

            assert_eq!(args.work, 1);
            assert_eq!(args.short_break, 60);
            assert_eq!(args.long_break, 60);
            assert_eq!(args.sessions, 10);
        }

        #[test]
        fn test_zero_sessions_clamped_to_one() {
            let args = parse_run(&["--sessions", "0"]);
            assert_eq!(args.sessions, 1);
        }

        #[test]
        fn test_non_numeric_rejected() {
            assert!(Cli::try_parse_from(["pomodoro", "run", "--work", "abc"]).is_err());
            assert!(Cli::try_parse_from(["pomodoro", "run", "--sessions", "-1"]).is_err());
        }

        #[test]
        fn test_config_from_args() {
            let args = RunArgs {
                work: 45,
                sessions: 2,
                ..RunArgs::default()
            };

            assert_eq!(
                args.config(),
                PomodoroConfig::default()
                    .with_work_duration(45)
                    .with_sessions_before_long_break(2)
            );
        }

        #[test]
        fn test_default_args_match_default_config() {
            assert_eq!(RunArgs::default().config(), PomodoroConfig::default());
        }
    }

    mod parser_tests {
        use super::*;

        #[test]
        fn test_parse_minutes() {
            assert_eq!(parse_minutes("25"), Ok(25));
            assert_eq!(parse_minutes(" 7 "), Ok(7));
            assert_eq!(parse_minutes("0"), Ok(1));
            assert_eq!(parse_minutes("90"), Ok(60));
            assert!(parse_minutes("").is_err());
            assert!(parse_minutes("1.5").is_err());
        }

        #[test]
        fn test_parse_sessions() {
            assert_eq!(parse_sessions("4"), Ok(4));
            assert_eq!(parse_sessions("0"), Ok(1));
            assert_eq!(parse_sessions("25"), Ok(10));
            assert!(parse_sessions("x").is_err());
        }
    }
}
