use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "focusdeck")]
#[command(about = "A Pomodoro focus timer for the terminal")]
#[command(long_about = "focusdeck - A Pomodoro focus timer for the terminal

Alternates focus phases with short and long breaks, records every
completed focus phase, and reports on your history.

QUICK START:
  focusdeck tui                      Interactive timer
  focusdeck run --task \"Essay\"       Headless countdown
  focusdeck status                   Today's progress
  focusdeck report week              Weekly report

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  focusdeck <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to `general.default_output` from the settings file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Log at info level (overridden by FOCUSDECK_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the timer headless in this terminal
    ///
    /// Counts down the chosen phase, printing the remaining time. When a
    /// phase ends the next one starts automatically, until the requested
    /// number of focus sessions has been completed. Completed focus
    /// sessions are saved to the history.
    ///
    /// # Examples
    ///
    ///   focusdeck run                        One 25-minute focus session
    ///   focusdeck run --task "Calculus"      Label the session
    ///   focusdeck run --cycles 4             Four sessions with breaks
    ///   focusdeck run --phase short          Just a short break
    #[command(alias = "r")]
    Run(RunArgs),

    /// Interactive timer
    ///
    /// Full-screen timer with today's statistics.
    ///
    /// # Keys
    ///
    ///   space    Start / pause
    ///   r        Reset the current phase
    ///   1 2 3    Switch to focus, short break, long break
    ///   t        Edit the task label
    ///   c        Reload settings from the config file
    ///   q        Quit
    Tui,

    /// Show today's progress
    ///
    /// Completed sessions and focus time today, and where you are in the
    /// long break cycle.
    #[command(alias = "s")]
    Status,

    /// List recorded sessions, newest first
    ///
    /// # Examples
    ///
    ///   focusdeck history                Last 5 sessions
    ///   focusdeck history -n 20          Last 20 sessions
    ///   focusdeck history -o json        Output as JSON
    History {
        /// Number of sessions to show
        #[arg(long, short = 'n', default_value = "5")]
        limit: usize,
    },

    /// Summarize focus time over a period
    ///
    /// # Examples
    ///
    ///   focusdeck report                 Last 7 days
    ///   focusdeck report today
    ///   focusdeck report all -o json
    Report {
        /// Time period (today, week, month, all)
        #[arg(default_value = "week")]
        period: String,
    },

    /// Delete all recorded sessions
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// View or change settings
    ///
    /// # Examples
    ///
    ///   focusdeck config show
    ///   focusdeck config set timer.work_minutes 50
    ///   focusdeck config reset
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Outputs a completion script for the specified shell.
    ///
    /// Example: focusdeck completions bash > ~/.bash_completion.d/focusdeck
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for the headless timer.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Phase to start in (work, short, long)
    #[arg(long, short = 'p', default_value = "work")]
    pub phase: String,

    /// Label for the focus sessions
    #[arg(long, short = 't')]
    pub task: Option<String>,

    /// Stop after this many completed focus sessions
    ///
    /// Starting in a break runs that break only.
    #[arg(long, short = 'c', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub cycles: u32,
}

/// Arguments for settings management.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Settings subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,

    /// Print the settings file location
    Path,

    /// Change one setting
    ///
    /// Keys: general.default_output, general.color, timer.work_minutes,
    /// timer.short_break_minutes, timer.long_break_minutes,
    /// timer.long_break_interval, timer.sound_enabled, timer.sound_volume
    Set {
        /// Setting key
        key: String,

        /// New value
        value: String,
    },

    /// Restore the default settings
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // ==================== CLI Parsing Tests ====================

    #[test]
    fn test_cli_run_defaults() {
        let cli = Cli::try_parse_from(["focusdeck", "run"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.phase, "work");
            assert!(args.task.is_none());
            assert_eq!(args.cycles, 1);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_run_with_options() {
        let cli = Cli::try_parse_from([
            "focusdeck", "run", "--phase", "short", "--task", "Essay", "-c", "3",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.phase, "short");
            assert_eq!(args.task, Some("Essay".to_string()));
            assert_eq!(args.cycles, 3);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_run_rejects_zero_cycles() {
        assert!(Cli::try_parse_from(["focusdeck", "run", "--cycles", "0"]).is_err());
        assert!(Cli::try_parse_from(["focusdeck", "run", "-c", "1"]).is_ok());
    }

    #[test]
    fn test_cli_status_alias() {
        let cli = Cli::try_parse_from(["focusdeck", "s"]).unwrap();
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn test_cli_history_limit() {
        let cli = Cli::try_parse_from(["focusdeck", "history", "-n", "12"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 12 }));

        let cli = Cli::try_parse_from(["focusdeck", "history"]).unwrap();
        assert!(matches!(cli.command, Commands::History { limit: 5 }));
    }

    #[test]
    fn test_cli_report_period() {
        let cli = Cli::try_parse_from(["focusdeck", "report", "month"]).unwrap();
        if let Commands::Report { period } = cli.command {
            assert_eq!(period, "month");
        } else {
            panic!("Expected Report command");
        }
    }

    #[test]
    fn test_cli_config_set() {
        let cli =
            Cli::try_parse_from(["focusdeck", "config", "set", "timer.work_minutes", "50"]).unwrap();
        if let Commands::Config(args) = cli.command {
            if let ConfigCommands::Set { key, value } = args.command {
                assert_eq!(key, "timer.work_minutes");
                assert_eq!(value, "50");
            } else {
                panic!("Expected Set subcommand");
            }
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["focusdeck", "status", "-o", "json", "--verbose"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_output_unset_by_default() {
        let cli = Cli::try_parse_from(["focusdeck", "status"]).unwrap();
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["focusdeck"]).is_err());
    }

    // ==================== Output Format Tests ====================

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Pretty));
    }
}
