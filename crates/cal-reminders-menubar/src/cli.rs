//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::output::OutputMode;

/// cal-reminders - Your next calendar event in the menu bar
#[derive(Debug, Parser)]
#[command(name = "cal-reminders")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CAL_REMINDERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Where rendered menus go
    #[arg(long, value_enum, default_value = "swiftbar")]
    pub output: OutputArg,

    /// Serve events from a JSON fixture file instead of the calendar store
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the configuration file path in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the output mode based on CLI flags.
    pub fn output_mode(&self) -> OutputMode {
        match self.output {
            OutputArg::Swiftbar => OutputMode::Swiftbar,
            OutputArg::Terminal => OutputMode::Terminal,
        }
    }
}

/// Output sinks selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    /// SwiftBar/xbar plugin protocol
    Swiftbar,
    /// Plain text for a terminal
    Terminal,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the streamable plugin loop (the default)
    Run,

    /// Print a single menu snapshot and exit
    Once,

    /// List the calendars the source can read
    Calendars,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Menu actions, normally invoked by the menu rows themselves
    Action {
        #[command(subcommand)]
        action: ActionCommand,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Write a config file with the defaults, if none exists
    Init,
}

/// Actions dispatched from menu rows.
#[derive(Debug, Subcommand)]
pub enum ActionCommand {
    /// Open a meeting URL in the default browser
    Join {
        /// The meeting URL to open
        url: String,
    },

    /// Copy a meeting URL to the clipboard
    Copy {
        /// The meeting URL to copy
        url: String,
    },

    /// Open the Calendar app
    OpenCalendar,

    /// Open the Calendars privacy pane in System Settings
    PrivacySettings,

    /// Enable, disable, or toggle launch-at-login
    LoginItem {
        /// Desired state
        #[arg(value_enum)]
        state: LoginItemState,
    },

    /// Ask the running instance to refetch events now
    Refresh,

    /// Ask the running instance to exit
    Quit,
}

/// Argument to `action login-item`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoginItemState {
    /// Register the app as a login item
    On,
    /// Remove the login item
    Off,
    /// Flip the current state
    Toggle,
}
