//! cal-reminders entry point.

mod actions;
mod app;
mod cli;
mod config;
mod error;
mod output;
mod pidfile;
mod view;

use std::process::ExitCode;

use clap::Parser;

use cal_reminders_core::{init_tracing, TracingConfig};
use cal_reminders_eventkit::{CalendarSource, EventKitSource, FixtureSource};

use crate::app::App;
use crate::cli::{ActionCommand, Cli, Command, ConfigAction, LoginItemState};
use crate::config::Config;
use crate::error::{MenubarError, MenubarResult};
use crate::output::Renderer;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::debug()
    } else {
        TracingConfig::default()
    };
    if let Err(err) = init_tracing(tracing_config) {
        eprintln!("error: failed to initialize tracing: {}", err);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(mut cli: Cli) -> MenubarResult<()> {
    let config_path = cli.config_path();
    let config = Config::load(&config_path);

    match cli.command.take() {
        None | Some(Command::Run) => {
            let app = App::new(build_source(&cli)?, config, Renderer::from_current_exe(cli.output_mode()));
            app.run().await
        }
        Some(Command::Once) => {
            let app = App::new(build_source(&cli)?, config, Renderer::from_current_exe(cli.output_mode()));
            app.run_once().await
        }
        Some(Command::Calendars) => list_calendars(build_source(&cli)?).await,
        Some(Command::Config { action }) => match action {
            ConfigAction::Show => {
                let json = serde_json::to_string_pretty(&config).map_err(|e| {
                    MenubarError::Config(format!("failed to serialize config: {}", e))
                })?;
                println!("{}", json);
                Ok(())
            }
            ConfigAction::Path => {
                println!("{}", config_path.display());
                Ok(())
            }
            ConfigAction::Init => {
                if config_path.exists() {
                    println!("config already exists at {}", config_path.display());
                } else {
                    Config::default().save(&config_path)?;
                    println!("wrote defaults to {}", config_path.display());
                }
                Ok(())
            }
        },
        Some(Command::Action { action }) => run_action(action),
    }
}

/// Picks the calendar source: EventKit, or a fixture when `--fixture` names
/// a file.
fn build_source(cli: &Cli) -> MenubarResult<Box<dyn CalendarSource>> {
    match &cli.fixture {
        Some(path) => Ok(Box::new(FixtureSource::from_file(path)?)),
        None => Ok(Box::new(EventKitSource::new())),
    }
}

/// Lists the calendars the source can read, one per line.
async fn list_calendars(source: Box<dyn CalendarSource>) -> MenubarResult<()> {
    let state = source.request_access(app::ACCESS_TIMEOUT).await?;
    if !state.is_granted() {
        return Err(MenubarError::Action(
            "calendar access is not granted; open System Settings > Privacy & Security > Calendars".into(),
        ));
    }

    for calendar in source.list_calendars().await? {
        match calendar.identifier {
            Some(id) => println!("{}\t{}", calendar.title, id),
            None => println!("{}", calendar.title),
        }
    }
    Ok(())
}

/// Dispatches a menu-row action in this short-lived process.
fn run_action(action: ActionCommand) -> MenubarResult<()> {
    match action {
        ActionCommand::Join { url } => actions::join(&url),
        ActionCommand::Copy { url } => actions::copy_link(&url),
        ActionCommand::OpenCalendar => actions::open_calendar(),
        ActionCommand::PrivacySettings => actions::open_privacy_settings(),
        ActionCommand::LoginItem { state } => match state {
            LoginItemState::On => actions::set_login_item(true),
            LoginItemState::Off => actions::set_login_item(false),
            LoginItemState::Toggle => {
                let enabled = actions::toggle_login_item()?;
                println!("launch at login: {}", if enabled { "on" } else { "off" });
                Ok(())
            }
        },
        ActionCommand::Refresh => actions::request_refresh(),
        ActionCommand::Quit => actions::request_quit(),
    }
}
