//! Rendering menu views to stdout.
//!
//! Two sinks share one view-model: the SwiftBar/xbar plugin protocol and a
//! plain-text form for terminals. In the plugin protocol every actionable
//! row carries `bash=` attributes that re-invoke this binary with an
//! `action` subcommand, so clicking a row runs a short-lived process while
//! the loop keeps streaming.

use std::fmt::Display;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};

use cal_reminders_core::{render_menu, status_title, MenuAction, MenuItem, MenuView};

/// Where rendered menus go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// SwiftBar/xbar plugin rows with dispatch attributes.
    #[default]
    Swiftbar,
    /// Plain text, for running in a terminal.
    Terminal,
}

/// Renders [`MenuView`]s for one sink.
#[derive(Debug, Clone)]
pub struct Renderer {
    mode: OutputMode,
    /// Executable that menu rows re-invoke for actions.
    exe: PathBuf,
}

impl Renderer {
    /// Creates a renderer dispatching actions to the given executable.
    pub fn new(mode: OutputMode, exe: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            exe: exe.into(),
        }
    }

    /// Creates a renderer dispatching actions back to the current binary.
    pub fn from_current_exe(mode: OutputMode) -> Self {
        let exe = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("cal-reminders"));
        Self::new(mode, exe)
    }

    /// Renders one complete menu block: status line, divider, rows.
    pub fn render<Tz>(&self, view: &MenuView, now: DateTime<Utc>, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        let _ = writeln!(out, "{}", sanitize(&status_title(view, now)));
        let _ = writeln!(out, "---");

        for item in render_menu(view, now, tz) {
            let row = match self.mode {
                OutputMode::Swiftbar => self.swiftbar_row(&item),
                OutputMode::Terminal => terminal_row(&item),
            };
            let _ = writeln!(out, "{}", row);
        }

        out
    }

    /// Renders a block for the streaming loop.
    ///
    /// SwiftBar resets the menu when it reads a `~~~` line, so each block
    /// replaces the previous one. The terminal sink separates blocks with a
    /// blank line instead.
    pub fn stream_block<Tz>(&self, view: &MenuView, now: DateTime<Utc>, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let block = self.render(view, now, tz);
        match self.mode {
            OutputMode::Swiftbar => format!("~~~\n{}", block),
            OutputMode::Terminal => format!("{}\n", block),
        }
    }

    fn swiftbar_row(&self, item: &MenuItem) -> String {
        match item {
            MenuItem::Separator => "---".to_string(),
            MenuItem::Label(text) => sanitize(text),
            MenuItem::Action { label, action } => {
                format!("{} | {}", sanitize(label), self.dispatch_attrs(action))
            }
            MenuItem::Toggle {
                label,
                checked,
                action,
            } => format!(
                "{} | checked={} {}",
                sanitize(label),
                checked,
                self.dispatch_attrs(action)
            ),
        }
    }

    /// Builds the `bash=` attribute list that re-invokes this binary with
    /// the matching `action` subcommand.
    fn dispatch_attrs(&self, action: &MenuAction) -> String {
        let mut attrs = format!("bash=\"{}\" param1=action", self.exe.display());

        match action {
            MenuAction::Join(url) => {
                let _ = write!(attrs, " param2=join param3=\"{}\"", url);
            }
            MenuAction::CopyLink(url) => {
                let _ = write!(attrs, " param2=copy param3=\"{}\"", url);
            }
            MenuAction::OpenCalendar => attrs.push_str(" param2=open-calendar"),
            MenuAction::OpenPrivacySettings => attrs.push_str(" param2=privacy-settings"),
            MenuAction::Refresh => attrs.push_str(" param2=refresh"),
            MenuAction::ToggleLoginItem => attrs.push_str(" param2=login-item param3=toggle"),
            MenuAction::Quit => attrs.push_str(" param2=quit"),
        }

        attrs.push_str(" terminal=false");
        attrs
    }
}

fn terminal_row(item: &MenuItem) -> String {
    match item {
        MenuItem::Separator => "---".to_string(),
        MenuItem::Label(text) => text.clone(),
        MenuItem::Action { label, .. } => label.clone(),
        MenuItem::Toggle { label, checked, .. } => {
            format!("{} [{}]", label, if *checked { "x" } else { " " })
        }
    }
}

/// The plugin protocol splits a row on its first `|`, so titles must not
/// carry one.
fn sanitize(text: &str) -> String {
    text.replace('|', "¦")
}
