//! Core types: events, selection, countdown formatting, meeting links, menu model

pub mod event;
pub mod format;
pub mod links;
pub mod menu;
pub mod select;
pub mod tracing;

pub use event::Event;
pub use format::{
    format_countdown, format_relative, format_time_range, truncate_title, NEXT_UP_TITLE_WIDTH,
    TITLE_WIDTH,
};
pub use links::{extract_meeting_link, find_meeting_link, MeetingLink, MeetingProvider};
pub use menu::{
    render_menu, status_title, DisplayState, MenuAction, MenuItem, MenuView, UpcomingView,
};
pub use select::select_upcoming;
pub use tracing::{init_tracing, TracingConfig, TracingError, TracingOutputFormat};
