//! CalendarSource trait and the EventKit-backed implementation

pub mod error;
pub mod eventkit;
pub mod fixture;
pub mod normalize;
pub mod raw_event;
pub mod source;

pub use error::{SourceError, SourceErrorCode, SourceResult};
pub use eventkit::EventKitSource;
pub use fixture::FixtureSource;
pub use normalize::{normalize_event, normalize_events};
pub use raw_event::RawEvent;
pub use source::{AccessState, BoxFuture, CalendarInfo, CalendarSource, FetchWindow};
