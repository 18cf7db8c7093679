//! Calendar events and iCal import
//!
//! The importer turns raw iCal text into weekly time blocks that the
//! simulation lays out as bricks.

pub mod event;
pub mod ical;
pub mod sample;

pub use event::CalendarEvent;
pub use ical::{TimestampError, import, parse, parse_timestamp};
pub use sample::sample_events;
