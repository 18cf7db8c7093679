//! A single weekly time block

use serde::{Deserialize, Serialize};

/// An admitted calendar event, reduced to its place in the week.
///
/// `start < end` and both sit inside the display window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Day of week, 0 = Sunday .. 6 = Saturday
    pub day: u32,
    /// Start hour (fractional, 9.5 = 9:30)
    pub start: f32,
    /// End hour (fractional)
    pub end: f32,
    pub title: String,
}

impl CalendarEvent {
    pub fn new(day: u32, start: f32, end: f32, title: impl Into<String>) -> Self {
        Self {
            day,
            start,
            end,
            title: title.into(),
        }
    }

    /// Length in hours
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }
}
