//! Calendar Breakout - breakout where the bricks are your calendar
//!
//! Core modules:
//! - `calendar`: iCal import and the built-in sample week
//! - `sim`: Per-frame simulation (paddle, ball, bricks, game phase)
//! - `render`: Pure scene description read from the simulation
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod calendar;
pub mod error;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use calendar::{CalendarEvent, import, parse, sample_events};
pub use error::{ConfigError, ImportError};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (one arcade frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Display window: first hour shown on the grid
    pub const DAY_START_HOUR: f32 = 8.0;
    /// Display window: last hour shown on the grid
    pub const DAY_END_HOUR: f32 = 18.0;
    /// Columns in the weekly grid (Sunday..Saturday)
    pub const DAYS_PER_WEEK: u32 = 7;

    /// Grid margins (room for hour labels on the left, day headers on top)
    pub const GRID_LEFT_MARGIN: f32 = 44.0;
    pub const GRID_RIGHT_MARGIN: f32 = 8.0;
    pub const GRID_TOP_MARGIN: f32 = 32.0;
    /// Fraction of the canvas height the grid may occupy
    pub const GRID_HEIGHT_FRACTION: f32 = 0.6;
    /// Spacing between neighbouring bricks
    pub const BRICK_GAP: f32 = 4.0;

    /// Distance from the bottom of the canvas to the paddle's top edge
    pub const PADDLE_BOTTOM_OFFSET: f32 = 30.0;
    /// Ball spawn height as a fraction of canvas height
    pub const BALL_SPAWN_HEIGHT: f32 = 0.72;
}

/// Fractional hour of day (9:30 -> 9.5)
#[inline]
pub fn fractional_hour(hour: u32, minute: u32) -> f32 {
    hour as f32 + minute as f32 / 60.0
}

/// Whether an hour span sits inside the display window with positive length
#[inline]
pub fn within_display_window(start: f32, end: f32) -> bool {
    start < end && start >= consts::DAY_START_HOUR && end <= consts::DAY_END_HOUR
}
