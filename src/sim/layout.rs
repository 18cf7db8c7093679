//! Canvas sizing and the weekly grid
//!
//! Bricks are an affine map of `(day, start, end)` onto the canvas: one
//! column per weekday, one fixed pixel height per hour of the display window.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::consts::*;

/// Axis-aligned rectangle in canvas pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Point inside or on the edge
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Interiors overlap (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// `other` lies entirely within `self`
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }
}

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

/// Responsive presets, largest first, keyed by the minimum viewport height
/// they need.
pub const CANVAS_PRESETS: [(f32, CanvasSize); 5] = [
    (1000.0, CanvasSize::new(1000.0, 800.0)),
    (860.0, CanvasSize::new(900.0, 720.0)),
    (740.0, CanvasSize::new(800.0, 600.0)),
    (620.0, CanvasSize::new(700.0, 520.0)),
    (0.0, CanvasSize::new(600.0, 440.0)),
];

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pick the largest preset that fits the available viewport height
    pub fn for_viewport_height(available: f32) -> Self {
        CANVAS_PRESETS
            .iter()
            .find(|(min_height, _)| available >= *min_height)
            .map(|(_, size)| *size)
            .unwrap_or(CANVAS_PRESETS[CANVAS_PRESETS.len() - 1].1)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        CANVAS_PRESETS[2].1
    }
}

/// Maps calendar time onto canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrickLayout {
    pub origin: Vec2,
    pub column_width: f32,
    pub hour_height: f32,
}

impl BrickLayout {
    pub fn new(size: CanvasSize) -> Self {
        let grid_width = size.width - GRID_LEFT_MARGIN - GRID_RIGHT_MARGIN;
        let grid_height = size.height * GRID_HEIGHT_FRACTION - GRID_TOP_MARGIN;
        Self {
            origin: Vec2::new(GRID_LEFT_MARGIN, GRID_TOP_MARGIN),
            column_width: grid_width / DAYS_PER_WEEK as f32,
            hour_height: grid_height / (DAY_END_HOUR - DAY_START_HOUR),
        }
    }

    /// Whole grid area (all seven columns, full display window)
    pub fn grid(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.column_width * DAYS_PER_WEEK as f32,
            self.hour_height * (DAY_END_HOUR - DAY_START_HOUR),
        )
    }

    /// Left edge of a day column
    pub fn column_x(&self, day: u32) -> f32 {
        self.origin.x + day.min(DAYS_PER_WEEK - 1) as f32 * self.column_width
    }

    /// Vertical position of an hour line
    pub fn hour_y(&self, hour: f32) -> f32 {
        let hour = hour.clamp(DAY_START_HOUR, DAY_END_HOUR);
        self.origin.y + (hour - DAY_START_HOUR) * self.hour_height
    }

    /// Brick rectangle for an event, inset by half a gap on every side.
    ///
    /// Out-of-range days and hours are clamped onto the grid.
    pub fn brick_rect(&self, event: &CalendarEvent) -> Rect {
        let top = self.hour_y(event.start);
        let bottom = self.hour_y(event.end);
        Rect::new(
            self.column_x(event.day) + BRICK_GAP / 2.0,
            top + BRICK_GAP / 2.0,
            self.column_width - BRICK_GAP,
            (bottom - top - BRICK_GAP).max(1.0),
        )
    }
}
