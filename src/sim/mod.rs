//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - One step per call, velocities in pixels per step
//! - Time is passed in, never read
//! - Seeded RNG only
//! - Stable iteration order (bricks in event order)

pub mod collision;
pub mod layout;
pub mod state;
pub mod tick;

pub use collision::{BoundsContact, ball_overlaps_rect, hit_offset, paddle_deflection, reflect_off_bounds};
pub use layout::{BrickLayout, CANVAS_PRESETS, CanvasSize, Rect};
pub use state::{Ball, Brick, GameEvent, GamePhase, Paddle, Session};
pub use tick::{InputState, tick};
