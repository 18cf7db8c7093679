//! Game session and core simulation types
//!
//! A `Session` exclusively owns every entity. Importing a calendar, resizing
//! or restarting rebuilds the whole session rather than patching it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{BrickLayout, CanvasSize, Rect};
use crate::calendar::{self, CalendarEvent};
use crate::consts::*;
use crate::error::ImportResult;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every brick is down; waiting out the dwell before the next level
    LevelCleared,
    /// Ball fell past the paddle; waiting for a restart
    GameOver,
}

/// Things that happened during a tick, for sound and UI feedback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    WallHit,
    PaddleHit,
    BrickBroken { index: usize, title: String },
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Keyboard movement per step
    pub speed: f32,
    /// `x` at the start of the current step
    pub prev_x: f32,
}

impl Paddle {
    /// Centred near the bottom of the canvas
    pub fn new(size: CanvasSize, tuning: &Tuning) -> Self {
        let x = (size.width - tuning.paddle_width) / 2.0;
        Self {
            x,
            y: size.height - PADDLE_BOTTOM_OFFSET,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            speed: tuning.paddle_speed,
            prev_x: x,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Horizontal movement during the current step
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.x - self.prev_x
    }

    /// Keep the paddle fully on a canvas `canvas_width` wide
    pub fn clamp_to(&mut self, canvas_width: f32) {
        let max_x = (canvas_width - self.width).max(0.0);
        self.x = self.x.clamp(0.0, max_x);
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Pixels per step
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Serve from a random point below the grid, heading up and diagonally
    pub fn spawn(rng: &mut Pcg32, size: CanvasSize, speed: f32, radius: f32) -> Self {
        let x = rng.random_range(size.width * 0.25..size.width * 0.75);
        let vx = if rng.random_bool(0.5) { speed } else { -speed };
        Self {
            pos: Vec2::new(x, size.height * BALL_SPAWN_HEIGHT),
            vel: Vec2::new(vx, -speed),
            radius,
        }
    }
}

/// A brick built from one calendar event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub title: String,
    pub broken: bool,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct Session {
    pub size: CanvasSize,
    pub tuning: Tuning,
    pub paddle: Paddle,
    pub ball: Ball,
    /// In event order
    pub bricks: Vec<Brick>,
    pub score: u64,
    /// 1-based
    pub level: u32,
    pub phase: GamePhase,
    /// Speed the ball was served at this level
    pub ball_speed: f32,
    /// When the current `LevelCleared` dwell began
    pub(crate) level_cleared_at: Option<f64>,
    pub(crate) pending: Vec<GameEvent>,
    events: Vec<CalendarEvent>,
    rng: Pcg32,
}

impl Session {
    /// Start a new game on level 1
    pub fn new(events: Vec<CalendarEvent>, size: CanvasSize, tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball_speed = tuning.ball_speed_for_level(1);
        let ball = Ball::spawn(&mut rng, size, ball_speed, tuning.ball_radius);
        let paddle = Paddle::new(size, &tuning);
        let bricks = build_bricks(&events, size);

        log::info!(
            "Session started: {} bricks on {}x{} canvas (seed {})",
            bricks.len(),
            size.width,
            size.height,
            seed
        );

        Self {
            size,
            tuning,
            paddle,
            ball,
            bricks,
            score: 0,
            level: 1,
            phase: GamePhase::Playing,
            ball_speed,
            level_cleared_at: None,
            pending: Vec::new(),
            events,
            rng,
        }
    }

    /// Tear down every entity and rebuild from `events` on a `size` canvas.
    ///
    /// Any pending level transition is dropped along with the old state.
    pub fn reset(&mut self, events: Vec<CalendarEvent>, size: CanvasSize) {
        self.size = size;
        self.events = events;
        self.score = 0;
        self.level = 1;
        self.phase = GamePhase::Playing;
        self.level_cleared_at = None;
        self.ball_speed = self.tuning.ball_speed_for_level(1);
        self.paddle = Paddle::new(size, &self.tuning);
        self.ball = Ball::spawn(&mut self.rng, size, self.ball_speed, self.tuning.ball_radius);
        self.bricks = build_bricks(&self.events, size);
        self.pending.clear();

        log::info!(
            "Session reset: {} bricks on {}x{} canvas",
            self.bricks.len(),
            size.width,
            size.height
        );
    }

    /// Start over with the current events
    pub fn restart(&mut self) {
        let events = std::mem::take(&mut self.events);
        self.reset(events, self.size);
        self.pending.push(GameEvent::Restarted);
    }

    /// Rebuild for a new canvas size
    pub fn resize(&mut self, size: CanvasSize) {
        if size == self.size {
            return;
        }
        let events = std::mem::take(&mut self.events);
        self.reset(events, size);
    }

    /// Import iCal text and rebuild the session from it.
    ///
    /// When nothing usable is found the current events and game are kept.
    pub fn load_ical(&mut self, text: &str) -> ImportResult<usize> {
        let events = calendar::import(text)?;
        let count = events.len();
        self.reset(events, self.size);
        Ok(count)
    }

    /// Go back to the built-in sample week
    pub fn restore_samples(&mut self) {
        self.reset(calendar::sample_events(), self.size);
    }

    /// Events the bricks were built from
    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn layout(&self) -> BrickLayout {
        BrickLayout::new(self.size)
    }

    pub fn remaining_bricks(&self) -> usize {
        self.bricks.iter().filter(|b| !b.broken).count()
    }

    /// Clickable "play again" area shown while the game is over
    pub fn restart_button(&self) -> Rect {
        let (w, h) = (180.0, 44.0);
        Rect::new(
            (self.size.width - w) / 2.0,
            self.size.height / 2.0 + 30.0,
            w,
            h,
        )
    }

    /// Take everything that happened since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Move on from `LevelCleared`: faster ball, fresh serve, all bricks back
    pub(crate) fn advance_level(&mut self) {
        self.level += 1;
        self.ball_speed = self.tuning.ball_speed_for_level(self.level);
        self.ball = Ball::spawn(
            &mut self.rng,
            self.size,
            self.ball_speed,
            self.tuning.ball_radius,
        );
        for brick in &mut self.bricks {
            brick.broken = false;
        }
        self.level_cleared_at = None;
        self.phase = GamePhase::Playing;
        self.pending.push(GameEvent::LevelStarted { level: self.level });
        log::info!("Level {} started (ball speed {})", self.level, self.ball_speed);
    }
}

fn build_bricks(events: &[CalendarEvent], size: CanvasSize) -> Vec<Brick> {
    let layout = BrickLayout::new(size);
    events
        .iter()
        .map(|event| Brick {
            rect: layout.brick_rect(event),
            title: event.title.clone(),
            broken: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::sample_events;

    fn session(seed: u64) -> Session {
        Session::new(sample_events(), CanvasSize::default(), Tuning::default(), seed)
    }

    #[test]
    fn test_new_session() {
        let s = session(1);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!((s.score, s.level), (0, 1));
        assert_eq!(s.bricks.len(), sample_events().len());
        assert_eq!(s.remaining_bricks(), s.bricks.len());
        assert!(s.ball.vel.y < 0.0);
        assert!(s.ball.pos.y > s.layout().grid().bottom());
        assert!(s.ball.pos.y < s.paddle.y);
    }

    #[test]
    fn test_same_seed_same_serve() {
        let a = session(42);
        let b = session(42);
        assert_eq!(a.ball.pos, b.ball.pos);
        assert_eq!(a.ball.vel, b.ball.vel);
    }

    #[test]
    fn test_load_ical_keeps_events_when_empty() {
        let mut s = session(3);
        s.score = 50;
        assert!(s.load_ical("BEGIN:VCALENDAR\nEND:VCALENDAR").is_err());
        assert_eq!(s.events().len(), sample_events().len());
        assert_eq!(s.score, 50);

        let text = "BEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240101T090000\nDTEND:20240101T100000\nEND:VEVENT\n";
        assert_eq!(s.load_ical(text).unwrap(), 1);
        assert_eq!(s.bricks.len(), 1);
        assert_eq!(s.bricks[0].title, "Standup");
        assert_eq!(s.score, 0);

        s.restore_samples();
        assert_eq!(s.bricks.len(), sample_events().len());
    }

    #[test]
    fn test_resize_rebuilds_geometry() {
        let mut s = session(4);
        let before = s.bricks[0].rect;
        s.resize(CanvasSize::new(1000.0, 800.0));
        assert_ne!(s.bricks[0].rect, before);
        assert_eq!(s.paddle.y, 800.0 - PADDLE_BOTTOM_OFFSET);
    }

    #[test]
    fn test_restart_button_on_canvas() {
        let s = session(5);
        assert!(s.size.bounds().contains_rect(&s.restart_button()));
    }
}
