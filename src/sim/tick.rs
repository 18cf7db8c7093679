//! Per-frame simulation step
//!
//! `tick` is the only thing that mutates a session during play. Input is
//! sampled into an `InputState` by the host and the clock is passed in, so a
//! run is fully reproducible from (seed, inputs, timestamps).

use glam::Vec2;

use super::collision::{ball_overlaps_rect, hit_offset, paddle_deflection, reflect_off_bounds};
use super::state::{GameEvent, GamePhase, Session};

/// Input held at the start of a step (last state wins, nothing is queued)
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Left arrow held
    pub left: bool,
    /// Right arrow held
    pub right: bool,
    /// Pointer/touch drag position; the paddle centres on it
    pub pointer_x: Option<f32>,
    /// Click or tap this step (canvas coordinates)
    pub click: Option<Vec2>,
}

/// Advance the session by one step at wall-clock time `now_ms`
pub fn tick(session: &mut Session, input: &InputState, now_ms: f64) {
    match session.phase {
        GamePhase::Playing => step_playing(session, input, now_ms),
        GamePhase::LevelCleared => {
            let dwell_over = session
                .level_cleared_at
                .is_none_or(|at| now_ms - at >= session.tuning.level_dwell_ms);
            if dwell_over {
                session.advance_level();
            }
        }
        GamePhase::GameOver => {
            if let Some(point) = input.click {
                if session.restart_button().contains_point(point) {
                    log::info!("Restart requested from game over screen");
                    session.restart();
                }
            }
        }
    }
}

fn step_playing(session: &mut Session, input: &InputState, now_ms: f64) {
    // Paddle
    let paddle = &mut session.paddle;
    paddle.prev_x = paddle.x;
    if input.left {
        paddle.x -= paddle.speed;
    }
    if input.right {
        paddle.x += paddle.speed;
    }
    if let Some(px) = input.pointer_x {
        paddle.x = px - paddle.width / 2.0;
    }
    paddle.clamp_to(session.size.width);
    let paddle_velocity = paddle.velocity();

    // Integrate
    let ball = &mut session.ball;
    ball.pos += ball.vel;

    // Walls, ceiling, floor
    let contact = reflect_off_bounds(
        &mut ball.pos,
        &mut ball.vel,
        ball.radius,
        session.size.width,
        session.size.height,
    );
    if contact.bounced() {
        session.pending.push(GameEvent::WallHit);
    }
    if contact.floor {
        session.phase = GamePhase::GameOver;
        session.pending.push(GameEvent::GameOver {
            score: session.score,
        });
        log::info!(
            "Game over on level {} with score {}",
            session.level,
            session.score
        );
        return;
    }

    // Paddle; only a downward-moving ball is caught, so one contact flips vy once
    let paddle_rect = session.paddle.rect();
    if ball.vel.y > 0.0 && ball_overlaps_rect(ball.pos, ball.radius, &paddle_rect) {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = paddle_rect.y - ball.radius;
        let tuning = &session.tuning;
        ball.vel.x = paddle_deflection(
            ball.vel.x,
            hit_offset(ball.pos.x, &paddle_rect),
            paddle_velocity,
            tuning.spin_transfer,
            tuning.edge_deflection,
            session.ball_speed,
            tuning.max_horizontal_factor,
        );
        session.pending.push(GameEvent::PaddleHit);
    }

    // Bricks; every brick overlapped this step breaks, each flipping vy
    let mut broke_any = false;
    for (index, brick) in session.bricks.iter_mut().enumerate() {
        if brick.broken || !ball_overlaps_rect(ball.pos, ball.radius, &brick.rect) {
            continue;
        }
        ball.vel.y = -ball.vel.y;
        brick.broken = true;
        broke_any = true;
        session.score += session.tuning.brick_reward;
        session.pending.push(GameEvent::BrickBroken {
            index,
            title: brick.title.clone(),
        });
    }

    if broke_any && session.bricks.iter().all(|b| b.broken) {
        session.phase = GamePhase::LevelCleared;
        session.level_cleared_at = Some(now_ms);
        session.pending.push(GameEvent::LevelCleared {
            level: session.level,
        });
        log::info!(
            "Level {} cleared (score {})",
            session.level,
            session.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{CalendarEvent, sample_events};
    use crate::sim::layout::CanvasSize;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn single_brick_session() -> Session {
        Session::new(
            vec![CalendarEvent::new(1, 9.0, 10.0, "Standup")],
            CanvasSize::default(),
            Tuning::default(),
            7,
        )
    }

    /// Put the ball just under a brick, moving straight up
    fn aim_at_brick(session: &mut Session, index: usize) {
        let rect = session.bricks[index].rect;
        let r = session.ball.radius;
        session.ball.pos = Vec2::new(rect.center().x, rect.bottom() + r + 2.0);
        session.ball.vel = Vec2::new(0.0, -4.0);
    }

    #[test]
    fn test_last_brick_clears_level_then_dwell_advances() {
        let mut s = single_brick_session();
        assert_eq!((s.score, s.level, s.phase), (0, 1, GamePhase::Playing));

        aim_at_brick(&mut s, 0);
        tick(&mut s, &InputState::default(), 1000.0);

        assert!(s.bricks[0].broken);
        assert_eq!(s.score, 10);
        assert_eq!(s.phase, GamePhase::LevelCleared);
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::LevelCleared { level: 1 }));

        // Physics is suspended during the dwell
        let frozen = s.ball.pos;
        tick(&mut s, &InputState::default(), 2999.0);
        assert_eq!(s.phase, GamePhase::LevelCleared);
        assert_eq!(s.ball.pos, frozen);

        tick(&mut s, &InputState::default(), 3000.0);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.level, 2);
        assert_eq!(s.score, 10);
        assert!(s.bricks.iter().all(|b| !b.broken));
        assert_eq!(s.ball_speed, 4.5);
        assert_eq!(s.ball.vel.y, -4.5);
        assert_eq!(s.drain_events(), vec![GameEvent::LevelStarted { level: 2 }]);
    }

    #[test]
    fn test_full_sample_week_clears() {
        let mut s = Session::new(sample_events(), CanvasSize::default(), Tuning::default(), 11);
        let count = s.bricks.len();
        for index in 0..count {
            aim_at_brick(&mut s, index);
            tick(&mut s, &InputState::default(), index as f64 * FRAME_MS);
        }
        assert_eq!(s.score, count as u64 * 10);
        assert_eq!(s.phase, GamePhase::LevelCleared);
    }

    #[test]
    fn test_reset_cancels_pending_level_transition() {
        let mut s = single_brick_session();
        aim_at_brick(&mut s, 0);
        tick(&mut s, &InputState::default(), 0.0);
        assert_eq!(s.phase, GamePhase::LevelCleared);

        s.reset(sample_events(), CanvasSize::default());
        tick(&mut s, &InputState::default(), 5000.0);
        assert_eq!(s.level, 1);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.remaining_bricks(), s.bricks.len());
    }

    #[test]
    fn test_ball_past_bottom_is_game_over() {
        let mut s = single_brick_session();
        s.ball.pos = Vec2::new(20.0, s.size.height - 10.0);
        s.ball.vel = Vec2::new(0.0, 4.0);
        s.score = 30;
        tick(&mut s, &InputState::default(), 0.0);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert!(s.drain_events().contains(&GameEvent::GameOver { score: 30 }));

        // Frozen until restarted
        let frozen = s.ball.pos;
        tick(&mut s, &InputState { right: true, ..Default::default() }, 16.0);
        assert_eq!(s.ball.pos, frozen);
        assert_eq!(s.score, 30);

        // Clicking elsewhere does nothing
        tick(&mut s, &InputState { click: Some(Vec2::new(1.0, 1.0)), ..Default::default() }, 32.0);
        assert_eq!(s.phase, GamePhase::GameOver);

        let button = s.restart_button().center();
        tick(&mut s, &InputState { click: Some(button), ..Default::default() }, 48.0);
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!((s.score, s.level), (0, 1));
        assert!(s.drain_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_paddle_bounce_flips_once() {
        let mut s = single_brick_session();
        let paddle = s.paddle.rect();
        s.ball.pos = Vec2::new(paddle.center().x, paddle.y - s.ball.radius - 2.0);
        s.ball.vel = Vec2::new(0.0, 4.0);

        tick(&mut s, &InputState::default(), 0.0);
        assert_eq!(s.ball.vel.y, -4.0);
        assert_eq!(s.ball.pos.y, paddle.y - s.ball.radius);
        assert_eq!(s.drain_events(), vec![GameEvent::PaddleHit]);

        // Next step the ball is moving away; no second flip
        tick(&mut s, &InputState::default(), 16.0);
        assert_eq!(s.ball.vel.y, -4.0);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_paddle_spin_and_edge_bias() {
        let mut s = single_brick_session();
        let r = s.ball.radius;
        let paddle = s.paddle.rect();
        let speed = s.paddle.speed;
        // Ball lands near the right edge after the paddle moves right
        s.ball.pos = Vec2::new(paddle.right() + speed - 4.0, paddle.y - r - 2.0);
        s.ball.vel = Vec2::new(0.0, 4.0);

        tick(&mut s, &InputState { right: true, ..Default::default() }, 0.0);
        assert_eq!(s.paddle.velocity(), speed);
        assert!(s.ball.vel.x > 0.0);
        assert!(s.ball.vel.x <= s.ball_speed * s.tuning.max_horizontal_factor);
    }

    #[test]
    fn test_overlapping_bricks_break_in_same_step() {
        let mut s = Session::new(
            vec![
                CalendarEvent::new(2, 9.0, 9.25, "First"),
                CalendarEvent::new(2, 9.25, 9.5, "Second"),
                CalendarEvent::new(4, 15.0, 16.0, "Elsewhere"),
            ],
            CanvasSize::default(),
            Tuning::default(),
            3,
        );
        let (a, b) = (s.bricks[0].rect, s.bricks[1].rect);
        // Ball disc spans the gap between the two stacked bricks
        s.ball.pos = Vec2::new(a.center().x, (a.bottom() + b.y) / 2.0 + 4.0);
        s.ball.vel = Vec2::new(0.0, -4.0);

        tick(&mut s, &InputState::default(), 0.0);
        assert!(s.bricks[0].broken && s.bricks[1].broken);
        assert_eq!(s.score, 20);
        // Two flips cancel out
        assert_eq!(s.ball.vel.y, -4.0);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pointer_centres_paddle() {
        let mut s = single_brick_session();
        tick(&mut s, &InputState { pointer_x: Some(300.0), ..Default::default() }, 0.0);
        assert_eq!(s.paddle.x, 300.0 - s.paddle.width / 2.0);
    }

    #[test]
    fn test_determinism() {
        let mut s1 = Session::new(sample_events(), CanvasSize::default(), Tuning::default(), 99);
        let mut s2 = Session::new(sample_events(), CanvasSize::default(), Tuning::default(), 99);
        let inputs = [
            InputState { left: true, ..Default::default() },
            InputState { pointer_x: Some(200.0), ..Default::default() },
            InputState::default(),
            InputState { right: true, ..Default::default() },
        ];
        for step in 0..400 {
            let input = &inputs[step % inputs.len()];
            tick(&mut s1, input, step as f64 * FRAME_MS);
            tick(&mut s2, input, step as f64 * FRAME_MS);
        }
        assert_eq!(s1.ball.pos, s2.ball.pos);
        assert_eq!(s1.score, s2.score);
        assert_eq!(s1.phase, s2.phase);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_on_canvas(
            moves in proptest::collection::vec((any::<bool>(), any::<bool>(), proptest::option::of(-500.0f32..1500.0)), 1..200)
        ) {
            let mut s = single_brick_session();
            let max_x = s.size.width - s.paddle.width;
            for (step, (left, right, pointer_x)) in moves.into_iter().enumerate() {
                let input = InputState { left, right, pointer_x, click: None };
                tick(&mut s, &input, step as f64 * FRAME_MS);
                prop_assert!(s.paddle.x >= 0.0 && s.paddle.x <= max_x, "paddle at {}", s.paddle.x);
            }
        }
    }
}
