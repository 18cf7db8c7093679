//! Collision detection and response for the rectangular playfield
//!
//! Overlap tests are arcade checks: the ball's centre
//! must lie strictly within a rectangle's horizontal span, and its disc must
//! reach into the rectangle's vertical band. Side hits are not modelled.

use glam::Vec2;

use super::layout::Rect;

/// Which playfield boundaries the ball touched this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundsContact {
    /// Reflected off the left or right wall
    pub side: bool,
    /// Reflected off the ceiling
    pub ceiling: bool,
    /// Fell past the bottom edge (no bounce)
    pub floor: bool,
}

impl BoundsContact {
    pub fn bounced(&self) -> bool {
        self.side || self.ceiling
    }
}

/// Reflect velocity off the side walls and ceiling of a `width` x `height` field.
///
/// A component is only flipped while it still points into the wall, so a ball
/// that lingers inside the margin for several steps is not reflected back out
/// of the field.
pub fn reflect_off_bounds(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    width: f32,
    height: f32,
) -> BoundsContact {
    let mut contact = BoundsContact::default();

    if pos.x < radius && vel.x < 0.0 {
        vel.x = -vel.x;
        pos.x = radius;
        contact.side = true;
    } else if pos.x > width - radius && vel.x > 0.0 {
        vel.x = -vel.x;
        pos.x = width - radius;
        contact.side = true;
    }

    if pos.y < radius && vel.y < 0.0 {
        vel.y = -vel.y;
        pos.y = radius;
        contact.ceiling = true;
    }

    if pos.y > height - radius {
        contact.floor = true;
    }

    contact
}

/// Ball centre inside the rectangle's x-span and disc overlapping its y-band
#[inline]
pub fn ball_overlaps_rect(pos: Vec2, radius: f32, rect: &Rect) -> bool {
    pos.x > rect.x
        && pos.x < rect.right()
        && pos.y + radius > rect.y
        && pos.y - radius < rect.bottom()
}

/// Where along the paddle the ball struck: -1 at the left edge, +1 at the right
#[inline]
pub fn hit_offset(x: f32, paddle: &Rect) -> f32 {
    if paddle.width <= 0.0 {
        return 0.0;
    }
    (((x - paddle.x) / paddle.width) * 2.0 - 1.0).clamp(-1.0, 1.0)
}

/// Horizontal velocity after a paddle hit.
///
/// Adds a share of the paddle's own motion ("spin") and a bias toward the
/// side of the paddle that was struck, then limits the result to
/// `max_factor * base_speed` in either direction.
pub fn paddle_deflection(
    vx: f32,
    offset: f32,
    paddle_velocity: f32,
    spin_transfer: f32,
    offset_influence: f32,
    base_speed: f32,
    max_factor: f32,
) -> f32 {
    let limit = base_speed * max_factor;
    (vx + paddle_velocity * spin_transfer + offset * offset_influence).clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_wall_reflects_once() {
        let mut pos = Vec2::new(3.0, 200.0);
        let mut vel = Vec2::new(-4.0, -4.0);
        let contact = reflect_off_bounds(&mut pos, &mut vel, 8.0, 800.0, 600.0);
        assert!(contact.side);
        assert_eq!(vel.x, 4.0);

        // Still inside the margin next step, already moving away: no second flip
        let contact = reflect_off_bounds(&mut pos, &mut vel, 8.0, 800.0, 600.0);
        assert!(!contact.side);
        assert_eq!(vel.x, 4.0);
    }

    #[test]
    fn test_ceiling_reflects_once() {
        let mut pos = Vec2::new(400.0, 2.0);
        let mut vel = Vec2::new(1.0, -5.0);
        assert!(reflect_off_bounds(&mut pos, &mut vel, 8.0, 800.0, 600.0).ceiling);
        assert_eq!(vel.y, 5.0);
        assert!(!reflect_off_bounds(&mut pos, &mut vel, 8.0, 800.0, 600.0).ceiling);
        assert_eq!(vel.y, 5.0);
    }

    #[test]
    fn test_floor_does_not_bounce() {
        let mut pos = Vec2::new(400.0, 596.0);
        let mut vel = Vec2::new(0.0, 4.0);
        let contact = reflect_off_bounds(&mut pos, &mut vel, 8.0, 800.0, 600.0);
        assert!(contact.floor);
        assert!(!contact.bounced());
        assert_eq!(vel.y, 4.0);
    }

    #[test]
    fn test_overlap_requires_centre_inside_span() {
        let rect = Rect::new(100.0, 100.0, 50.0, 20.0);
        assert!(ball_overlaps_rect(Vec2::new(125.0, 95.0), 8.0, &rect));
        assert!(ball_overlaps_rect(Vec2::new(125.0, 126.0), 8.0, &rect));
        // Touching the span edge exactly is not a hit
        assert!(!ball_overlaps_rect(Vec2::new(100.0, 110.0), 8.0, &rect));
        assert!(!ball_overlaps_rect(Vec2::new(125.0, 90.0), 8.0, &rect));
    }

    #[test]
    fn test_hit_offset_range() {
        let paddle = Rect::new(100.0, 500.0, 80.0, 10.0);
        assert_eq!(hit_offset(100.0, &paddle), -1.0);
        assert_eq!(hit_offset(140.0, &paddle), 0.0);
        assert_eq!(hit_offset(180.0, &paddle), 1.0);
        assert_eq!(hit_offset(500.0, &paddle), 1.0);
    }

    #[test]
    fn test_paddle_deflection_clamped() {
        let vx = paddle_deflection(4.0, 1.0, 7.0, 0.3, 2.0, 4.0, 1.5);
        assert_eq!(vx, 6.0);
        let vx = paddle_deflection(-4.0, -1.0, -7.0, 0.3, 2.0, 4.0, 1.5);
        assert_eq!(vx, -6.0);
        let vx = paddle_deflection(1.0, 0.0, 0.0, 0.3, 2.0, 4.0, 1.5);
        assert_eq!(vx, 1.0);
    }
}
