//! Scene description
//!
//! Turns a session into a flat list of 2D drawing commands. This is a pure
//! read of the simulation; the host replays the list onto its canvas.

use glam::Vec2;

use crate::consts::{DAY_END_HOUR, DAY_START_HOUR, DAYS_PER_WEEK};
use crate::sim::{GamePhase, Rect, Session};

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Brick fill per weekday
const DAY_COLORS: [Color; 7] = [
    Color::rgb(0xf4, 0xa2, 0x61),
    Color::rgb(0xad, 0xd8, 0xe6),
    Color::rgb(0x90, 0xe0, 0xa0),
    Color::rgb(0xff, 0xd1, 0x66),
    Color::rgb(0xc3, 0xa6, 0xff),
    Color::rgb(0xff, 0xa6, 0xc9),
    Color::rgb(0x9a, 0xd1, 0xd4),
];

const BACKGROUND: Color = Color::rgb(0xee, 0xee, 0xee);
const GRID_LINE: Color = Color::rgb(0xd4, 0xd4, 0xd4);
const INK: Color = Color::rgb(0x22, 0x22, 0x22);
const MUTED_INK: Color = Color::rgb(0x66, 0x66, 0x66);
const BRICK_OUTLINE: Color = Color::rgb(0x88, 0x88, 0x88);
const PADDLE: Color = Color::rgb(0x33, 0x33, 0x33);
const BALL: Color = Color::rgb(0xff, 0x57, 0x33);
const SCRIM: Color = Color::rgba(0x00, 0x00, 0x00, 0x99);
const BANNER_TEXT: Color = Color::rgb(0xff, 0xff, 0xff);
const BUTTON: Color = Color::rgb(0x2e, 0x86, 0xde);

const LABEL_SIZE: f32 = 12.0;
/// Rough advance width of a sans-serif glyph relative to font size
const GLYPH_WIDTH: f32 = 0.55;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS colour string for canvas fill/stroke styles
    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One drawing primitive in canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    Circle { center: Vec2, radius: f32, color: Color },
    /// `pos` is the text baseline anchor
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Build the full frame for a session
pub fn scene(session: &Session) -> Vec<DrawCommand> {
    let mut cmds = Vec::with_capacity(session.bricks.len() * 3 + 48);
    let layout = session.layout();
    let grid = layout.grid();

    cmds.push(DrawCommand::FillRect {
        rect: session.size.bounds(),
        color: BACKGROUND,
    });

    // Hour lines and labels
    let mut hour = DAY_START_HOUR;
    while hour <= DAY_END_HOUR {
        let y = layout.hour_y(hour);
        cmds.push(DrawCommand::Line {
            from: Vec2::new(grid.x, y),
            to: Vec2::new(grid.right(), y),
            color: GRID_LINE,
        });
        cmds.push(text(
            Vec2::new(grid.x - 6.0, y + 4.0),
            format!("{}:00", hour as u32),
            10.0,
            MUTED_INK,
            TextAlign::Right,
        ));
        hour += 1.0;
    }

    // Day headers
    for (day, name) in DAY_NAMES.iter().enumerate().take(DAYS_PER_WEEK as usize) {
        let x = layout.column_x(day as u32) + layout.column_width / 2.0;
        cmds.push(text(
            Vec2::new(x, grid.y - 10.0),
            (*name).to_string(),
            LABEL_SIZE,
            INK,
            TextAlign::Center,
        ));
    }

    // Bricks
    for (brick, event) in session.bricks.iter().zip(session.events()) {
        if brick.broken {
            continue;
        }
        let color = DAY_COLORS[(event.day as usize).min(DAY_COLORS.len() - 1)];
        cmds.push(DrawCommand::FillRect {
            rect: brick.rect,
            color,
        });
        cmds.push(DrawCommand::StrokeRect {
            rect: brick.rect,
            color: BRICK_OUTLINE,
        });
        if brick.rect.height >= LABEL_SIZE + 2.0 {
            if let Some(label) = fit_label(&brick.title, brick.rect.width - 8.0, LABEL_SIZE) {
                cmds.push(text(
                    Vec2::new(brick.rect.x + 4.0, brick.rect.y + LABEL_SIZE + 1.0),
                    label,
                    LABEL_SIZE,
                    INK,
                    TextAlign::Left,
                ));
            }
        }
    }

    // Paddle and ball
    cmds.push(DrawCommand::FillRect {
        rect: session.paddle.rect(),
        color: PADDLE,
    });
    cmds.push(DrawCommand::Circle {
        center: session.ball.pos,
        radius: session.ball.radius,
        color: BALL,
    });

    // HUD
    let hud_y = session.size.height - 6.0;
    cmds.push(text(
        Vec2::new(8.0, hud_y),
        format!("Score: {}", session.score),
        14.0,
        INK,
        TextAlign::Left,
    ));
    cmds.push(text(
        Vec2::new(session.size.width - 8.0, hud_y),
        format!("Level: {}", session.level),
        14.0,
        INK,
        TextAlign::Right,
    ));

    match session.phase {
        GamePhase::Playing => {}
        GamePhase::LevelCleared => {
            let center = session.size.bounds().center();
            cmds.push(DrawCommand::FillRect {
                rect: Rect::new(0.0, center.y - 40.0, session.size.width, 80.0),
                color: SCRIM,
            });
            cmds.push(text(
                center + Vec2::new(0.0, 10.0),
                format!("Level {} cleared!", session.level),
                28.0,
                BANNER_TEXT,
                TextAlign::Center,
            ));
        }
        GamePhase::GameOver => {
            let center = session.size.bounds().center();
            cmds.push(DrawCommand::FillRect {
                rect: session.size.bounds(),
                color: SCRIM,
            });
            cmds.push(text(
                center - Vec2::new(0.0, 30.0),
                "Game Over".to_string(),
                36.0,
                BANNER_TEXT,
                TextAlign::Center,
            ));
            cmds.push(text(
                center + Vec2::new(0.0, 6.0),
                format!("Score: {}   Level: {}", session.score, session.level),
                16.0,
                BANNER_TEXT,
                TextAlign::Center,
            ));
            let button = session.restart_button();
            cmds.push(DrawCommand::FillRect {
                rect: button,
                color: BUTTON,
            });
            cmds.push(text(
                button.center() + Vec2::new(0.0, 6.0),
                "Play again".to_string(),
                16.0,
                BANNER_TEXT,
                TextAlign::Center,
            ));
        }
    }

    cmds
}

fn text(pos: Vec2, text: String, size: f32, color: Color, align: TextAlign) -> DrawCommand {
    DrawCommand::Text {
        pos,
        text,
        size,
        color,
        align,
    }
}

/// Shorten a title to fit `max_width`, ending in an ellipsis when cut
fn fit_label(title: &str, max_width: f32, size: f32) -> Option<String> {
    let max_chars = (max_width / (size * GLYPH_WIDTH)).floor() as usize;
    if max_chars == 0 {
        return None;
    }
    if title.chars().count() <= max_chars {
        return Some(title.to_string());
    }
    let mut label: String = title.chars().take(max_chars.saturating_sub(1)).collect();
    label.push('…');
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::sample_events;
    use crate::sim::CanvasSize;
    use crate::tuning::Tuning;

    fn session() -> Session {
        Session::new(sample_events(), CanvasSize::default(), Tuning::default(), 1)
    }

    fn texts(cmds: &[DrawCommand]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_broken_bricks_not_drawn() {
        let mut s = session();
        let brick_rect = s.bricks[0].rect;
        let drawn = |cmds: &[DrawCommand]| {
            cmds.iter()
                .any(|c| matches!(c, DrawCommand::FillRect { rect, .. } if *rect == brick_rect))
        };
        assert!(drawn(&scene(&s)));
        s.bricks[0].broken = true;
        assert!(!drawn(&scene(&s)));
    }

    #[test]
    fn test_headers_and_hud() {
        let s = session();
        let cmds = scene(&s);
        let labels = texts(&cmds);
        for day in DAY_NAMES {
            assert!(labels.contains(&day));
        }
        assert!(labels.contains(&"8:00"));
        assert!(labels.contains(&"18:00"));
        assert!(labels.contains(&"Score: 0"));
        assert!(labels.contains(&"Level: 1"));
        assert!(!labels.contains(&"Game Over"));
    }

    #[test]
    fn test_game_over_overlay_has_button() {
        let mut s = session();
        s.phase = GamePhase::GameOver;
        let cmds = scene(&s);
        assert!(texts(&cmds).contains(&"Play again"));
        let button = s.restart_button();
        assert!(
            cmds.iter()
                .any(|c| matches!(c, DrawCommand::FillRect { rect, .. } if *rect == button))
        );
    }

    #[test]
    fn test_fit_label() {
        assert_eq!(fit_label("Standup", 100.0, 12.0).as_deref(), Some("Standup"));
        let cut = fit_label("Quarterly Presentation", 60.0, 12.0).unwrap();
        assert!(cut.ends_with('…'));
        assert_eq!(cut.chars().count(), 9);
        assert_eq!(fit_label("x", 2.0, 12.0), None);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(Color::rgb(255, 0, 10).css(), "rgba(255, 0, 10, 1.000)");
    }
}
