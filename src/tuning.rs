//! Data-driven game balance
//!
//! Velocities are in pixels per simulation step.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Keyboard movement per step
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Ball speed on level 1
    pub ball_base_speed: f32,
    /// Added to the ball speed for every level after the first
    pub ball_speed_per_level: f32,
    /// `|vx|` never exceeds this multiple of the current ball speed
    pub max_horizontal_factor: f32,
    /// Share of the paddle's velocity handed to the ball on contact
    pub spin_transfer: f32,
    /// Extra `vx` at the very edge of the paddle
    pub edge_deflection: f32,
    /// Points per destroyed brick
    pub brick_reward: u64,
    /// Pause between clearing a level and starting the next
    pub level_dwell_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_width: 80.0,
            paddle_height: 10.0,
            paddle_speed: 7.0,
            ball_radius: 8.0,
            ball_base_speed: 4.0,
            ball_speed_per_level: 0.5,
            max_horizontal_factor: 1.5,
            spin_transfer: 0.3,
            edge_deflection: 2.0,
            brick_reward: 10,
            level_dwell_ms: 2000.0,
        }
    }
}

impl Tuning {
    /// Load tuning from JSON; omitted fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_radius", self.ball_radius),
            ("ball_base_speed", self.ball_base_speed),
            ("max_horizontal_factor", self.max_horizontal_factor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        let non_negative = [
            ("ball_speed_per_level", self.ball_speed_per_level),
            ("spin_transfer", self.spin_transfer),
            ("edge_deflection", self.edge_deflection),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must not be negative, got {value}"),
                });
            }
        }

        if !(self.level_dwell_ms.is_finite() && self.level_dwell_ms >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "level_dwell_ms",
                reason: format!("must not be negative, got {}", self.level_dwell_ms),
            });
        }

        Ok(())
    }

    /// Ball speed for a (1-based) level
    pub fn ball_speed_for_level(&self, level: u32) -> f32 {
        self.ball_base_speed + level.saturating_sub(1) as f32 * self.ball_speed_per_level
    }
}
