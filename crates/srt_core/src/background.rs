use serde::{Deserialize, Serialize};
use srt_math::Vec3;

use crate::texture::Color;

/// Radiance returned for rays that leave the scene.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Same color in every direction.
    Solid(Color),
    /// Vertical blend on the ray's unit direction: `horizon` looking down,
    /// `zenith` looking straight up.
    Gradient { horizon: Color, zenith: Color },
}

impl Background {
    pub const BLACK: Background = Background::Solid(Vec3::ZERO);

    /// The classic white to sky-blue gradient.
    pub fn sky() -> Self {
        Background::Gradient {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }

    /// Background color seen along `direction` (expected to be unit length).
    pub fn value(&self, direction: Vec3) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Gradient { horizon, zenith } => {
                let t = 0.5 * (direction.y + 1.0);
                *horizon * (1.0 - t) + *zenith * t
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::BLACK
    }
}
