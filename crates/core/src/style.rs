use palette::Srgba;
use serde::Serialize;

/// Fill and border for an area or point drawn on the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Style {
    pub border_color: Srgba<f32>,
    /// Screen pixels.
    pub border_width: f32,
    pub fill: Option<Srgba<f32>>,
}

fn rgba(red: u8, green: u8, blue: u8, alpha: f32) -> Srgba<f32> {
    Srgba::new(
        red as f32 / 255.0,
        green as f32 / 255.0,
        blue as f32 / 255.0,
        alpha,
    )
}

const GREEN: (u8, u8, u8) = (0x4c, 0xaf, 0x50);
const RED: (u8, u8, u8) = (0xf4, 0x43, 0x36);

impl Style {
    pub fn transparent() -> Self {
        Self {
            border_color: Srgba::new(0.0, 0.0, 0.0, 0.0),
            border_width: 0.0,
            fill: None,
        }
    }

    pub fn solid_color(fill_color: Srgba<f32>) -> Self {
        Self {
            fill: Some(fill_color),
            ..Self::transparent()
        }
    }

    pub fn with_border(mut self, border_width: f32, border_color: Srgba<f32>) -> Self {
        self.border_color = border_color;
        self.border_width = border_width;
        self
    }

    /// Translucent green disc around the player.
    pub fn radar() -> Self {
        let (r, g, b) = GREEN;
        Self::solid_color(rgba(r, g, b, 0.2))
            .with_border(2.0, rgba(r, g, b, 1.0))
    }

    /// The player's own dot.
    pub fn user_location() -> Self {
        let (r, g, b) = GREEN;
        Self::solid_color(rgba(r, g, b, 1.0))
            .with_border(2.0, rgba(255, 255, 255, 1.0))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    Unsolved,
    Solved,
}

impl MarkerStyle {
    /// Red while unsolved, green once solved.
    pub fn pin_color(&self) -> Srgba<f32> {
        let (r, g, b) = match self {
            MarkerStyle::Unsolved => RED,
            MarkerStyle::Solved => GREEN,
        };
        rgba(r, g, b, 1.0)
    }
}
